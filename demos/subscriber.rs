//! # Custom Subscriber Example
//!
//! Shows how to implement a custom event subscriber to track scheduler metrics.
//!
//! The example counts:
//! - Dispatched tasks
//! - Successful completions
//! - Failures
//!
//! ## Run
//! ```bash
//! cargo run --example subscriber
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use slotpool::{Event, EventKind, Scheduler, Subscribe, TaskError, TaskRecord};
use tokio::sync::oneshot;

#[derive(Default)]
struct MetricsSubscriber {
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

impl MetricsSubscriber {
    fn print_stats(&self) {
        println!();
        println!("Metrics:");
        println!(" ├─► Dispatched: {}", self.dispatched.load(Ordering::Relaxed));
        println!(" ├─► Failed:     {}", self.failed.load(Ordering::Relaxed));
        println!(" └─► Succeeded:  {}", self.succeeded.load(Ordering::Relaxed));
    }
}

#[async_trait::async_trait]
impl Subscribe for MetricsSubscriber {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::TaskDispatched => {
                self.dispatched.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::TaskSucceeded => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::TaskFailed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "metrics"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(MetricsSubscriber::default());
    let (done_tx, done_rx) = oneshot::channel();
    let mut done_tx = Some(done_tx);

    let sched = Scheduler::<u32, u32>::builder(slotpool::pool_of(3))
        .with_subscribers(vec![metrics.clone() as Arc<dyn Subscribe>])
        .on_drained(move || {
            if let Some(tx) = done_tx.take() {
                let _ = tx.send(());
            }
        })
        .build()?;

    let tasks: Vec<_> = (1..=10u32)
        .map(|n| {
            TaskRecord::new(n, |n: u32| async move {
                tokio::time::sleep(Duration::from_millis(u64::from(n) * 5)).await;
                if n % 4 == 0 {
                    return Err(TaskError::fail(format!("{n} is a multiple of four")));
                }
                Ok(n * n)
            })
        })
        .collect();
    sched.submit(tasks)?;

    done_rx.await?;
    // subscribers are fed asynchronously; give the last events a moment to land
    tokio::time::sleep(Duration::from_millis(20)).await;
    metrics.print_stats();
    Ok(())
}
