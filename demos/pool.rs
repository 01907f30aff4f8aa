//! # Pool Example
//!
//! Three tasks on a pool of two slots:
//! - `A` (100ms) takes slot 0
//! - `B` (10ms) takes slot 1
//! - `C` (10ms) waits in the queue and takes slot 1 as soon as `B` frees it
//!
//! ## Run
//! ```bash
//! cargo run --example pool
//! ```

use std::time::{Duration, Instant};

use slotpool::{EventKind, Scheduler, TaskError, TaskRecord};
use tokio::sync::oneshot;

fn sleeper(label: &'static str, ms: u64) -> TaskRecord<u64, u64> {
    TaskRecord::new(ms, |ms: u64| async move {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok::<_, TaskError>(ms)
    })
    .with_label(label)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let (done_tx, done_rx) = oneshot::channel();
    let mut done_tx = Some(done_tx);

    let sched = Scheduler::<u64, u64>::builder(slotpool::pool_of(2))
        .on_success(move |ok| {
            println!(
                "[{:>4}ms] {} finished after {}ms",
                started.elapsed().as_millis(),
                ok.task.display_name(),
                ok.result
            );
        })
        .on_drained(move || {
            if let Some(tx) = done_tx.take() {
                let _ = tx.send(());
            }
        })
        .build()?;

    let mut events = sched.subscribe();
    tokio::spawn(async move {
        while let Ok(ev) = events.recv().await {
            if ev.kind == EventKind::TaskDispatched {
                println!(
                    "[{:>4}ms] {} -> slot {}",
                    started.elapsed().as_millis(),
                    ev.task.as_deref().unwrap_or("-"),
                    ev.slot.unwrap_or_default()
                );
            }
        }
    });

    sched.submit(vec![sleeper("A", 100), sleeper("B", 10), sleeper("C", 10)])?;
    done_rx.await?;

    println!("[{:>4}ms] drained", started.elapsed().as_millis());
    Ok(())
}
