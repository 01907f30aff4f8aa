use std::collections::VecDeque;

use crate::tasks::TaskRecord;

/// Unbounded FIFO of pending tasks.
///
/// Popping an empty queue is a normal condition (`None`), not an error.
pub(crate) struct TaskQueue<P, R> {
    pending: VecDeque<TaskRecord<P, R>>,
}

impl<P, R> TaskQueue<P, R> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Appends to the tail.
    pub fn enqueue(&mut self, task: TaskRecord<P, R>) {
        self.pending.push_back(task);
    }

    /// Appends each record in the given order.
    pub fn enqueue_batch(&mut self, tasks: impl IntoIterator<Item = TaskRecord<P, R>>) {
        for task in tasks {
            self.enqueue(task);
        }
    }

    /// Removes and returns the head.
    pub fn pop_front(&mut self) -> Option<TaskRecord<P, R>> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
