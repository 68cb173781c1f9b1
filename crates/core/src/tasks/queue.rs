//! Main thread task queue
//!
//! Background workers queue closures that need the plugin state. The game
//! frame hook drains them on the main thread, so state is only ever touched
//! from one thread.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// A task to execute on the main thread against state `S`
pub type Task<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Capacity of the task queue per frame
pub const QUEUE_CAPACITY: usize = 1024;

/// Error returned when a task could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// Queue is at capacity; the task was dropped
    #[error("task queue full")]
    Full,
    /// The main-thread side has been dropped
    #[error("task queue disconnected")]
    Disconnected,
}

/// Receiving half, owned by the main thread
pub struct TaskQueue<S> {
    sender: Sender<Task<S>>,
    receiver: Receiver<Task<S>>,
}

/// Sending half, cloned into background workers
pub struct TaskSender<S> {
    sender: Sender<Task<S>>,
}

impl<S> Clone for TaskSender<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S> Default for TaskQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TaskQueue<S> {
    /// Create an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = bounded(QUEUE_CAPACITY);
        Self { sender, receiver }
    }

    /// Get a sender that can be moved to another thread
    pub fn sender(&self) -> TaskSender<S> {
        TaskSender {
            sender: self.sender.clone(),
        }
    }

    /// Process all queued tasks
    ///
    /// Called from the frame hook on the main thread.
    /// Returns the number of tasks processed.
    pub fn process(&self, state: &mut S) -> usize {
        let mut count = 0;

        // Process up to QUEUE_CAPACITY tasks per frame
        while let Ok(task) = self.receiver.try_recv() {
            task(state);
            count += 1;

            if count >= QUEUE_CAPACITY {
                break;
            }
        }

        count
    }

    /// Check how many tasks are currently queued
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether no tasks are queued
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<S> TaskSender<S> {
    /// Queue a task to execute on the next game frame
    ///
    /// This is safe to call from any thread.
    pub fn queue<F>(&self, task: F) -> Result<(), QueueError>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        match self.sender.try_send(Box::new(task)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Task queue full, dropping task");
                Err(QueueError::Full)
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Task queue disconnected");
                Err(QueueError::Disconnected)
            }
        }
    }

    /// Queue a task, blocking if the queue is full
    ///
    /// # Warning
    /// Only call from background threads, never from the main thread
    /// (would deadlock if queue is full and waiting for frame to process)
    pub fn queue_blocking<F>(&self, task: F)
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        if let Err(e) = self.sender.send(Box::new(task)) {
            tracing::error!("Failed to queue task (blocking): {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_run_in_order_on_process() {
        let queue: TaskQueue<Vec<u32>> = TaskQueue::new();
        let sender = queue.sender();

        sender.queue(|s| s.push(1)).unwrap();
        sender.queue(|s| s.push(2)).unwrap();
        assert_eq!(queue.len(), 2);

        let mut state = Vec::new();
        assert_eq!(queue.process(&mut state), 2);
        assert_eq!(state, vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_from_background_thread() {
        let queue: TaskQueue<u32> = TaskQueue::new();
        let sender = queue.sender();

        std::thread::spawn(move || {
            sender.queue_blocking(|s| *s += 10);
        })
        .join()
        .unwrap();

        let mut state = 0;
        queue.process(&mut state);
        assert_eq!(state, 10);
    }

    #[test]
    fn test_full_queue_drops_task() {
        let queue: TaskQueue<()> = TaskQueue::new();
        let sender = queue.sender();

        for _ in 0..QUEUE_CAPACITY {
            sender.queue(|_| {}).unwrap();
        }
        assert_eq!(sender.queue(|_| {}), Err(QueueError::Full));
    }
}
