//! # Task Management System
//!
//! This module provides a task management system for executing work on a pool of
//! worker threads while keeping the results on the thread that owns the world.
//!
//! ## Architecture Overview
//!
//! The task management system consists of several key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskChannel`: Communication channel between the owning thread and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send their outputs back
//! 4. Outputs are collected on the owning thread in `process_completed_tasks()`
//! 5. Queued tasks move to workers as they free up in `process_queued_tasks()`
//!
//! ## Example Usage
//! ```rust,ignore
//! let mut task_manager = TaskManager::new(num_workers);
//!
//! // Publish a task for background processing
//! task_manager.publish_task(MyTask::new(...));
//!
//! // In your main/game loop:
//! for output in task_manager.process_completed_tasks() {
//!     // use the output on this thread
//! }
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use task::Task;

/// A communication channel between the owning thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owning thread to the worker
/// - `result_receiver`: Receives task outputs from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined on shutdown
#[derive(Debug)]
pub struct TaskChannel<T: Task> {
    task_sender: Option<Sender<T>>,
    result_receiver: Receiver<T::Output>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting task outputs
/// - Handling task queuing when all workers are busy
///
/// Dropping the manager closes every task channel and joins the workers, so tasks
/// that already started finish before the drop returns.
pub struct TaskManager<T: Task> {
    channels: Vec<TaskChannel<T>>,
    queued_tasks: VecDeque<T>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 leaves the remaining work in the shared queue, where any
/// worker that frees up can pick it.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl<T: Task> TaskManager<T> {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// With zero workers every published task stays queued.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<T>();
            let (result_tx, result_rx) = channel::<T::Output>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("task-worker-{worker_index}"))
                .spawn(task_closure);

            match worker {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: Some(task_tx),
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    worker: Some(worker),
                }),
                Err(error) => warn!("Failed to spawn task worker {worker_index}: {error}"),
            }
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of worker threads actually running.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Number of tasks sent to workers whose outputs have not been collected yet.
    pub fn num_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Number of tasks waiting for a free worker.
    pub fn num_queued(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.num_in_flight() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (e.g., worker disconnected)
    fn try_send_task(&mut self, task: T, channel_idx: usize) -> Result<(), T> {
        let channel = &mut self.channels[channel_idx];
        let Some(sender) = channel.task_sender.as_ref() else {
            return Err(task);
        };

        match sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(error) => Err(error.0),
        }
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// This implements a round-robin scheduling strategy starting from the last
    /// used channel to ensure even distribution of tasks across all workers.
    /// Channels that have reached their maximum number of in-flight tasks are
    /// skipped.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&index| self.channels[index].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// The task will be executed as soon as a worker becomes available, or queued
    /// if all workers are busy.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: T) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    warn!("Task worker {channel_idx} disconnected, queueing task");
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Processes any queued tasks if workers are available.
    ///
    /// Call this periodically (typically once per frame). Tasks leave the queue in
    /// FIFO order until either the queue is empty or all workers are busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Collects the outputs of all tasks that finished since the last call.
    ///
    /// Never blocks. Must be called on the owning thread.
    pub fn process_completed_tasks(&mut self) -> Vec<T::Output> {
        let mut outputs = Vec::new();
        for channel in &mut self.channels {
            while let Ok(output) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                outputs.push(output);
            }
        }
        outputs
    }

    /// Blocks until at least one in-flight task finishes, then returns everything that is
    /// complete. Returns immediately with no outputs when nothing is in flight.
    pub fn wait_for_completed_tasks(&mut self) -> Vec<T::Output> {
        let Some(channel) = self
            .channels
            .iter_mut()
            .find(|channel| channel.num_tasks_in_flight > 0)
        else {
            return Vec::new();
        };

        match channel.result_receiver.recv() {
            Ok(output) => {
                channel.num_tasks_in_flight -= 1;
                let mut outputs = vec![output];
                outputs.extend(self.process_completed_tasks());
                outputs
            }
            Err(_) => {
                warn!("Task worker disconnected with tasks in flight");
                channel.num_tasks_in_flight = 0;
                Vec::new()
            }
        }
    }
}

impl<T: Task> Drop for TaskManager<T> {
    fn drop(&mut self) {
        for channel in &mut self.channels {
            // Closing the sender ends the worker loop
            channel.task_sender.take();
        }
        for channel in &mut self.channels {
            if let Some(worker) = channel.worker.take() {
                if worker.join().is_err() {
                    warn!("Task worker panicked");
                }
            }
        }
        debug!("Task workers shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Square(u64);

    impl Task for Square {
        type Output = u64;

        fn process(self) -> u64 {
            self.0 * self.0
        }
    }

    fn drain(manager: &mut TaskManager<Square>) -> Vec<u64> {
        let mut outputs = Vec::new();
        while !manager.is_idle() {
            outputs.extend(manager.wait_for_completed_tasks());
            manager.process_queued_tasks();
        }
        outputs.sort_unstable();
        outputs
    }

    #[test]
    fn queues_when_workers_are_busy() {
        let mut manager = TaskManager::new(2);
        let scheduled: Vec<bool> = (1..=5).map(|i| manager.publish_task(Square(i))).collect();

        assert_eq!(scheduled.iter().filter(|s| **s).count(), 2);
        assert_eq!(manager.num_queued(), 3);
        assert_eq!(drain(&mut manager), vec![1, 4, 9, 16, 25]);
    }

    #[test]
    fn zero_workers_keep_everything_queued() {
        let mut manager = TaskManager::new(0);
        assert!(!manager.publish_task(Square(3)));
        manager.process_queued_tasks();
        assert_eq!(manager.num_queued(), 1);
        assert!(manager.wait_for_completed_tasks().is_empty());
    }
}
