//! # Task System Core Trait
//!
//! This module defines the fundamental building block of the task system: a unit
//! of work that runs on a worker thread and produces an output for the owning thread.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task's output is sent back over the worker's result channel
//! 4. The owning thread collects outputs with `TaskManager::process_completed_tasks()`
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `Task::Output` must be `Send` to be transferred back to the owning thread
//! - Tasks own all the data they need; nothing is borrowed across threads

/// A unit of work that can be executed asynchronously.
///
/// # Implementation Guidelines
/// - Should be relatively coarse-grained to amortize task scheduling overhead
/// - Must not touch resources bound to the owning thread (such as the GPU device)
/// - Always runs to completion once started; there is no cancellation
pub trait Task: Send + 'static {
    /// The value handed back to the owning thread.
    type Output: Send + 'static;

    /// Performs the work. Runs on a worker thread.
    fn process(self) -> Self::Output;
}
