//! Cancellable deferred tasks.
//!
//! The browser build schedules through `setTimeout`; [`ManualScheduler`] is a
//! simulated clock used by tests and headless callers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task. Dropping the handle cancels the task if it has
/// not run yet.
pub trait TaskHandle {
    fn cancel(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

/// Runs a task once after a delay.
pub trait Scheduler {
    type Handle: TaskHandle;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;
}

struct Pending {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_id: u64,
    tasks: Vec<Pending>,
}

/// Scheduler driven by explicit [`ManualScheduler::advance`] calls.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of tasks that have neither run nor been cancelled.
    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Move the clock forward, running due tasks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            // The borrow must end before the task runs: tasks may schedule.
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due = queue
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.id))
                    .map(|(i, _)| i);
                match due {
                    Some(i) => {
                        let pending = queue.tasks.remove(i);
                        queue.now = pending.due;
                        Some(pending.task)
                    }
                    None => {
                        queue.now = target;
                        None
                    }
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Task) -> ManualHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.tasks.push(Pending { id, due, task });
        ManualHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }
}

pub struct ManualHandle {
    id: u64,
    queue: Weak<RefCell<ManualQueue>>,
}

impl TaskHandle for ManualHandle {}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            queue.borrow_mut().tasks.retain(|p| p.id != self.id);
        }
    }
}
