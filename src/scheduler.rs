//! Foreground execution context
//!
//! A [`MainQueue`] is a handle to a single thread that runs posted jobs one at
//! a time, in posting order. Worker code hands results to rendering code by
//! dispatching onto it, so rendering never runs on a worker thread.

use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{CitycastError, Result};

/// Unit of work run on the foreground thread
pub type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Quit,
}

/// Cloneable handle for posting jobs to the foreground thread
#[derive(Clone)]
pub struct MainQueue {
    sender: mpsc::UnboundedSender<Message>,
    owner: Arc<OnceLock<ThreadId>>,
}

/// Receiving side of a [`MainQueue`], to be driven by exactly one thread
pub struct MainLoop {
    receiver: mpsc::UnboundedReceiver<Message>,
    owner: Arc<OnceLock<ThreadId>>,
}

impl MainQueue {
    /// Create a queue whose loop the caller runs on a thread of its choosing.
    #[must_use]
    pub fn channel() -> (MainQueue, MainLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let owner = Arc::new(OnceLock::new());
        (
            MainQueue {
                sender,
                owner: Arc::clone(&owner),
            },
            MainLoop { receiver, owner },
        )
    }

    /// Create a queue drained by a new named thread.
    pub fn spawn(name: &str) -> Result<(MainQueue, thread::JoinHandle<()>)> {
        let (queue, main_loop) = Self::channel();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || main_loop.run())
            .map_err(|e| CitycastError::general(format!("Failed to start {name} thread: {e}")))?;
        Ok((queue, handle))
    }

    /// Post a job. Jobs posted after the loop stopped are dropped.
    ///
    /// A job that panics unwinds the foreground thread and stops the loop, so
    /// every later job (including pending fetch continuations) is dropped too.
    pub fn dispatch<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.sender.send(Message::Run(Box::new(job))).is_err() {
            warn!("Main queue stopped, dropping job");
        }
    }

    /// Ask the loop to stop once the jobs queued so far have run.
    pub fn quit(&self) {
        let _ = self.sender.send(Message::Quit);
    }

    /// Thread draining this queue, once its loop has started
    #[must_use]
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.owner.get().copied()
    }

    /// Whether the caller is running on the foreground thread
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.thread_id() == Some(thread::current().id())
    }
}

impl MainLoop {
    /// Run jobs on the calling thread until [`MainQueue::quit`] is called or
    /// every [`MainQueue`] handle is dropped.
    ///
    /// Jobs are not isolated: a panicking job propagates out of `run` and the
    /// queue is stopped for good.
    pub fn run(mut self) {
        let current = thread::current();
        if self.owner.set(current.id()).is_err() {
            warn!("Main loop already bound to another thread");
        }
        debug!(thread = ?current.name(), "Main loop started");

        while let Some(message) = self.receiver.blocking_recv() {
            match message {
                Message::Run(job) => job(),
                Message::Quit => break,
            }
        }

        debug!("Main loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc as std_mpsc;

    #[test]
    fn test_jobs_run_in_order_on_queue_thread() {
        let (queue, handle) = MainQueue::spawn("test-main").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let seen = Arc::clone(&seen);
            queue.dispatch(move || {
                let name = thread::current().name().map(str::to_string);
                seen.lock().unwrap().push((i, name));
            });
        }
        queue.quit();
        handle.join().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        for (expected, (i, name)) in seen.iter().enumerate() {
            assert_eq!(*i, expected);
            assert_eq!(name.as_deref(), Some("test-main"));
        }
    }

    #[test]
    fn test_is_current_only_on_queue_thread() {
        let (queue, handle) = MainQueue::spawn("test-current").unwrap();
        let (tx, rx) = std_mpsc::channel();

        let inner = queue.clone();
        queue.dispatch(move || tx.send(inner.is_current()).unwrap());

        assert!(rx.recv().unwrap());
        assert!(!queue.is_current());
        assert_ne!(queue.thread_id(), Some(thread::current().id()));

        queue.quit();
        handle.join().unwrap();
    }

    #[test]
    fn test_loop_ends_when_handles_dropped() {
        let (queue, handle) = MainQueue::spawn("test-drop").unwrap();
        drop(queue);
        handle.join().unwrap();
    }

    #[test]
    fn test_panicking_job_stops_the_queue() {
        let (queue, handle) = MainQueue::spawn("test-panic").unwrap();
        queue.dispatch(|| panic!("continuation failed"));
        assert!(handle.join().is_err());

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        queue.dispatch(move || *flag.lock().unwrap() = true);
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn test_dispatch_after_quit_is_dropped() {
        let (queue, handle) = MainQueue::spawn("test-late").unwrap();
        queue.quit();
        handle.join().unwrap();

        let ran = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&ran);
        queue.dispatch(move || *flag.lock().unwrap() = true);
        assert!(!*ran.lock().unwrap());
    }
}
