//! Runs client calls off the UI thread.
//!
//! A UI loop calls [`Dispatcher::spawn`] from an event handler, keeps the
//! returned [`Pending`], and polls it once per frame with
//! [`Pending::try_take`]. Results are delivered in completion order; nothing
//! here sequences separate calls.

use std::future::Future;
use std::sync::mpsc::{self, Receiver, RecvError, TryRecvError};
use std::task::Poll;

use crate::{ClientError, Result};

/// Owns the worker runtime that client futures run on.
///
/// Drop it from a plain thread, not from inside an async context.
#[derive(Debug)]
pub struct Dispatcher {
    runtime: tokio::runtime::Runtime,
}

impl Dispatcher {
    /// Multi-threaded runtime with one worker per core.
    pub fn new() -> Result<Self> {
        Self::build(tokio::runtime::Builder::new_multi_thread())
    }

    pub fn with_worker_threads(threads: usize) -> Result<Self> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.worker_threads(threads.max(1));
        Self::build(builder)
    }

    fn build(mut builder: tokio::runtime::Builder) -> Result<Self> {
        let runtime = builder
            .thread_name("gametrade-worker")
            .enable_all()
            .build()
            .map_err(|err| ClientError::Dispatch(format!("runtime init failed: {err}")))?;
        Ok(Self { runtime })
    }

    /// Starts `future` in the background and returns a handle to its output.
    pub fn spawn<F>(&self, future: F) -> Pending<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.runtime.spawn(async move {
            // The receiver may already be gone if the caller lost interest.
            let _ = tx.send(future.await);
        });
        Pending { rx }
    }

    /// Runs `future` to completion on the calling thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Output of a spawned call that may not have arrived yet.
#[derive(Debug)]
pub struct Pending<T> {
    rx: Receiver<T>,
}

impl<T> Pending<T> {
    /// Non-blocking check, suitable for a per-frame poll.
    ///
    /// After `Ready` has been returned once, later calls report a
    /// [`ClientError::Dispatch`] error.
    pub fn try_take(&self) -> Poll<Result<T>> {
        match self.rx.try_recv() {
            Ok(value) => Poll::Ready(Ok(value)),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(Err(worker_gone())),
        }
    }

    /// Blocks until the result arrives.
    pub fn wait(self) -> Result<T> {
        self.rx.recv().map_err(|RecvError| worker_gone())
    }
}

fn worker_gone() -> ClientError {
    ClientError::Dispatch("background worker disconnected unexpectedly".to_owned())
}

#[cfg(test)]
mod tests {
    use std::task::Poll;
    use std::time::Duration;

    use super::Dispatcher;
    use crate::ClientError;

    #[test]
    fn spawned_result_is_delivered() {
        let dispatcher = Dispatcher::with_worker_threads(1).expect("runtime must start");
        let pending = dispatcher.spawn(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            21 * 2
        });
        assert_eq!(pending.wait().expect("value must arrive"), 42);
    }

    #[test]
    fn try_take_polls_without_blocking() {
        let dispatcher = Dispatcher::with_worker_threads(1).expect("runtime must start");
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();
        let pending = dispatcher.spawn(async move {
            let _ = release_rx.await;
            "done"
        });

        assert!(matches!(pending.try_take(), Poll::Pending));
        release_tx.send(()).expect("task must be waiting");

        let value = loop {
            match pending.try_take() {
                Poll::Ready(result) => break result.expect("value must arrive"),
                Poll::Pending => std::thread::sleep(Duration::from_millis(1)),
            }
        };
        assert_eq!(value, "done");
    }

    #[test]
    fn panicking_task_reports_dispatch_error() {
        let dispatcher = Dispatcher::with_worker_threads(1).expect("runtime must start");
        let pending = dispatcher.spawn(async {
            if true {
                panic!("worker blew up");
            }
            1u8
        });
        assert!(matches!(pending.wait(), Err(ClientError::Dispatch(_))));
    }
}
