//! # Debounce
//!
//! Trailing-edge debounce for search boxes and filter inputs.
//!
//! ```text
//! call(a)  call(b)      call(c)
//!    │        │            │
//!    ├─wait─┐ ├────wait──┐ ├────wait────┐
//!    │ reset  │   reset    │            ▼
//!    ▼        ▼            ▼          f(c)     one run, last arguments
//! ```
//!
//! A worker task owns the timer; calls only send their arguments to it.
//! Dropping the [`Debouncer`] discards a pending call.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runs `f` once `wait` has passed without another call.
#[derive(Debug)]
pub struct Debouncer<T> {
    calls: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    /// Spawns the worker; must be called inside a Tokio runtime.
    pub fn new<F>(wait: Duration, mut f: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (calls, mut rx) = mpsc::unbounded_channel::<T>();

        let worker = tokio::spawn(async move {
            let timer = tokio::time::sleep(wait);
            tokio::pin!(timer);
            let mut pending: Option<T> = None;

            loop {
                tokio::select! {
                    call = rx.recv() => match call {
                        Some(args) => {
                            pending = Some(args);
                            timer.as_mut().reset(Instant::now() + wait);
                        }
                        None => break,
                    },
                    () = &mut timer, if pending.is_some() => {
                        if let Some(args) = pending.take() {
                            f(args);
                        }
                    }
                }
            }
        });

        Debouncer { calls, worker }
    }

    /// Schedules `f(args)`, replacing any call still waiting.
    pub fn call(&self, args: T) {
        // The worker only stops when `calls` is dropped.
        let _ = self.calls.send(args);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}
