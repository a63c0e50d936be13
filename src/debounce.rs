//! Timer-based trailing-edge debounce
//!
//! Decouples keystroke-rate mutations from network request rate: values
//! pushed within the window supersede each other and only the last one is
//! published once the window elapses. Dropping the [`Debouncer`] aborts the
//! timer task, so no publish can fire against a disposed owner.

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Clonable input handle for a [`Debouncer`]
#[derive(Debug, Clone)]
pub struct DebounceHandle<T> {
    input: mpsc::UnboundedSender<T>,
}

impl<T> DebounceHandle<T> {
    /// Submit a value, (re)starting the debounce window
    pub fn push(&self, value: T) {
        // Send only fails when the debouncer was dropped; nothing to do then.
        let _ = self.input.send(value);
    }
}

/// Trailing-edge debouncer over values of type `T`
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> Debouncer<T> {
    /// Create a debouncer seeded with `initial`; subscribers observe
    /// `initial` until the first window elapses
    pub fn new(initial: T, window: Duration) -> Self {
        let (input, mut rx) = mpsc::unbounded_channel::<T>();
        let (tx, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    let timer = tokio::time::sleep(window);
                    tokio::pin!(timer);
                    tokio::select! {
                        next = rx.recv() => match next {
                            // A newer value arrived inside the window; the
                            // pending one is superseded and never published.
                            Some(value) => pending = value,
                            None => {
                                let _ = tx.send(pending);
                                return;
                            }
                        },
                        _ = &mut timer => {
                            let _ = tx.send(pending);
                            break;
                        }
                    }
                }
            }
        });

        Self { input, output, task }
    }

    /// Submit a value, (re)starting the debounce window
    pub fn push(&self, value: T) {
        let _ = self.input.send(value);
    }

    /// Clonable input handle
    pub fn handle(&self) -> DebounceHandle<T> {
        DebounceHandle {
            input: self.input.clone(),
        }
    }

    /// Watch the debounced output
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// The most recently published value
    pub fn latest(&self) -> T {
        self.output.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
