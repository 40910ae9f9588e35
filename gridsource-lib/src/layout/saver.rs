//! Debounced background saving of layout changes.

use std::time::Duration;

use log::debug;
use log::warn;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::ColumnState;
use super::LayoutEvent;
use super::LayoutPersistence;
use crate::error::StoreError;

/// Saves the latest layout once a burst of layout events settles.
///
/// Column drags and resizes fire many events in quick succession; only the
/// last snapshot of a burst is written. Must be created inside a tokio
/// runtime.
///
/// # Example
///
/// ```ignore
/// let saver = LayoutSaver::spawn(layouts.clone());
///
/// if let Some(event) = model.resize_column("age", 120) {
///     saver.notify(event, model.column_state());
/// }
///
/// saver.shutdown().await;
/// ```
pub struct LayoutSaver {
    latest: watch::Sender<Option<Vec<ColumnState>>>,
    persistence: LayoutPersistence,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl LayoutSaver {
    /// Starts the saver using the persistence config's debounce period.
    pub fn spawn(persistence: LayoutPersistence) -> Self {
        let debounce = persistence.config().debounce;
        let (latest, rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run(persistence.clone(), rx, debounce, cancel.clone()));

        Self {
            latest,
            persistence,
            cancel,
            task,
        }
    }

    /// Records a layout change. The snapshot is saved once events settle.
    pub fn notify(&self, event: LayoutEvent, state: Vec<ColumnState>) {
        debug!("Layout event {:?}, {} columns", event, state.len());
        self.latest.send_replace(Some(state));
    }

    /// Saves the latest snapshot immediately.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let state = self.latest.borrow().clone();
        match state {
            Some(state) => self.persistence.save(&state).await,
            None => Ok(()),
        }
    }

    /// Stops the saver, writing any pending snapshot first.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            warn!("Layout saver task failed: {}", err);
        }
    }
}

async fn run(
    persistence: LayoutPersistence,
    mut rx: watch::Receiver<Option<Vec<ColumnState>>>,
    debounce: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        // Wait for a quiet period; every new event restarts it.
        let stopping = loop {
            tokio::select! {
                _ = cancel.cancelled() => break true,
                _ = tokio::time::sleep(debounce) => break false,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break true;
                    }
                }
            }
        };

        save_latest(&persistence, &mut rx).await;
        if stopping {
            return;
        }
    }

    if rx.has_changed().unwrap_or(false) {
        save_latest(&persistence, &mut rx).await;
    }
}

async fn save_latest(persistence: &LayoutPersistence, rx: &mut watch::Receiver<Option<Vec<ColumnState>>>) {
    let state = rx.borrow_and_update().clone();
    if let Some(state) = state {
        if let Err(err) = persistence.save(&state).await {
            warn!("Failed to save layout: {}", err);
        }
    }
}
