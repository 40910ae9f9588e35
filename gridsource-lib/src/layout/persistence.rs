//! Saving and restoring column layouts.

use std::sync::Arc;

use log::debug;
use log::warn;

use super::ApplyColumnStateOptions;
use super::ColumnModel;
use super::ColumnState;
use super::LayoutConfig;
use super::LayoutStore;
use crate::error::StoreError;

/// Saves and restores column layouts through a [`LayoutStore`].
///
/// Cheap to clone; clones share the same store.
///
/// # Example
///
/// ```ignore
/// use gridsource_lib::layout::{LayoutPersistence, MemoryLayoutStore};
///
/// let layouts = LayoutPersistence::new(MemoryLayoutStore::new());
///
/// layouts.save(&model.column_state()).await?;
/// layouts.restore_into(&mut model).await;
/// ```
#[derive(Clone)]
pub struct LayoutPersistence {
    store: Arc<dyn LayoutStore>,
    config: LayoutConfig,
}

impl LayoutPersistence {
    /// Creates a persistence layer over the given store with default config.
    pub fn new(store: impl LayoutStore + 'static) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Creates a persistence layer over a shared store.
    pub fn from_arc(store: Arc<dyn LayoutStore>) -> Self {
        Self {
            store,
            config: LayoutConfig::default(),
        }
    }

    /// Sets the layout config.
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the layout config.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Saves a layout under the state key.
    pub async fn save(&self, state: &[ColumnState]) -> Result<(), StoreError> {
        self.write(&self.config.state_key, state).await
    }

    /// Saves a layout under the reset key.
    pub async fn save_reset_layout(&self, state: &[ColumnState]) -> Result<(), StoreError> {
        self.write(&self.config.reset_key, state).await
    }

    /// Reads the saved layout.
    ///
    /// Returns `None` when nothing is stored, the stored text is not a
    /// layout, or the store cannot be read.
    pub async fn restore(&self) -> Option<Vec<ColumnState>> {
        self.read(&self.config.state_key).await
    }

    /// Reads the reset layout. Same semantics as [`restore`](Self::restore).
    pub async fn reset(&self) -> Option<Vec<ColumnState>> {
        self.read(&self.config.reset_key).await
    }

    /// Applies the saved layout to a model, clearing sort.
    ///
    /// Returns `true` if a layout was applied.
    pub async fn restore_into(&self, model: &mut ColumnModel) -> bool {
        match self.restore().await {
            Some(state) => {
                model.apply_column_state(&state, ApplyColumnStateOptions::restore());
                true
            }
            None => false,
        }
    }

    /// Applies the reset layout to a model, clearing sort.
    ///
    /// Returns `true` if a layout was applied.
    pub async fn reset_into(&self, model: &mut ColumnModel) -> bool {
        match self.reset().await {
            Some(state) => {
                model.apply_column_state(&state, ApplyColumnStateOptions::restore());
                true
            }
            None => false,
        }
    }

    /// Removes the saved layout.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.config.state_key).await
    }

    async fn write(&self, key: &str, state: &[ColumnState]) -> Result<(), StoreError> {
        let text = serde_json::to_string(state)?;
        self.store.set(key, text).await?;
        debug!("Saved layout of {} columns under '{}'", state.len(), key);
        Ok(())
    }

    async fn read(&self, key: &str) -> Option<Vec<ColumnState>> {
        let text = match self.store.get(key).await {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(err) => {
                warn!("Could not read layout '{}': {}", key, err);
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!("Ignoring malformed layout '{}': {}", key, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MemoryLayoutStore;
    use crate::query::Direction;

    fn model() -> ColumnModel {
        ColumnModel::new(vec![
            ColumnState::new("athlete").with_width(200),
            ColumnState::new("age").with_width(220),
            ColumnState::new("country").with_width(220),
            ColumnState::new("sport").with_width(180),
        ])
    }

    #[tokio::test]
    async fn test_save_restore_round_trip_clears_sort() {
        let layouts = LayoutPersistence::new(MemoryLayoutStore::new());

        let mut edited = model();
        edited.move_column("sport", 0);
        edited.resize_column("age", 90);
        edited.set_column_visible("country", false);
        edited.set_column_sort("athlete", Some(Direction::Asc), Some(0));
        layouts.save(&edited.column_state()).await.unwrap();

        let mut mounted = model();
        assert!(layouts.restore_into(&mut mounted).await);

        assert_eq!(mounted.column_ids(), edited.column_ids());
        for (restored, saved) in mounted.column_state().iter().zip(edited.column_state()) {
            assert_eq!(restored.width, saved.width);
            assert_eq!(restored.hide, saved.hide);
            assert_eq!(restored.sort, None);
        }
    }

    #[tokio::test]
    async fn test_restore_without_saved_layout() {
        let layouts = LayoutPersistence::new(MemoryLayoutStore::new());
        let mut mounted = model();

        assert_eq!(layouts.restore().await, None);
        assert!(!layouts.restore_into(&mut mounted).await);
        assert_eq!(mounted, model());
    }

    #[tokio::test]
    async fn test_malformed_layout_is_ignored() {
        let store = Arc::new(MemoryLayoutStore::new());
        store.set("columnState", "{not json".into()).await.unwrap();

        let layouts = LayoutPersistence::from_arc(store);
        assert_eq!(layouts.restore().await, None);
    }

    #[tokio::test]
    async fn test_reset_reads_its_own_key() {
        let layouts = LayoutPersistence::new(MemoryLayoutStore::new());
        layouts.save(&[ColumnState::new("age")]).await.unwrap();
        assert_eq!(layouts.reset().await, None);

        let defaults = model().column_state();
        layouts.save_reset_layout(&defaults).await.unwrap();

        let mut edited = model();
        edited.move_column("sport", 0);
        assert!(layouts.reset_into(&mut edited).await);
        assert_eq!(edited.column_ids(), ["athlete", "age", "country", "sport"]);
    }

    #[tokio::test]
    async fn test_custom_keys() {
        let store = Arc::new(MemoryLayoutStore::new());
        let layouts = LayoutPersistence::from_arc(store.clone())
            .with_config(LayoutConfig::default().with_state_key("medals"));

        layouts.save(&[ColumnState::new("gold")]).await.unwrap();
        assert!(store.get("medals").await.unwrap().is_some());
        assert!(store.get("columnState").await.unwrap().is_none());

        layouts.clear().await.unwrap();
        assert!(store.is_empty());
    }
}
