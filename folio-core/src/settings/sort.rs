use std::sync::Arc;

use folio_model::{SortField, SortOrder, SortPreference};
use tracing::warn;

use super::store::PreferenceStore;
use crate::database::StorageResult;

pub const SORT_FIELD_KEY: &str = "sort_field";
pub const SORT_ORDER_KEY: &str = "sort_order";

/// Persists the last sort choice. Each half falls back to its default on
/// its own when the stored value is missing or unrecognised.
#[derive(Clone)]
pub struct SortPreferenceRepository {
    store: Arc<dyn PreferenceStore>,
}

impl std::fmt::Debug for SortPreferenceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortPreferenceRepository").finish_non_exhaustive()
    }
}

impl SortPreferenceRepository {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> StorageResult<SortPreference> {
        let field = match self.store.get(SORT_FIELD_KEY).await? {
            Some(raw) => raw.parse::<SortField>().unwrap_or_else(|err| {
                warn!(%err, "stored sort field ignored");
                SortField::default()
            }),
            None => SortField::default(),
        };
        let order = match self.store.get(SORT_ORDER_KEY).await? {
            Some(raw) => raw.parse::<SortOrder>().unwrap_or_else(|err| {
                warn!(%err, "stored sort order ignored");
                SortOrder::default()
            }),
            None => SortOrder::default(),
        };
        Ok(SortPreference::new(field, order))
    }

    pub async fn save(&self, preference: SortPreference) -> StorageResult<()> {
        self.store
            .set_many(vec![
                (SORT_FIELD_KEY.to_string(), preference.field.as_str().to_string()),
                (SORT_ORDER_KEY.to_string(), preference.order.as_str().to_string()),
            ])
            .await
    }
}
