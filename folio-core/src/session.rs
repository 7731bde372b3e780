//! A user's working session over the catalog: the paginated list, its sort
//! preference, and the mutations that invalidate the list.
//!
//! The pagination controller never refreshes on its own. Every successful
//! mutation made through the session publishes a notice and performs a full
//! reload, so the window never shows a stale neighbourhood.

use std::sync::Arc;

use folio_model::{CatalogItem, ItemId, ItemKind, NewItem, RemoteBook, SortPreference};
use tokio::sync::{broadcast, watch};
use tracing::{info, instrument, warn};

use crate::circulation::{self, CirculationOutcome};
use crate::database::ItemRepository;
use crate::error::{CatalogError, Result};
use crate::import::{ImportOutcome, import_remote_book};
use crate::input::ItemDraft;
use crate::pagination::{
    LoadHandle, Notice, PaginationConfig, PaginationController, PaginationSnapshot,
};
use crate::providers::{BookSearchProvider, SearchQuery};
use crate::settings::SortPreferenceRepository;

/// Result of a session operation plus the reload it triggered, if any.
#[derive(Debug)]
pub struct SessionUpdate<T> {
    pub outcome: T,
    pub reload: Option<LoadHandle>,
}

impl<T> SessionUpdate<T> {
    fn new(outcome: T, reload: Option<LoadHandle>) -> Self {
        Self { outcome, reload }
    }

    /// Wait for the triggered reload, if any, and return the outcome.
    pub async fn settled(self) -> T {
        if let Some(reload) = self.reload {
            reload.finished().await;
        }
        self.outcome
    }
}

pub struct LibrarySession {
    controller: PaginationController,
    repo: Arc<dyn ItemRepository>,
    preferences: SortPreferenceRepository,
    search: Arc<dyn BookSearchProvider>,
}

impl std::fmt::Debug for LibrarySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibrarySession")
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl LibrarySession {
    /// Restore the saved sort order and start the first load.
    ///
    /// An unreadable preference store is not fatal; the default order is
    /// used instead.
    pub async fn start(
        repo: Arc<dyn ItemRepository>,
        preferences: SortPreferenceRepository,
        search: Arc<dyn BookSearchProvider>,
        config: PaginationConfig,
    ) -> (Self, LoadHandle) {
        let sort = match preferences.load().await {
            Ok(sort) => sort,
            Err(err) => {
                warn!(error = %err, "sort preference unavailable, using default");
                SortPreference::default()
            }
        };

        let controller = PaginationController::new(Arc::clone(&repo), config, sort);
        let initial = controller.load_initial(sort);
        info!(%sort, "library session started");

        (
            Self {
                controller,
                repo,
                preferences,
                search,
            },
            initial,
        )
    }

    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    pub fn subscribe(&self) -> watch::Receiver<PaginationSnapshot> {
        self.controller.subscribe()
    }

    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.controller.notices()
    }

    pub fn sort(&self) -> SortPreference {
        self.controller.sort()
    }

    pub fn reload(&self) -> LoadHandle {
        self.controller.reload()
    }

    /// Persist a new order and reload in it. Ignored when the order is
    /// unchanged or a load is in flight.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_sort(&self, sort: SortPreference) -> Result<Option<LoadHandle>> {
        if self.controller.sort() == sort || self.controller.state().is_loading() {
            return Ok(None);
        }
        if let Err(err) = self.preferences.save(sort).await {
            return Err(self.report(err.into()));
        }
        Ok(Some(self.controller.on_sort_changed(sort)))
    }

    /// Validate a form and store the item it describes.
    pub async fn add_draft(
        &self,
        kind: ItemKind,
        draft: &ItemDraft,
    ) -> Result<SessionUpdate<ItemId>> {
        let item = draft.validate(kind)?;
        self.add_item(item).await
    }

    #[instrument(skip(self, item), fields(name = %item.name), level = "debug")]
    pub async fn add_item(&self, item: NewItem) -> Result<SessionUpdate<ItemId>> {
        let name = item.name.clone();
        let id = match self.repo.add(item).await {
            Ok(id) => id,
            Err(err) => return Err(self.report(err.into())),
        };
        self.controller
            .notify(Notice::info(format!("'{name}' added to the library")));
        Ok(SessionUpdate::new(id, Some(self.controller.reload())))
    }

    /// Delete an item. Returns `false` (and publishes a notice) when the id
    /// is unknown.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete_item(&self, id: ItemId) -> Result<SessionUpdate<bool>> {
        let existing = match self.repo.get(id).await {
            Ok(existing) => existing,
            Err(err) => return Err(self.report(err.into())),
        };
        let label = existing
            .map(|item| format!("'{}'", item.name))
            .unwrap_or_else(|| format!("Item {id}"));

        let removed = match self.repo.remove(id).await {
            Ok(removed) => removed,
            Err(err) => return Err(self.report(err.into())),
        };
        if !removed {
            self.controller.notify(Notice::error(format!(
                "{label} was not found in the library"
            )));
            return Ok(SessionUpdate::new(false, None));
        }

        self.controller
            .notify(Notice::info(format!("{label} deleted")));
        Ok(SessionUpdate::new(true, Some(self.controller.reload())))
    }

    pub async fn detail(&self, id: ItemId) -> Result<Option<CatalogItem>> {
        Ok(self.repo.get(id).await?)
    }

    /// Search the remote catalog. Terms that are too short are rejected
    /// before any request is made.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, author: &str, title: &str) -> Result<Vec<RemoteBook>> {
        let query = SearchQuery::new(author, title)?;
        match self.search.search(&query).await {
            Ok(books) => {
                info!(found = books.len(), "remote search finished");
                Ok(books)
            }
            Err(err) => Err(self.report(err.into())),
        }
    }

    pub async fn import(&self, book: &RemoteBook) -> Result<SessionUpdate<ImportOutcome>> {
        let outcome = match import_remote_book(self.repo.as_ref(), book).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.report(err.into())),
        };
        let reload = match &outcome {
            ImportOutcome::Imported { .. } => {
                self.controller.notify(Notice::info(outcome.message()));
                Some(self.controller.reload())
            }
            ImportOutcome::AlreadyExists { .. } => {
                self.controller.notify(Notice::error(outcome.message()));
                None
            }
        };
        Ok(SessionUpdate::new(outcome, reload))
    }

    pub async fn take_home(&self, id: ItemId) -> Result<SessionUpdate<CirculationOutcome>> {
        let outcome = circulation::take_home(self.repo.as_ref(), id).await;
        self.circulate(outcome)
    }

    pub async fn read_in_library(
        &self,
        id: ItemId,
    ) -> Result<SessionUpdate<CirculationOutcome>> {
        let outcome = circulation::read_in_library(self.repo.as_ref(), id).await;
        self.circulate(outcome)
    }

    pub async fn return_item(&self, id: ItemId) -> Result<SessionUpdate<CirculationOutcome>> {
        let outcome = circulation::return_item(self.repo.as_ref(), id).await;
        self.circulate(outcome)
    }

    pub async fn digitize(&self, id: ItemId) -> Result<SessionUpdate<CirculationOutcome>> {
        let outcome = circulation::digitize(self.repo.as_ref(), id).await;
        self.circulate(outcome)
    }

    fn circulate(
        &self,
        outcome: crate::database::StorageResult<CirculationOutcome>,
    ) -> Result<SessionUpdate<CirculationOutcome>> {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.report(err.into())),
        };
        if !outcome.is_success() {
            self.controller.notify(Notice::error(outcome.message()));
            return Ok(SessionUpdate::new(outcome, None));
        }
        self.controller.notify(Notice::info(outcome.message()));
        Ok(SessionUpdate::new(outcome, Some(self.controller.reload())))
    }

    /// Publish the user-facing text of `err` and hand it back.
    fn report(&self, err: CatalogError) -> CatalogError {
        warn!(error = %err, "catalog operation failed");
        self.controller.notify(Notice::error(err.user_message()));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryItemRepository;
    use crate::input::Field;
    use crate::pagination::{LoadOutcome, NoticeLevel};
    use crate::providers::{MockBookSearchProvider, ProviderError};
    use crate::settings::InMemoryPreferenceStore;
    use folio_model::{SortField, SortOrder};

    async fn session_with(
        count: usize,
        search: MockBookSearchProvider,
    ) -> (LibrarySession, Arc<InMemoryItemRepository>) {
        let repo = Arc::new(InMemoryItemRepository::new());
        repo.insert_all(
            (0..count)
                .map(|i| NewItem::book(format!("Book {i:03}"), 100, "Author"))
                .collect(),
        )
        .await
        .unwrap();
        let preferences =
            SortPreferenceRepository::new(Arc::new(InMemoryPreferenceStore::new()));
        let (session, initial) = LibrarySession::start(
            repo.clone(),
            preferences,
            Arc::new(search),
            PaginationConfig::default(),
        )
        .await;
        initial.finished().await;
        (session, repo)
    }

    #[tokio::test]
    async fn short_search_terms_never_reach_the_provider() {
        let mut provider = MockBookSearchProvider::new();
        provider.expect_search().never();
        let (session, _) = session_with(0, provider).await;

        let err = session.search("ab", "").await.unwrap_err();
        let CatalogError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.for_field(Field::SearchQuery).is_some());
    }

    #[tokio::test]
    async fn search_failure_publishes_status_notice() {
        let mut provider = MockBookSearchProvider::new();
        provider.expect_search().times(1).returning(|_| {
            Err(ProviderError::Status {
                status: 500,
                message: "backend".into(),
            })
        });
        let (session, _) = session_with(0, provider).await;
        let mut notices = session.notices();

        assert!(session.search("Herbert", "Dune").await.is_err());
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Server communication error (code 500)");
    }

    #[tokio::test]
    async fn set_sort_persists_and_reloads() {
        let (session, _) = session_with(3, MockBookSearchProvider::new()).await;
        let by_name = SortPreference::new(SortField::Name, SortOrder::Asc);

        let reload = session.set_sort(by_name).await.unwrap().unwrap();
        assert_eq!(reload.finished().await, LoadOutcome::Loaded { fetched: 3 });
        assert_eq!(session.sort(), by_name);
        assert_eq!(session.preferences.load().await.unwrap(), by_name);

        assert!(session.set_sort(by_name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_draft_does_not_touch_the_store() {
        let (session, repo) = session_with(0, MockBookSearchProvider::new()).await;
        let draft = ItemDraft {
            name: "Unnamed".into(),
            disk_type: " ".into(),
            ..Default::default()
        };
        let err = session.add_draft(ItemKind::Disk, &draft).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(repo.total_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_unknown_item_only_notifies() {
        let (session, _) = session_with(2, MockBookSearchProvider::new()).await;
        let mut notices = session.notices();

        let update = session.delete_item(ItemId(42)).await.unwrap();
        assert!(!update.outcome);
        assert!(update.reload.is_none());
        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.message, "Item 42 was not found in the library");
    }
}
