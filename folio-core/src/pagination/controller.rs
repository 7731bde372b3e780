use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use folio_model::{CatalogItem, SortPreference};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{LoadOutcome, Notice, PaginationSnapshot, PaginationState};
use super::window::{Edge, PageRequest, Window};
use super::{NOTICE_CAPACITY, PaginationConfig};
use crate::database::ItemRepository;
use crate::error::CatalogError;

const LOAD_PANICKED: &str = "Loading stopped unexpectedly, try again";

/// Awaitable handle of a spawned load.
#[derive(Debug)]
pub struct LoadHandle {
    generation: u64,
    task: JoinHandle<LoadOutcome>,
}

impl LoadHandle {
    /// Generation the load was started under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Outcome of the load. A task that was aborted resolves to
    /// [`LoadOutcome::Superseded`]; a panicked task is logged and reported
    /// as [`LoadOutcome::Failed`].
    pub async fn finished(self) -> LoadOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => LoadOutcome::Superseded,
            Err(err) => {
                warn!(generation = self.generation, error = %err, "load task panicked");
                LoadOutcome::Failed(LOAD_PANICKED.to_string())
            }
        }
    }
}

/// Owns the catalog window and the loads that move it.
///
/// Every operation returns immediately; loads run as Tokio tasks, so the
/// controller must be driven from inside a runtime. At most one load is in
/// flight: incremental loads requested while another load runs are dropped,
/// and [`load_initial`](Self::load_initial) cancels whatever is running.
#[derive(Clone)]
pub struct PaginationController {
    inner: Arc<Inner>,
}

struct Inner {
    repo: Arc<dyn ItemRepository>,
    config: PaginationConfig,
    snapshot: watch::Sender<PaginationSnapshot>,
    notices: broadcast::Sender<Notice>,
    flight: Mutex<CancellationToken>,
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("config", &self.inner.config)
            .field("snapshot", &*self.inner.snapshot.borrow())
            .finish_non_exhaustive()
    }
}

impl PaginationController {
    pub fn new(
        repo: Arc<dyn ItemRepository>,
        config: PaginationConfig,
        sort: SortPreference,
    ) -> Self {
        let (snapshot, _) = watch::channel(PaginationSnapshot::new(sort));
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                repo,
                config,
                snapshot,
                notices,
                flight: Mutex::new(CancellationToken::new()),
            }),
        }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.inner.config
    }

    /// Latest window, state and sort. New receivers see the current value.
    pub fn subscribe(&self) -> watch::Receiver<PaginationSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Notices published after this call. Earlier ones are not replayed.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    pub fn snapshot(&self) -> PaginationSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn state(&self) -> PaginationState {
        self.inner.snapshot.borrow().state.clone()
    }

    pub fn sort(&self) -> SortPreference {
        self.inner.snapshot.borrow().sort
    }

    pub fn notify(&self, notice: Notice) {
        self.inner.notify(notice);
    }

    /// Reset to the first page in `sort` order, cancelling any load in flight.
    pub fn load_initial(&self, sort: SortPreference) -> LoadHandle {
        let token = self.inner.replace_flight();

        let mut generation = 0;
        self.inner.snapshot.send_modify(|snap| {
            snap.generation += 1;
            generation = snap.generation;
            snap.sort = sort;
            snap.state = PaginationState::LoadingInitial;
        });
        debug!(generation, %sort, "initial load started");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move { inner.run_initial(generation, sort, token).await });
        LoadHandle { generation, task }
    }

    /// Same as a fresh [`load_initial`](Self::load_initial) in the new order.
    pub fn on_sort_changed(&self, sort: SortPreference) -> LoadHandle {
        self.load_initial(sort)
    }

    /// Full reload keeping the current order.
    pub fn reload(&self) -> LoadHandle {
        self.load_initial(self.sort())
    }

    /// Grow the window towards the start of the catalog. `None` when the
    /// window already starts at offset 0 or another load is in flight.
    pub fn load_more_before(&self) -> Option<LoadHandle> {
        self.load_more(Edge::Before)
    }

    /// Grow the window towards the end of the catalog. `None` when the
    /// window already reaches the total count or another load is in flight.
    pub fn load_more_after(&self) -> Option<LoadHandle> {
        self.load_more(Edge::After)
    }

    /// Which end needs loading when the row at `visible_index` (relative to
    /// the window) is on screen.
    pub fn should_prefetch(&self, visible_index: usize) -> Option<Edge> {
        let snap = self.inner.snapshot.borrow();
        if !snap.state.is_idle() {
            return None;
        }
        prefetch_edge(&snap.window, visible_index, self.inner.config.prefetch_distance)
    }

    fn load_more(&self, edge: Edge) -> Option<LoadHandle> {
        let load_more_count = self.inner.config.load_more_count;
        let mut planned = None;

        self.inner.snapshot.send_if_modified(|snap| {
            if !snap.state.is_idle() {
                return false;
            }
            let request = match edge {
                Edge::Before => snap.window.request_before(load_more_count),
                Edge::After => snap.window.request_after(load_more_count),
            };
            let Some(request) = request else {
                return false;
            };
            snap.state = match edge {
                Edge::Before => PaginationState::LoadingBefore,
                Edge::After => PaginationState::LoadingAfter,
            };
            planned = Some((request, snap.generation, snap.sort));
            true
        });

        let (request, generation, sort) = planned?;
        debug!(
            ?edge,
            generation,
            offset = request.offset,
            limit = request.limit,
            "incremental load started"
        );

        let token = self.inner.current_flight();
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            inner
                .run_more(edge, request, generation, sort, token)
                .await
        });
        Some(LoadHandle { generation, task })
    }
}

impl Inner {
    fn notify(&self, notice: Notice) {
        // No receivers is fine: notices are not retained.
        let _ = self.notices.send(notice);
    }

    fn replace_flight(&self) -> CancellationToken {
        let mut flight = self.flight.lock().unwrap_or_else(PoisonError::into_inner);
        flight.cancel();
        *flight = CancellationToken::new();
        flight.clone()
    }

    fn current_flight(&self) -> CancellationToken {
        self.flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `update` only if no newer initial load has started.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut PaginationSnapshot)) -> bool {
        self.snapshot.send_if_modified(|snap| {
            if snap.generation != generation {
                return false;
            }
            update(snap);
            true
        })
    }

    /// Run `work` under the load timeout. `None` when cancelled first.
    async fn bounded<T>(
        &self,
        work: impl Future<Output = Result<T, CatalogError>>,
        token: &CancellationToken,
    ) -> Option<Result<T, CatalogError>> {
        let limit = self.config.load_timeout;
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            outcome = tokio::time::timeout(limit, work) => {
                Some(outcome.unwrap_or_else(|_| Err(CatalogError::Timeout(limit))))
            }
        }
    }

    async fn run_initial(
        &self,
        generation: u64,
        sort: SortPreference,
        token: CancellationToken,
    ) -> LoadOutcome {
        let repo = Arc::clone(&self.repo);
        let page_size = self.config.page_size;
        let work = async move {
            let total = repo.total_count().await?;
            let items = if total == 0 {
                Vec::new()
            } else {
                repo.page(page_size, 0, sort).await?
            };
            Ok::<_, CatalogError>((total, items))
        };

        let Some(result) = self.bounded(work, &token).await else {
            debug!(generation, "initial load cancelled");
            return LoadOutcome::Superseded;
        };

        match result {
            Ok((total, items)) => {
                let fetched = items.len();
                let applied = self.apply(generation, |snap| {
                    snap.window = Window::new(0, items, total.max(fetched));
                    snap.state = PaginationState::Idle;
                });
                if !applied {
                    return LoadOutcome::Superseded;
                }
                info!(generation, total, fetched, "catalog window loaded");
                LoadOutcome::Loaded { fetched }
            }
            Err(err) => {
                let message = err.user_message();
                let applied = self.apply(generation, |snap| {
                    snap.window = Window::default();
                    snap.state = PaginationState::Error(message.clone());
                });
                if !applied {
                    return LoadOutcome::Superseded;
                }
                warn!(generation, error = %err, "initial load failed");
                LoadOutcome::Failed(message)
            }
        }
    }

    async fn run_more(
        &self,
        edge: Edge,
        request: PageRequest,
        generation: u64,
        sort: SortPreference,
        token: CancellationToken,
    ) -> LoadOutcome {
        let repo = Arc::clone(&self.repo);
        let work = async move {
            let items: Vec<CatalogItem> = repo.page(request.limit, request.offset, sort).await?;
            Ok::<_, CatalogError>(items)
        };

        let Some(result) = self.bounded(work, &token).await else {
            debug!(?edge, generation, "incremental load cancelled");
            return LoadOutcome::Superseded;
        };

        let page_size = self.config.page_size;
        match result {
            Ok(mut items) => {
                items.truncate(request.limit);
                let fetched = items.len();
                let applied = self.apply(generation, |snap| {
                    match edge {
                        Edge::Before => snap.window.prepend(items, page_size),
                        Edge::After => snap.window.append(items, page_size),
                    }
                    snap.state = PaginationState::Idle;
                });
                if !applied {
                    return LoadOutcome::Superseded;
                }
                debug!(?edge, generation, fetched, "window extended");
                LoadOutcome::Loaded { fetched }
            }
            Err(err) => {
                let message = err.user_message();
                let applied = self.apply(generation, |snap| {
                    snap.state = PaginationState::Idle;
                });
                if !applied {
                    return LoadOutcome::Superseded;
                }
                warn!(?edge, generation, error = %err, "incremental load failed");
                self.notify(Notice::error(message.clone()));
                LoadOutcome::Failed(message)
            }
        }
    }
}

/// The nearer edge within `distance` rows of `visible_index`, if that edge
/// still has items beyond it.
fn prefetch_edge(window: &Window, visible_index: usize, distance: usize) -> Option<Edge> {
    let len = window.len();
    if len == 0 {
        return None;
    }
    let index = visible_index.min(len - 1);
    let to_head = index;
    let to_tail = len - 1 - index;

    let before = (!window.at_start() && to_head <= distance).then_some(to_head);
    let after = (!window.reaches_end() && to_tail <= distance).then_some(to_tail);
    match (before, after) {
        (Some(head), Some(tail)) if head < tail => Some(Edge::Before),
        (_, Some(_)) => Some(Edge::After),
        (Some(_), None) => Some(Edge::Before),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryItemRepository;
    use folio_model::{ItemId, NewItem, SortField, SortOrder};

    async fn controller_with(count: usize) -> PaginationController {
        let repo = InMemoryItemRepository::new();
        repo.insert_all(
            (0..count)
                .map(|i| NewItem::disk(format!("Disk {i:03}"), "CD"))
                .collect(),
        )
        .await
        .unwrap();
        PaginationController::new(
            Arc::new(repo),
            PaginationConfig::default(),
            SortPreference::new(SortField::Name, SortOrder::Asc),
        )
    }

    fn window_ids(snap: &PaginationSnapshot) -> Vec<i64> {
        snap.window.items.iter().map(|i| i.id.as_i64()).collect()
    }

    #[tokio::test]
    async fn panicked_load_is_reported_as_failure() {
        let task = tokio::spawn(async {
            let outcome: Option<LoadOutcome> = None;
            outcome.expect("load task blew up")
        });
        let handle = LoadHandle { generation: 7, task };
        assert_eq!(
            handle.finished().await,
            LoadOutcome::Failed(LOAD_PANICKED.to_string())
        );
    }

    #[tokio::test]
    async fn aborted_load_is_superseded() {
        let task = tokio::spawn(async {
            std::future::pending::<()>().await;
            LoadOutcome::Superseded
        });
        task.abort();
        let handle = LoadHandle { generation: 1, task };
        assert_eq!(handle.finished().await, LoadOutcome::Superseded);
    }

    #[tokio::test]
    async fn incremental_loads_are_dropped_while_busy() {
        let controller = controller_with(100).await;
        let sort = controller.sort();
        let handle = controller.load_initial(sort);
        assert!(controller.load_more_after().is_none());
        assert!(controller.load_more_before().is_none());
        assert_eq!(handle.finished().await, LoadOutcome::Loaded { fetched: 30 });

        let after = controller.load_more_after().unwrap();
        assert!(controller.load_more_after().is_none());
        assert_eq!(after.finished().await, LoadOutcome::Loaded { fetched: 8 });
        assert!(controller.state().is_idle());
    }

    #[tokio::test]
    async fn second_initial_load_supersedes_first() {
        let controller = controller_with(40).await;
        let sort = controller.sort();
        let first = controller.load_initial(sort);
        let second = controller.load_initial(sort);
        assert!(second.generation() > first.generation());

        assert_eq!(first.finished().await, LoadOutcome::Superseded);
        assert_eq!(second.finished().await, LoadOutcome::Loaded { fetched: 30 });
        assert_eq!(controller.snapshot().generation, 2);
    }

    #[tokio::test]
    async fn scrolling_down_then_up_returns_to_first_page() {
        let controller = controller_with(100).await;
        controller.load_initial(controller.sort()).finished().await;
        let first_page = window_ids(&controller.snapshot());

        for _ in 0..3 {
            controller.load_more_after().unwrap().finished().await;
        }
        let snap = controller.snapshot();
        assert_eq!(snap.window.offset, 24);
        assert_eq!(snap.window.len(), 30);

        while let Some(handle) = controller.load_more_before() {
            handle.finished().await;
        }
        let snap = controller.snapshot();
        assert_eq!(snap.window.offset, 0);
        assert_eq!(window_ids(&snap), first_page);
    }

    #[tokio::test]
    async fn subscribers_observe_the_loaded_window() {
        let controller = controller_with(5).await;
        let mut rx = controller.subscribe();
        controller.load_initial(controller.sort());
        let snap = rx
            .wait_for(|snap| snap.state.is_idle() && snap.generation == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(snap.window.len(), 5);
        assert_eq!(snap.window.items[0].id, ItemId(1));
    }

    #[tokio::test]
    async fn prefetch_points_at_the_near_edge() {
        let controller = controller_with(100).await;
        assert_eq!(controller.should_prefetch(0), None);

        controller.load_initial(controller.sort()).finished().await;
        assert_eq!(controller.should_prefetch(0), None);
        assert_eq!(controller.should_prefetch(10), None);
        assert_eq!(controller.should_prefetch(24), Some(Edge::After));
        assert_eq!(controller.should_prefetch(29), Some(Edge::After));

        controller.load_more_after().unwrap().finished().await;
        assert_eq!(controller.should_prefetch(5), Some(Edge::Before));
        assert_eq!(controller.should_prefetch(6), None);
    }
}
