//! The equation list orchestrator.
//!
//! Owns the gateway, the held collection and the filter state. The lock is
//! never held across a gateway call, so independent actions can be in flight
//! together and patch the collection in the order their responses arrive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mathhelper_common::Equation;
use mathhelper_filters::{predicates, FilterUpdate, Filters};
use mathhelper_gateway::{EquationGateway, ListQuery};
use tokio::sync::{broadcast, RwLock};
use tracing::{info, instrument, warn};

use crate::state::{ListInner, ListState, Notice};

pub struct EquationList {
    pub(crate) gateway: Arc<dyn EquationGateway>,
    query: ListQuery,
    pub(crate) inner: RwLock<ListInner>,
    filters: RwLock<Filters>,
    activated: AtomicBool,
    notices: broadcast::Sender<Notice>,
}

impl EquationList {
    /// A list that will fetch the whole collection, sorted by id.
    pub fn new(gateway: Arc<dyn EquationGateway>) -> Self {
        Self::with_query(gateway, ListQuery::default())
    }

    pub fn with_query(gateway: Arc<dyn EquationGateway>, query: ListQuery) -> Self {
        let (notices, _) = broadcast::channel(64);
        Self {
            gateway,
            query,
            inner: RwLock::new(ListInner::default()),
            filters: RwLock::new(Filters::default()),
            activated: AtomicBool::new(false),
            notices,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub(crate) fn notify(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }

    /// Runs the initial fetch. Only the first call does anything.
    pub async fn activate(&self) -> ListState {
        if self.activated.swap(true, Ordering::SeqCst) {
            return self.state().await;
        }
        self.reload().await
    }

    /// Fetches the collection again; this is the retry path out of `Error`.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> ListState {
        self.inner.write().await.loads_in_flight += 1;

        let result = self.gateway.fetch_all(&self.query).await;

        let mut inner = self.inner.write().await;
        match result {
            Ok(equations) => {
                let count = equations.len();
                inner.finish_load(equations);
                info!(count, "Equation list loaded");
                self.notify(Notice::Loaded { count: inner.state.equations().len() });
            }
            Err(e) => {
                let message = e.to_string();
                warn!(%message, "Equation list fetch failed");
                inner.fail_load(message.clone());
                self.notify(Notice::LoadFailed { message });
            }
        }
        inner.state.clone()
    }

    pub async fn state(&self) -> ListState {
        self.inner.read().await.state.clone()
    }

    /// Every held record, newest first after local creates.
    pub async fn equations(&self) -> Vec<Equation> {
        self.inner.read().await.state.equations().to_vec()
    }

    /// The held records that pass the current filters.
    pub async fn visible(&self) -> Vec<Equation> {
        let filters = self.filters.read().await;
        let inner = self.inner.read().await;
        predicates::visible(&filters, inner.state.equations())
            .cloned()
            .collect()
    }

    pub async fn filters(&self) -> Filters {
        self.filters.read().await.clone()
    }

    /// The single way to change the filters.
    pub async fn update_filters(&self, update: FilterUpdate) -> Filters {
        let mut filters = self.filters.write().await;
        *filters = std::mem::take(&mut *filters).apply(update);
        filters.clone()
    }

    /// Sets the solution-count range to `[0, ceiling]` unless one is set.
    pub async fn init_count_filter(&self) -> Filters {
        let ceiling = self.solutions_count_ceiling().await;
        self.update_filters(FilterUpdate::InitCountRange { min: 0, max: ceiling })
            .await
    }

    pub async fn solutions_count_ceiling(&self) -> usize {
        predicates::solutions_count_ceiling(self.inner.read().await.state.equations())
    }
}
