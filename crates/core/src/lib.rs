pub mod collection;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use collection::board::IncomeBoard;
use errors::CoreError;
use gateway::http::HttpGateway;
use gateway::traits::Gateway;
use models::domain::EntryDomain;
use models::settings::ClientConfig;
use services::{
    analytics_service::AnalyticsService, budget_service::BudgetService, entry_service::EntryService,
    goal_service::GoalService, normalizer::Normalizer, palette_service::PaletteService,
};
use storage::memory::MemoryStore;
use storage::traits::KeyValueStore;

/// Main entry point for the Finance Tracker core library.
/// Wires the gateway, palette store and normalizer into one service per domain.
#[must_use]
pub struct FinanceTracker {
    gateway: Arc<dyn Gateway>,
    palette: Arc<PaletteService>,
    normalizer: Arc<Normalizer>,
    income: EntryService,
    expenses: EntryService,
    budgets: BudgetService,
    goals: GoalService,
    analytics: AnalyticsService,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("gateway", &self.gateway.name())
            .field("today", &self.normalizer.today())
            .finish()
    }
}

impl FinanceTracker {
    /// Connect to the backend described by `config` over HTTP.
    ///
    /// Palette assignments persist to `config.color_store_path` when set
    /// (native only), otherwise they live in memory.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::new(config)?);
        let store = Self::open_store(config)?;
        Ok(Self::with_gateway(gateway, store))
    }

    /// Build on any gateway and store (tests, alternative transports).
    pub fn with_gateway(gateway: Arc<dyn Gateway>, store: Arc<dyn KeyValueStore>) -> Self {
        let palette = Arc::new(PaletteService::new(store.clone()));
        let normalizer = Arc::new(Normalizer::new(palette.clone()));
        Self::build(gateway, store, palette, normalizer)
    }

    /// Like `with_gateway`, with date defaults pinned to `today`.
    pub fn with_fixed_date(
        gateway: Arc<dyn Gateway>,
        store: Arc<dyn KeyValueStore>,
        today: chrono::NaiveDate,
    ) -> Self {
        let palette = Arc::new(PaletteService::new(store.clone()));
        let normalizer = Arc::new(Normalizer::new(palette.clone()).with_fixed_date(today));
        Self::build(gateway, store, palette, normalizer)
    }

    // ── Domain services ─────────────────────────────────────────────

    pub fn income(&self) -> &EntryService {
        &self.income
    }

    pub fn expenses(&self) -> &EntryService {
        &self.expenses
    }

    pub fn budgets(&self) -> &BudgetService {
        &self.budgets
    }

    pub fn goals(&self) -> &GoalService {
        &self.goals
    }

    pub fn analytics(&self) -> &AnalyticsService {
        &self.analytics
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn palette(&self) -> &PaletteService {
        &self.palette
    }

    /// A fresh, empty income board bound to the income service.
    /// Call `load()` on it to fetch the server's list.
    pub fn income_board(&self) -> IncomeBoard {
        IncomeBoard::new(self.income.clone(), self.palette.clone())
    }

    // ── Internal ────────────────────────────────────────────────────

    #[cfg(not(target_arch = "wasm32"))]
    fn open_store(config: &ClientConfig) -> Result<Arc<dyn KeyValueStore>, CoreError> {
        Ok(match &config.color_store_path {
            Some(path) => Arc::new(storage::file::FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        })
    }

    #[cfg(target_arch = "wasm32")]
    fn open_store(_config: &ClientConfig) -> Result<Arc<dyn KeyValueStore>, CoreError> {
        Ok(Arc::new(MemoryStore::new()))
    }

    fn build(
        gateway: Arc<dyn Gateway>,
        store: Arc<dyn KeyValueStore>,
        palette: Arc<PaletteService>,
        normalizer: Arc<Normalizer>,
    ) -> Self {
        let income = EntryService::new(EntryDomain::Income, gateway.clone(), normalizer.clone());
        let expenses = EntryService::new(EntryDomain::Expense, gateway.clone(), normalizer.clone());
        let budgets = BudgetService::new(gateway.clone(), normalizer.clone());
        let goals = GoalService::new(gateway.clone()).with_history(store);

        Self {
            gateway,
            palette,
            normalizer,
            income,
            expenses,
            budgets,
            goals,
            analytics: AnalyticsService::new(),
        }
    }
}
