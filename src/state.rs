// src/state.rs
use std::sync::Arc;
use crate::clock::Clock;
use crate::models::driver::Roster;
use crate::services::ledger::CashBook;
use crate::services::quota::{QuotaGuard, QuotaLimits};
use crate::sheets::SheetStore;
use crate::storage::KeyValueStore;

#[derive(Clone)]
pub struct AppState {
    pub trip_store: Arc<dyn SheetStore>,
    pub cash_book: Arc<CashBook>,
    pub guard: QuotaGuard,
    pub roster: Arc<Roster>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        trip_store: Arc<dyn SheetStore>,
        cash_store: Arc<dyn SheetStore>,
        cash_sheet: &str,
        kv: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        limits: QuotaLimits,
    ) -> Self {
        Self {
            trip_store,
            cash_book: Arc::new(CashBook::new(cash_store, kv.clone(), cash_sheet)),
            guard: QuotaGuard::new(kv, clock.clone(), limits),
            roster: Arc::new(Roster::default()),
            clock,
        }
    }
}
