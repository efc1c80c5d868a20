//! Shared application state handed to every handler.

use taller_core::StockPolicy;
use taller_db::{Database, TransactionEngine};

/// Shared application state.
///
/// Cheap to clone: the pool and the engine are handles over the same connections.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub engine: TransactionEngine,
}

impl AppState {
    pub fn new(db: Database, policy: StockPolicy) -> Self {
        let engine = TransactionEngine::new(db.clone(), policy);
        AppState { db, engine }
    }
}
