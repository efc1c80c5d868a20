//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /api/products            list (search, category, lowStock)     │
//! │  POST   /api/products            create                 → 201          │
//! │  GET    /api/products/{id}       fetch one              → 404 unknown  │
//! │  PUT    /api/products/{id}       partial update         → 404 unknown  │
//! │  DELETE /api/products/{id}       delete                 → 204 always   │
//! │  GET    /api/transactions        history, newest first, with items     │
//! │  POST   /api/transactions        atomic create          → 201          │
//! │  GET    /api/stats               dashboard numbers                     │
//! │  GET    /health                  liveness + database check             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod health;
pub mod products;
pub mod stats;
pub mod transactions;
