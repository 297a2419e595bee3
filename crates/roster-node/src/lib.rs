//! # Roster Node
//!
//! HTTP service exposing CRUD operations over an in-memory collection of
//! user records.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Roster Node                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Request ID  ─>  Trace  ─>  Metrics  ─>  Catch panic        │
//! │                              │                              │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                    HTTP API Layer                     │  │
//! │  │  • Capability listing, health, metrics                │  │
//! │  │  • Users API (list, get, create, update, delete)      │  │
//! │  │  • Validation middleware on create/update             │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                              │                              │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │                 roster-users UserStore                │  │
//! │  │  • Insertion-ordered records behind one RwLock        │  │
//! │  │  • Monotonic id counter                               │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! PORT=3000 cargo run --bin roster-node
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Router, shared state, and error responses
//! - [`users_api`] - User CRUD endpoints
//! - [`validation`] - Body validation middleware
//! - [`config`] - Command-line and environment configuration
//! - [`observability`] - Structured logging, metrics, and request tracing
//!
//! ## Example: Building the Router
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use roster_users::UserStore;
//! use roster_node::api::{create_router, AppState};
//!
//! let state = AppState::new(Arc::new(UserStore::seeded()));
//! let app = create_router(state);
//! ```

pub mod api;
pub mod config;
pub mod observability;
pub mod users_api;
pub mod validation;
