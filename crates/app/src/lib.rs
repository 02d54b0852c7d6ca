//! # backsync-app
//!
//! Application layer — the CRUD dispatch use-case and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define the model port adapters must implement:
//!   - [`ports::Model`] — lifecycle, schema, and collection queries for one
//!     resource instance
//!   - [`ports::ModelSource`] — the injected strategy resolving an optional
//!     identifier into a model
//! - Map HTTP verbs onto model lifecycle operations
//!   ([`services::crud_service::CrudService`])
//! - Render models into JSON documents through the flat-map capability hook
//!
//! ## Dependency rule
//! Depends on `backsync-domain` only. Never imports adapter crates;
//! adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
