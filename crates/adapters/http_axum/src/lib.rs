//! # backsync-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Expose mounted resources as Backbone-style REST endpoints
//!   (`/api/{collection}` and `/api/{collection}/{id}`)
//! - Map HTTP requests into dispatch service calls (driving adapter)
//! - Map dispatch results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `backsync-app` (ports and the dispatch service) and
//! `backsync-domain` (vocabulary used in request mapping). Never leaks
//! axum types into the application layer.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
