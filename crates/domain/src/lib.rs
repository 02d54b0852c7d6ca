//! # backsync-domain
//!
//! Pure vocabulary for the backsync CRUD dispatch system.
//!
//! ## Responsibilities
//! - Foundational value types: model identifiers, decoded write payloads,
//!   column schemas, and collection filters
//! - The verb set the dispatcher understands
//! - The error taxonomy shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod filter;
pub mod id;
pub mod method;
pub mod schema;
pub mod values;
