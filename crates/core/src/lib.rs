//! Domain logic for the labstock inventory platform.
//!
//! Pure types and rules shared by the database and API layers:
//!
//! - [`lifecycle`] -- the request status state machine and its authorization gates.
//! - [`roles`] -- the closed user-role enum and role predicates.
//! - [`catalog`] -- component category/location enums and quantity rules.
//! - [`error`] -- the [`error::CoreError`] taxonomy.
//!
//! This crate has no database or HTTP dependencies by design; everything here
//! is unit-testable without I/O.

pub mod catalog;
pub mod error;
pub mod lifecycle;
pub mod roles;
pub mod types;
