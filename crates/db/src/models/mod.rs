//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A camelCase `Serialize` response shape where the row itself is not safe
//!   or not sufficient to expose (users hide the password hash, requests
//!   embed their items)
//! - Create DTOs for inserts

pub mod component;
pub mod request;
pub mod user;
