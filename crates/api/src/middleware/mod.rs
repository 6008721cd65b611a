//! Request extractors implementing the authorization gate.
//!
//! - [`auth::AuthUser`] -- resolves `{user, role}` from a bearer token.
//! - [`rbac`] -- role-gated wrappers around [`auth::AuthUser`].

pub mod auth;
pub mod rbac;
