//! Request middleware and the extractors they feed.
//!
//! - [`auth::require_auth`] -- Verifies the bearer token and stores [`auth::AuthUser`].
//! - [`rbac::require_admin`] -- Requires the `admin` role; [`rbac::RequireAdmin`] extracts it.
//! - [`content_type::require_json`] -- Rejects bodies that are not `application/json`.
//! - [`options::answer_options`] -- Answers bare `OPTIONS` requests.

pub mod auth;
pub mod content_type;
pub mod options;
pub mod rbac;
