//! Pure domain logic for the noda to-do service.
//!
//! Nothing in this crate performs I/O. The persistence adapter (`noda-db`)
//! and the HTTP layer (`noda-api`) build on the types and validators here.

pub mod credentials;
pub mod error;
pub mod ids;
pub mod limits;
pub mod lists;
pub mod query;
pub mod roles;
pub mod settings;
pub mod task;
pub mod text;
pub mod types;
