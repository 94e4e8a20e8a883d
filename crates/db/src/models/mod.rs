//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for partial updates

pub mod attachment;
pub mod group;
pub mod list;
pub mod setting;
pub mod step;
pub mod tag;
pub mod task;
pub mod user;
