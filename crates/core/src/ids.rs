//! Identifier parsing at the URL boundary.

use crate::error::CoreError;
use crate::types::DbId;

/// Length of the canonical hyphenated UUID rendering.
pub const UUID_LEN: usize = 36;

/// Parse a path or body identifier into a [`DbId`].
///
/// Anything that is not exactly 36 characters is a length error; a
/// 36-character string that does not parse is a format error.
pub fn parse_id(parameter: &str, raw: &str) -> Result<DbId, CoreError> {
    let length = raw.chars().count();
    if length != UUID_LEN {
        return Err(CoreError::InvalidUuidLength {
            parameter: parameter.to_string(),
            length,
        });
    }
    uuid::Uuid::try_parse(raw).map_err(|_| CoreError::InvalidUuidFormat {
        parameter: parameter.to_string(),
    })
}
