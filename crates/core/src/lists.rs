//! List kinds, including the three reserved per-user lists.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::task::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Regular,
    Today,
    Tomorrow,
    Deferred,
}

/// The reserved kinds, in the order they are provisioned at sign-up.
pub const RESERVED_KINDS: [ListKind; 3] = [ListKind::Today, ListKind::Tomorrow, ListKind::Deferred];

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Regular => "regular",
            ListKind::Today => "today",
            ListKind::Tomorrow => "tomorrow",
            ListKind::Deferred => "deferred",
        }
    }

    /// Reserved lists are always scattered and can never be renamed,
    /// moved, scattered or deleted.
    pub fn is_reserved(self) -> bool {
        self != ListKind::Regular
    }

    /// Display name given to a reserved list when it is provisioned.
    pub fn default_name(self) -> &'static str {
        match self {
            ListKind::Regular => "Untitled",
            ListKind::Today => "Today",
            ListKind::Tomorrow => "Tomorrow",
            ListKind::Deferred => "Deferred",
        }
    }
}

impl FromStr for ListKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(ListKind::Regular),
            "today" => Ok(ListKind::Today),
            "tomorrow" => Ok(ListKind::Tomorrow),
            "deferred" => Ok(ListKind::Deferred),
            other => Err(UnknownVariant {
                kind: "list kind",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ListKind {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Refusal messages for operations on reserved lists.
pub fn reserved_refusal(kind: ListKind, operation: &str) -> String {
    format!("The {} list is reserved and cannot be {operation}.", kind.as_str())
}
