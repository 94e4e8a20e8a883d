//! Collection query surface shared by every listable resource.
//!
//! - `page` and `rpp` (results per page) are signed 64-bit decimals;
//!   non-positive values fall back to the defaults.
//! - `search` is trimmed; blank means "no filter".
//! - `sort_by` follows `^[+-][_A-Za-z][_A-Za-z0-9]+$` and may appear once.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_RPP: i64 = 10;

pub const PAGE_PARAM: &str = "page";
pub const RPP_PARAM: &str = "rpp";
pub const SEARCH_PARAM: &str = "search";
pub const SORT_PARAM: &str = "sort_by";

pub const SORT_PATTERN: &str = r"^[+-][_A-Za-z][_A-Za-z0-9]+$";

/// The grammar of `sort_by`, as reported to clients.
pub const SORT_RULES: [&str; 2] = [
    "The sort_by value must start with \"+\" (ascending) or \"-\" (descending).",
    "The sign must be followed by a column name of at least two characters that starts \
     with a letter or underscore and contains only letters, digits and underscores.",
];

static SORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SORT_PATTERN).expect("sort pattern is a valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A parsed `sort_by` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBy {
    pub column: String,
    pub direction: Direction,
}

impl SortBy {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if !SORT_RE.is_match(raw) {
            return Err(CoreError::QueryParameterNotParsed {
                parameter: SORT_PARAM.to_string(),
                rules: SORT_RULES.iter().map(|r| r.to_string()).collect(),
            });
        }
        let direction = if raw.starts_with('-') {
            Direction::Desc
        } else {
            Direction::Asc
        };
        Ok(Self {
            column: raw[1..].to_string(),
            direction,
        })
    }

    /// Resolve against a whitelist of sortable columns.
    ///
    /// Returns the whitelisted spelling so callers can interpolate it into
    /// SQL; `None` when the column is not sortable for this resource.
    pub fn resolve(&self, allowed: &[&'static str]) -> Option<(&'static str, Direction)> {
        allowed
            .iter()
            .find(|c| c.eq_ignore_ascii_case(&self.column))
            .map(|c| (*c, self.direction))
    }
}

/// Effective pagination after defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub rpp: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            rpp: DEFAULT_RPP,
        }
    }
}

impl Pagination {
    pub fn new(page: i64, rpp: i64) -> Self {
        Self {
            page: if page <= 0 { DEFAULT_PAGE } else { page },
            rpp: if rpp <= 0 { DEFAULT_RPP } else { rpp },
        }
    }

    pub fn limit(&self) -> i64 {
        self.rpp
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.rpp)
    }
}

/// Everything a collection endpoint needs from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub pagination: Pagination,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
}

fn parse_number(parameter: &str, raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| CoreError::BadQueryParameter {
            parameter: parameter.to_string(),
            reason: e.to_string(),
        })
}

impl CollectionQuery {
    /// Build from decoded query pairs. Unknown keys are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut page: Option<i64> = None;
        let mut rpp: Option<i64> = None;
        let mut search: Option<String> = None;
        let mut sort_raw: Option<&str> = None;

        for (key, value) in pairs {
            match key {
                PAGE_PARAM if page.is_none() => page = Some(parse_number(PAGE_PARAM, value)?),
                RPP_PARAM if rpp.is_none() => rpp = Some(parse_number(RPP_PARAM, value)?),
                SEARCH_PARAM if search.is_none() => search = Some(value.trim().to_string()),
                SORT_PARAM => {
                    if sort_raw.is_some() {
                        return Err(CoreError::MultipleValuesForQueryParameter {
                            parameter: SORT_PARAM.to_string(),
                        });
                    }
                    sort_raw = Some(value);
                }
                _ => {}
            }
        }

        let sort_by = sort_raw.map(SortBy::parse).transpose()?;

        Ok(Self {
            pagination: Pagination::new(page.unwrap_or(DEFAULT_PAGE), rpp.unwrap_or(DEFAULT_RPP)),
            search: search.filter(|s| !s.is_empty()),
            sort_by,
        })
    }

    /// `ORDER BY` body for this query, falling back to `default` when no
    /// sortable column was requested. Ties are broken by `id`.
    pub fn order_by(&self, allowed: &[&'static str], default: &str) -> String {
        self.order_by_then(allowed, default, "id")
    }

    /// Like [`CollectionQuery::order_by`] with an explicit tie-breaking column.
    pub fn order_by_then(&self, allowed: &[&'static str], default: &str, tiebreak: &str) -> String {
        match self.sort_by.as_ref().and_then(|s| s.resolve(allowed)) {
            Some((column, direction)) => {
                format!("{column} {}, {tiebreak} ASC", direction.as_sql())
            }
            None => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    fn parse(pairs: &[(&str, &str)]) -> Result<CollectionQuery, CoreError> {
        CollectionQuery::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn defaults_when_absent() {
        let q = parse(&[]).unwrap();
        assert_eq!(q.pagination, Pagination { page: 1, rpp: 10 });
        assert_eq!(q.search, None);
        assert_eq!(q.sort_by, None);
    }

    #[test]
    fn non_positive_values_fall_back() {
        let q = parse(&[("page", "0"), ("rpp", "-5")]).unwrap();
        assert_eq!(q.pagination, Pagination { page: 1, rpp: 10 });
    }

    #[test]
    fn bad_decimal_names_the_field() {
        assert_matches!(
            parse(&[("rpp", "ten")]),
            Err(CoreError::BadQueryParameter { parameter, .. }) if parameter == "rpp"
        );
        assert_matches!(
            parse(&[("page", "99999999999999999999")]),
            Err(CoreError::BadQueryParameter { parameter, .. }) if parameter == "page"
        );
    }

    #[test]
    fn blank_search_means_no_filter() {
        let q = parse(&[("search", "   ")]).unwrap();
        assert_eq!(q.search, None);
        let q = parse(&[("search", "  milk ")]).unwrap();
        assert_eq!(q.search.as_deref(), Some("milk"));
    }

    #[test]
    fn sort_grammar() {
        let q = parse(&[("sort_by", "-created_at")]).unwrap();
        assert_eq!(
            q.sort_by,
            Some(SortBy {
                column: "created_at".into(),
                direction: Direction::Desc,
            })
        );

        for bad in ["name", "+1abc", "+a", "*name", "+na-me", ""] {
            assert_matches!(
                parse(&[("sort_by", bad)]),
                Err(CoreError::QueryParameterNotParsed { rules, .. }) if rules.len() == 2,
                "{bad}"
            );
        }
    }

    #[test]
    fn duplicate_sort_is_rejected() {
        assert_matches!(
            parse(&[("sort_by", "+name"), ("sort_by", "-name")]),
            Err(CoreError::MultipleValuesForQueryParameter { parameter }) if parameter == "sort_by"
        );
    }

    #[test]
    fn order_by_uses_whitelist() {
        let q = parse(&[("sort_by", "+NAME")]).unwrap();
        assert_eq!(q.order_by(&["name"], "created_at DESC"), "name ASC, id ASC");

        let q = parse(&[("sort_by", "+password_hash")]).unwrap();
        assert_eq!(q.order_by(&["name"], "created_at DESC"), "created_at DESC");
    }

    #[test]
    fn order_by_then_uses_given_tiebreak() {
        let q = parse(&[("sort_by", "-updated_at")]).unwrap();
        assert_eq!(
            q.order_by_then(&["updated_at"], "key ASC", "key"),
            "updated_at DESC, key ASC"
        );
    }

    #[test]
    fn offset_saturates() {
        let p = Pagination::new(i64::MAX, i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
        assert_eq!(Pagination::new(3, 10).offset(), 20);
    }

    proptest! {
        #[test]
        fn prop_pagination_defaulting(page in any::<i64>(), rpp in any::<i64>()) {
            let p = Pagination::new(page, rpp);
            prop_assert_eq!(p.page, if page <= 0 { 1 } else { page });
            prop_assert_eq!(p.rpp, if rpp <= 0 { 10 } else { rpp });
        }

        #[test]
        fn prop_sort_accepted_iff_grammatical(raw in "[+\\-*a-zA-Z0-9_]{0,8}") {
            let grammatical = {
                let mut chars = raw.chars();
                let sign = chars.next();
                let first = chars.next();
                let rest: Vec<char> = chars.collect();
                matches!(sign, Some('+') | Some('-'))
                    && first.is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
                    && !rest.is_empty()
                    && rest.iter().all(|c| *c == '_' || c.is_ascii_alphanumeric())
            };
            prop_assert_eq!(SortBy::parse(&raw).is_ok(), grammatical);
        }
    }
}
