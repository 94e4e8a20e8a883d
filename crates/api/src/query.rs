//! Shared query parameter extractors for API handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use noda_core::error::CoreError;
use noda_core::query::CollectionQuery;

use crate::error::AppError;

/// `page`, `rpp`, `search` and `sort_by`, parsed with the collection grammar.
///
/// Unknown keys are ignored so endpoint-specific flags can share the query
/// string.
#[derive(Debug, Clone, Default)]
pub struct ListParams(pub CollectionQuery);

impl<S: Send + Sync> FromRequestParts<S> for ListParams {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts)?;
        let query = CollectionQuery::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        Ok(ListParams(query))
    }
}

fn query_pairs(parts: &Parts) -> Result<Vec<(String, String)>, AppError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)?;
    Ok(pairs)
}

const ALL_PARAM: &str = "all";

/// The `all` flag of `GET /me/lists`. Absent means `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllParams {
    pub all: bool,
}

impl AllParams {
    fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self, CoreError> {
        let mut all = None;
        for (key, value) in pairs {
            if key != ALL_PARAM {
                continue;
            }
            if all.is_some() {
                return Err(CoreError::MultipleValuesForQueryParameter {
                    parameter: ALL_PARAM.to_string(),
                });
            }
            let flag = value.parse::<bool>().map_err(|_| CoreError::BadQueryParameter {
                parameter: ALL_PARAM.to_string(),
                reason: format!("expected true or false, got {value:?}"),
            })?;
            all = Some(flag);
        }
        Ok(Self {
            all: all.unwrap_or(false),
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AllParams {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(parts)?;
        Ok(Self::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?)
    }
}
