//! Shared response shapes for API handlers.
//!
//! - [`Collection`] wraps every paginated listing as
//!   `{page, rpp, retrieved, payload}`.
//! - [`Created`] answers 201 with a `{<resource>_id}` body.
//! - [`updated`] turns an update outcome into 204 or a 303 redirect.

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use noda_core::query::Pagination;
use serde::Serialize;

use crate::services::Update;

/// One page of a collection.
#[derive(Debug, Serialize)]
pub struct Collection<T: Serialize> {
    pub page: i64,
    pub rpp: i64,
    /// Number of items actually returned, at most `rpp`.
    pub retrieved: usize,
    pub payload: Vec<T>,
}

impl<T: Serialize> Collection<T> {
    pub fn new(pagination: Pagination, payload: Vec<T>) -> Self {
        Self {
            page: pagination.page,
            rpp: pagination.rpp,
            retrieved: payload.len(),
            payload,
        }
    }
}

/// `201 Created` with a JSON body.
#[derive(Debug)]
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// `303 See Other` pointing at a canonical resource URL.
#[derive(Debug)]
pub struct SeeOther(pub String);

impl IntoResponse for SeeOther {
    fn into_response(self) -> Response {
        (StatusCode::SEE_OTHER, [(LOCATION, self.0)]).into_response()
    }
}

/// 204 when something changed, otherwise a redirect to `location`.
pub fn updated(outcome: Update, location: String) -> Response {
    match outcome {
        Update::Applied => StatusCode::NO_CONTENT.into_response(),
        Update::Nothing => SeeOther(location).into_response(),
    }
}
