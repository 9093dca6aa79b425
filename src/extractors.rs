//! Helpers that turn axum's extractor rejections into [`AppError::Validation`],
//! so malformed bodies, query strings and path segments get the same
//! `400 {"error": ...}` response as every other rejected input.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or the query/path
//! equivalents) and unwrap it with the matching helper.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Json,
};
use tracing::debug;

use crate::error::AppError;

pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result.map(|Json(v)| v).map_err(|err| {
        debug!(error = %err.body_text(), "json body rejected");
        AppError::Validation(err.body_text())
    })
}

pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result.map(|Query(v)| v).map_err(|err| {
        debug!(error = %err.body_text(), "query string rejected");
        AppError::Validation(err.body_text())
    })
}

pub fn extract_path<T>(result: Result<Path<T>, PathRejection>) -> Result<T, AppError> {
    result.map(|Path(v)| v).map_err(|err| {
        debug!(error = %err.body_text(), "path rejected");
        AppError::Validation(err.body_text())
    })
}
