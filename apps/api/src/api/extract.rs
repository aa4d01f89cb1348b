// Extractors whose rejections render as ApiError bodies

use axum::extract::{FromRequest, FromRequestParts};

use crate::api::errors::ApiError;

/// JSON body; malformed or incomplete bodies are a 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string; missing or unparsable parameters are a 400
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters; a malformed id is a 400
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
