//! Query-string extractor with JSON rejections.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use cadview_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// [`Query`] whose parse failures answer 400 with the usual `{error, code}`
/// body instead of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Core(CoreError::Validation(rejection.body_text())))?;
        Ok(Self(value))
    }
}
