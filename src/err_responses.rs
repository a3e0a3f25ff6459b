use axum::response::{IntoResponse, Response};
use maud::html;

use crate::icons;

pub enum ErrorResponse {
    /// Inline alert swapped into the request's target.
    Alert,
}

pub trait MapErrorResponse<T> {
    fn map_err_response(self, mapper: ErrorResponse) -> Result<T, Response>;
}

impl<T, E: ToString> MapErrorResponse<T> for Result<T, E> {
    fn map_err_response(self, mapper: ErrorResponse) -> Result<T, Response> {
        self.map_err(|err| mapper.transform(err))
    }
}

impl ErrorResponse {
    pub fn transform<E: ToString>(&self, err: E) -> Response {
        let message = err.to_string();
        tracing::debug!(%message, "request ended with an error response");
        match self {
            Self::Alert => {
                html! { ."alert"."alert-error" role="alert" {(icons::error()) span {(message)}} }
                    .into_response()
            }
        }
    }
}
