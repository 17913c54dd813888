use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_macros::debug_handler;
use contact_core::CONTACT_PATH;
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::dto::{ContactRequest, ContactResponse, INVALID_BODY};
use crate::service::{ContactService, ContactServiceError};

pub fn router(service: Arc<ContactService>) -> Router {
    Router::new()
        .route(CONTACT_PATH, post(send_message))
        .route("/", get(health_check))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

#[debug_handler]
pub async fn send_message(
    State(service): State<Arc<ContactService>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Rejected contact request body: {e}");
            return (StatusCode::BAD_REQUEST, Json(ContactResponse::new(INVALID_BODY)))
                .into_response();
        }
    };

    match service.send_message(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(ContactServiceError::Invalid(e)) => {
            tracing::warn!("Rejected contact submission, {} field: {e}", e.field());
            (StatusCode::BAD_REQUEST, Json(ContactResponse::new(e.to_string()))).into_response()
        }
        Err(e @ ContactServiceError::AddressFormat(_)) => {
            tracing::warn!("Rejected contact submission: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(ContactResponse::new(
                    contact_core::ValidationError::EmailFormat.to_string(),
                )),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to send contact message: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse::failed()),
            )
                .into_response()
        }
    }
}

#[debug_handler]
pub async fn health_check() -> Response {
    (StatusCode::OK, "Hello from contact service!").into_response()
}
