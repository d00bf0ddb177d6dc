mod contact;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::error;

use crate::{
    api_error::{ErrorBody, INTERNAL_ERROR_MESSAGE},
    state::AppState,
};

/// Room for the text fields and multipart framing on top of the image itself.
const FORM_FIELDS_ALLOWANCE: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.upload_handler.max_file_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_FIELDS_ALLOWANCE);
    let uploads = ServeDir::new(state.upload_handler.dir());

    Router::new()
        .route("/api/contact", post(contact::submit_contact_form))
        .layer(DefaultBodyLimit::max(body_limit))
        .nest_service("/uploads", uploads)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!("Request handler panicked: {detail}");

    let body = ErrorBody {
        error: INTERNAL_ERROR_MESSAGE.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
