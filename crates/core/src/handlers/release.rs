//! Handler for the release callback endpoint.

use crate::SimpleLock;
use crate::model::PostActionIntegrationRequest;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use simplelock_locks::LockManager;
use simplelock_users::UserDirectory;
use tracing::debug;

/// Handler for `POST /plugins/{plugin_id}/api/release`.
///
/// Answers 400 with an empty body if the payload does not parse or names
/// no resource; 200 with a JSON reply otherwise.
pub(crate) async fn release_handler<LM, UD>(
    State(plugin): State<SimpleLock<LM, UD>>,
    body: Bytes,
) -> Response
where
    LM: LockManager,
    UD: UserDirectory,
{
    let request = match serde_json::from_slice::<PostActionIntegrationRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "malformed release request");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match plugin.handle_release(request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            debug!(error = %e, "rejected release request");
            e.into_response()
        }
    }
}
