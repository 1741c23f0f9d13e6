use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::dependencies::AppState;
use crate::domain::user::Viewer;
use crate::services::response::ServiceError;

/// Identity header set by the authenticating gateway in front of this service.
pub const VIEWER_HEADER: &str = "x-user-id";

/// Loads the requesting user and hands it to the handler as `Extension<Viewer>`.
pub async fn resolve_viewer<B>(
	State(state): State<AppState>,
	mut request: Request<B>,
	next: Next<B>,
) -> Result<Response, ServiceError> {
	let headers = request.headers();

	let viewer_id = headers
		.get(VIEWER_HEADER)
		.ok_or_else(|| ServiceError::Validation(format!("missing {VIEWER_HEADER} header")))?;

	let viewer_id: i64 = viewer_id
		.to_str()
		.ok()
		.and_then(|value| value.trim().parse().ok())
		.ok_or_else(|| ServiceError::Validation(format!("invalid {VIEWER_HEADER} header")))?;

	let viewer = state.storage.users.get_by_id(viewer_id).await?;
	tracing::debug!(viewer_id, "viewer resolved");

	let extensions = request.extensions_mut();
	extensions.insert(Viewer(viewer));

	Ok(next.run(request).await)
}
