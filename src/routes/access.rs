use crate::{errors::ApiError, identity::Requester, session::Admission, states::AppState};
use axum::extract::State;

/// GET /access
/// Tells the editor whether it could take the session, without taking it.
pub async fn probe_access(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<&'static str, ApiError> {
    match state.gate.probe(requester.id()) {
        Admission::Allowed => Ok("You can get access!"),
        Admission::Denied { remaining_secs } => Err(ApiError::AccessConflict(remaining_secs)),
    }
}
