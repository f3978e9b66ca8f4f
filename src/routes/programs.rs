use crate::{
    dto::{ProgramForm, SaveSummary},
    errors::ApiError,
    identity::Requester,
    session::Admission,
    states::AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::{error, info};

/// Pass the gate and take over the session, or bail with the countdown.
fn enter_session(state: &AppState, requester: &Requester) -> Result<(), ApiError> {
    match state.gate.admit(requester.id()) {
        Admission::Allowed => Ok(()),
        Admission::Denied { remaining_secs } => Err(ApiError::AccessConflict(remaining_secs)),
    }
}

/// GET /programs
/// Response: the catalog file, byte for byte
pub async fn get_programs(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<impl IntoResponse, ApiError> {
    enter_session(&state, &requester)?;

    let data = state.store.read().await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], data))
}

/// POST /programs
/// Body: records[][key]=...&records[][name]=...&records[][rss]=...
///       &records[][image]=...&records[][category]=...&records[][description]=...
pub async fn save_programs(
    State(state): State<AppState>,
    requester: Requester,
    body: Bytes,
) -> Result<String, ApiError> {
    enter_session(&state, &requester)?;

    let catalog = ProgramForm::parse(&body)?.into_catalog(state.duplicate_keys)?;
    let data = catalog.to_pretty_json()?;

    let report = state.store.replace(data).await?;

    info!("Wrote {} bytes", report.bytes);
    match &report.backup {
        Ok(path) => info!("Backup saved to {}", path.display()),
        Err(e) => error!("Backup failed: {}", e),
    }

    Ok(SaveSummary {
        records: catalog.len(),
        bytes: report.bytes,
        backed_up: report.backup.is_ok(),
    }
    .to_string())
}
