// ============================================================================
// PROGRAM CATALOG EDITOR - process startup
// ============================================================================

use programedit::{
    AppState, Config,
    clock::SystemClock,
    errors::StartupError,
    logging,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logging
    logging::init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    // The catalog has to exist up front; we never create it ourselves
    if !config.document_path.is_file() {
        return Err(StartupError::MissingDocument(config.document_path));
    }
    info!("Program file path is {}", config.document_path.display());

    if !config.backup_dir.is_dir() {
        info!("Creating backup directory in {}", config.backup_dir.display());
        if let Err(e) = std::fs::create_dir_all(&config.backup_dir) {
            warn!("Couldn't create backup dir ({}), saves will not be backed up", e);
        }
    }
    info!("Backup directory is {}", config.backup_dir.display());
    info!("Session timeout is {:?}", config.session_timeout);

    let state = AppState::new(&config, Arc::new(SystemClock));
    let app = programedit::app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.listen_addr.to_string(),
            source,
        })?;

    info!("Server running on http://{}", config.listen_addr);
    info!("Endpoints:");
    info!("  GET    /programs  - Read the catalog (takes the session)");
    info!("  POST   /programs  - Replace the catalog (takes the session)");
    info!("  GET    /access    - Check whether the session is free");
    info!("  GET    /*         - Static files from {}", config.public_dir.display());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(StartupError::Serve)
}
