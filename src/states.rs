use crate::{
    clock::Clock,
    config::Config,
    identity::{ForwardedFor, PeerAddress, RequesterIdentity},
    models::DuplicateKeyPolicy,
    session::AccessGate,
    storage::DocumentStore,
};
use std::sync::Arc;

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// Cloned into every handler. The gate is the only piece that mutates
/// per request; the store serializes its own writes.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AccessGate>,
    pub store: Arc<DocumentStore>,
    pub identity: Arc<dyn RequesterIdentity>,
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl AppState {
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let identity: Arc<dyn RequesterIdentity> = if config.trust_forwarded_for {
            Arc::new(ForwardedFor)
        } else {
            Arc::new(PeerAddress)
        };

        Self {
            gate: Arc::new(AccessGate::new(config.session_timeout, clock)),
            store: Arc::new(DocumentStore::new(
                &config.document_path,
                &config.backup_dir,
            )),
            identity,
            duplicate_keys: config.duplicate_keys,
        }
    }
}
