//! Service container for dependency injection
//!
//! Wires up the link service with its transport.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::config::Settings;
use crate::infrastructure::traits::{HttpTransport, ReqwestTransport};

/// Container holding all application services.
pub struct ServiceContainer {
    pub links: LinkService,
}

impl ServiceContainer {
    /// Create a new service container with the real reqwest transport.
    ///
    /// HTTP clients are built lazily, on the first request.
    pub fn new(settings: Settings) -> Self {
        let transport = ReqwestTransport::new(settings.timeout());
        Self::with_deps(settings, Arc::new(transport))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            links: LinkService::new(Arc::new(settings), transport),
        }
    }
}
