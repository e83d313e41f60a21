//! Application state shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::session::AdminSessions;
use crate::auth::verifier::{AuthVerifier, StoreAuthVerifier};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::store::CatalogStore;
use crate::support::{DomainResolver, NotificationSink, SupportDesk};

#[derive(Clone)]
pub struct AppState {
    /// Data access for courses, progress, ratings, favorites and achievements
    pub catalog: Catalog,

    pub verifier: Arc<dyn AuthVerifier>,

    /// Logged-in admin sessions
    pub sessions: AdminSessions,

    pub support: Arc<SupportDesk>,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        verifier: Arc<dyn AuthVerifier>,
        sessions: AdminSessions,
        support: Arc<SupportDesk>,
    ) -> Self {
        Self {
            catalog,
            verifier,
            sessions,
            support,
        }
    }

    /// Wire everything around one store, verifying admins against it
    pub fn build(
        store: Arc<dyn CatalogStore>,
        resolver: Arc<dyn DomainResolver>,
        sink: Arc<dyn NotificationSink>,
        config: &AppConfig,
    ) -> Self {
        let verifier = Arc::new(StoreAuthVerifier::new(store.clone()));
        let support = SupportDesk::new(
            resolver,
            sink,
            Duration::from_secs(config.support.rate_limit_secs),
        );
        Self::new(
            Catalog::new(store),
            verifier,
            AdminSessions::new(config.admin.session_hours),
            Arc::new(support),
        )
    }
}
