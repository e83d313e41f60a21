//! Admin credential checks.

use async_trait::async_trait;
use std::sync::Arc;

use super::password;
use crate::store::CatalogStore;

/// Decides whether an email/password pair belongs to an admin.
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> bool;
}

/// Looks the admin row up in the catalog store and checks its argon2 hash.
/// Store failures count as a rejection.
pub struct StoreAuthVerifier {
    store: Arc<dyn CatalogStore>,
}

impl StoreAuthVerifier {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthVerifier for StoreAuthVerifier {
    async fn verify(&self, email: &str, plaintext: &str) -> bool {
        let email = email.trim().to_lowercase();
        if email.is_empty() || plaintext.is_empty() {
            return false;
        }

        match self.store.find_admin(&email).await {
            Ok(Some(admin)) => password::verify_password(plaintext, &admin.password),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Admin lookup failed: {}", e);
                false
            }
        }
    }
}
