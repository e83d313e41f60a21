use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use certiswift::catalog::Catalog;
use certiswift::config::{AppConfig, StoreBackend};
use certiswift::routes;
use certiswift::state::AppState;
use certiswift::store::{CatalogStore, RestStore, SqliteStore};
use certiswift::support::{DohResolver, LogSink, NotificationSink, WebhookSink};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "certiswift=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = AppConfig::load().expect("Failed to load configuration");

  let store: Arc<dyn CatalogStore> = match config.store.backend {
    StoreBackend::Sqlite => {
      let store = SqliteStore::open(&config.store.path).expect("Failed to initialize database");
      if config.store.seed {
        if let Err(e) = store.seed_sample_courses() {
          tracing::warn!("Failed to seed sample courses: {}", e);
        }
      }
      Arc::new(store)
    }
    StoreBackend::Rest => {
      let url = config.store.url.as_deref().unwrap_or_default();
      let key = config.store.key.as_deref().unwrap_or_default();
      Arc::new(RestStore::new(url, key).expect("Failed to configure REST store"))
    }
  };

  let catalog = Catalog::new(store.clone());
  if !catalog.test_connection().await {
    tracing::warn!("Store is not reachable; pages will render empty until it recovers");
  }

  if let (Some(email), Some(password)) = (
    config.admin.bootstrap_email.as_deref(),
    config.admin.bootstrap_password.as_deref(),
  ) {
    catalog.bootstrap_admin(email, password).await;
  }

  let sink: Arc<dyn NotificationSink> = match config.support.webhook_url.as_deref() {
    Some(url) => Arc::new(WebhookSink::new(url).expect("Failed to configure support webhook")),
    None => {
      tracing::info!("No support webhook configured; support requests will be logged");
      Arc::new(LogSink)
    }
  };
  let resolver = Arc::new(DohResolver::google().expect("Failed to build DNS resolver"));

  let state = AppState::build(store, resolver, sink, &config);
  let app = routes::create_router(state);

  let bind_addr = config.server.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config.server.port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
