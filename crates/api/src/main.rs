use std::sync::Arc;

use chrono::Utc;

use stockbook_core::TenantId;
use stockbook_store::{ApiKey, Database};

#[tokio::main]
async fn main() {
    stockbook_observability::init();

    let db = Arc::new(Database::new());

    // Dev bootstrap: one tenant, one key. `STOCKBOOK_API_KEY` overrides the
    // insecure default.
    let key = std::env::var("STOCKBOOK_API_KEY").unwrap_or_else(|_| {
        tracing::warn!("STOCKBOOK_API_KEY not set; using insecure dev default");
        "dev-key".to_string()
    });
    let tenant_id = TenantId::new();
    db.insert_api_key(ApiKey::new(key, tenant_id, "dev bootstrap", Utc::now()))
        .expect("fresh database cannot already hold the bootstrap key");
    tracing::info!(%tenant_id, "bootstrap tenant created");

    let app = stockbook_api::app::build_app(db);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
