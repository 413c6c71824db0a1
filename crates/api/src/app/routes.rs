use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};

use stockbook_catalog::ItemId;
use stockbook_core::TenantId;
use stockbook_store::Database;

use crate::app::{
    dto::{Envelope, ItemResponse, Paged, Pagination},
    errors,
};
use crate::context::TenantContext;

pub async fn health() -> axum::response::Response {
    Json(Envelope::ok(serde_json::json!({ "status": "ok" }))).into_response()
}

/// The caller's items, sorted by SKU, one page at a time.
pub async fn list_items(
    Extension(db): Extension<Arc<Database>>,
    Extension(tenant): Extension<TenantContext>,
    Query(pagination): Query<Pagination>,
) -> axum::response::Response {
    items_page(&db, tenant.tenant_id(), &pagination)
}

pub async fn get_item(
    Extension(db): Extension<Arc<Database>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id: ItemId = match id.parse() {
        Ok(record_id) => ItemId::new(record_id),
        Err(_) => return errors::envelope_error(StatusCode::BAD_REQUEST, "invalid item id"),
    };

    let Ok(item) = db.read(tenant.tenant_id(), |state| {
        state.item(item_id).map(ItemResponse::from).ok()
    }) else {
        return errors::store_failure();
    };

    match item {
        Some(item) => Json(Envelope::ok(item)).into_response(),
        None => errors::not_found(),
    }
}

/// Same listing, addressed by organisation id. An id that is not the key's
/// own tenant reads as absent, it never reveals another tenant's data.
pub async fn organisation_items(
    Extension(db): Extension<Arc<Database>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> axum::response::Response {
    let requested: TenantId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::not_found(),
    };
    if requested != tenant.tenant_id() {
        return errors::not_found();
    }
    items_page(&db, requested, &pagination)
}

fn items_page(
    db: &Database,
    tenant_id: TenantId,
    pagination: &Pagination,
) -> axum::response::Response {
    let Ok((items, total)) = db.read(tenant_id, |state| {
        let mut items: Vec<ItemResponse> = state.items.values().map(ItemResponse::from).collect();
        items.sort_by(|a, b| a.sku.cmp(&b.sku));
        let total = items.len();
        (pagination.slice(items), total)
    }) else {
        return errors::store_failure();
    };

    Json(Envelope::ok(Paged {
        items,
        page: pagination.page.max(1),
        limit: pagination.limit,
        total,
    }))
    .into_response()
}
