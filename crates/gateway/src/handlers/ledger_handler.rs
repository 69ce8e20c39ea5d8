//! Points history and shop order handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};

use common::AppResult;
use domain::{OrderRequest, TransactionView};
use loyalty_service_lib::service::OrderPlaced;

use super::DataResponse;
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/last", get(last_transactions))
        .route("/transactions/all", get(all_transactions))
        .route("/send-order", post(send_order))
}

/// The three most recent ledger rows
#[utoipa::path(
    get,
    path = "/api/transactions/last",
    tag = "Points",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "`{success, data}` with newest rows first", body = Vec<TransactionView>))
)]
pub async fn last_transactions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TransactionView>>>> {
    let rows = state
        .services
        .ledger()
        .last_transactions(current_user.id)
        .await?;
    Ok(Json(DataResponse::new(rows)))
}

/// Full ledger history
#[utoipa::path(
    get,
    path = "/api/transactions/all",
    tag = "Points",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "`{success, data}` with newest rows first", body = Vec<TransactionView>))
)]
pub async fn all_transactions(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TransactionView>>>> {
    let rows = state
        .services
        .ledger()
        .all_transactions(current_user.id)
        .await?;
    Ok(Json(DataResponse::new(rows)))
}

/// Place a shop order, paying part of it with points
#[utoipa::path(
    post,
    path = "/api/send-order",
    tag = "Points",
    security(("bearer_auth" = [])),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order created", body = OrderPlaced),
        (status = 400, description = "Missing order data or insufficient points")
    )
)]
pub async fn send_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(order): Json<OrderRequest>,
) -> AppResult<Json<OrderPlaced>> {
    let placed = state
        .services
        .ledger()
        .send_order(current_user.id, order)
        .await?;
    Ok(Json(placed))
}
