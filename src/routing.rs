//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    auth::{sign_in_endpoint, sign_out_endpoint},
    dashboard::get_dashboard_endpoint,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, export_transactions_endpoint,
        get_categories_endpoint, get_transaction_endpoint, get_used_categories_endpoint,
        list_transactions_endpoint, patch_transaction_endpoint, replace_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::SIGN_IN, post(sign_in_endpoint))
        .route(endpoints::SIGN_OUT, post(sign_out_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(replace_transaction_endpoint)
                .patch(patch_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(endpoints::USED_CATEGORIES, get(get_used_categories_endpoint))
        .route(
            endpoints::EXPORT_TRANSACTIONS,
            get(export_transactions_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_utils::get_test_server;

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/coffee").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "error": "the requested resource could not be found" }));
    }
}
