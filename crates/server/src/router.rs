//! HTTP router construction.
//!
//! Assembles the liveness routes and the MCP dispatch endpoint into a
//! single Axum `Router`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use hearth_mcp::types::{error_codes, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RpcId};

use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(liveness))
        .route("/mcp", post(mcp_dispatch))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe. Served on both `/` and `/health`.
async fn liveness(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "msg": format!("{} is alive", state.server_name),
        "version": state.version,
    }))
}

/// Single-request MCP dispatch over HTTP.
///
/// The body is one JSON-RPC message. Requests (with an `id`) get the
/// JSON-RPC response back; notifications (no `id`) are acknowledged
/// with 202 Accepted and an empty body.
async fn mcp_dispatch(State(state): State<Arc<AppState>>, Json(raw): Json<Value>) -> Response {
    if raw.get("id").is_none() {
        match serde_json::from_value::<JsonRpcNotification>(raw) {
            Ok(notif) => {
                state.mcp.handle_notification(&notif);
                StatusCode::ACCEPTED.into_response()
            }
            Err(e) => Json(JsonRpcResponse::error(
                RpcId::Number(0),
                error_codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            ))
            .into_response(),
        }
    } else {
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(req) => req,
            Err(e) => {
                return Json(JsonRpcResponse::error(
                    RpcId::Number(0),
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                ))
                .into_response();
            }
        };

        let response = state.mcp.handle_request(&request).await;
        Json(response).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use hearth_mcp::McpServer;
    use hearth_store::Store;
    use hearth_tools::{register_all, ToolContext, ToolRegistry};

    fn test_router() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@localhost:1/unreachable")
            .expect("lazy pool construction");
        let context = ToolContext::new(Store::new(pool), Some("alice".to_string()));
        let mut registry = ToolRegistry::new();
        register_all(&mut registry).unwrap();
        let mcp = McpServer::new(registry, context);
        build_router(Arc::new(AppState::new(mcp, "hearth")))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_liveness() {
        let app = test_router();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["msg"], json!("hearth is alive"));
    }

    #[tokio::test]
    async fn root_serves_the_same_liveness_payload() {
        let app = test_router();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
    }

    #[tokio::test]
    async fn mcp_endpoint_dispatches_tools_list() {
        let app = test_router();
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["error"].is_null());
        let tools = body["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 17);
    }

    #[tokio::test]
    async fn notifications_are_acknowledged_with_202() {
        let app = test_router();
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn unknown_method_surfaces_a_jsonrpc_error() {
        let app = test_router();
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"jsonrpc": "2.0", "id": 9, "method": "bogus/method"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["code"],
            json!(error_codes::METHOD_NOT_FOUND)
        );
    }
}
