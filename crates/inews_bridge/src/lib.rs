use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod bridge;
pub mod channel;
pub mod client;
pub mod handlers;
pub mod state;

pub use bridge::{Bridge, ClientFactory, RemoteClients};
pub use channel::Channel;
pub use client::BridgeClient;
pub use state::AppState;

pub fn create_app(bridge: Bridge) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/ipc", get(handlers::list_channels))
        .route("/ipc/:channel", post(handlers::invoke))
        .layer(cors)
        .with_state(Arc::new(AppState { bridge }))
}

/// Serve the bridge until the process is stopped
pub async fn serve(bridge: Bridge, addr: SocketAddr) -> inews_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("IPC bridge listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(bridge)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{AppState, Bridge, BridgeClient, Channel, ClientFactory, RemoteClients};
    pub use inews_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::tests::offline_bridge;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invoke_over_http() {
        let home = tempfile::tempdir().unwrap();
        let app = create_app(offline_bridge(home.path()).await);

        let (status, body) = call(app.clone(), "/ipc/loadTodayHeadlines", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let (status, body) = call(app.clone(), "/ipc/createUserFolder", r#"["Sports"]"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(true));

        let (status, body) = call(app, "/ipc/loadUserFolders", "[]").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["Sports"]));
    }

    #[tokio::test]
    async fn test_http_error_statuses() {
        let home = tempfile::tempdir().unwrap();
        let app = create_app(offline_bridge(home.path()).await);

        let (status, body) = call(app.clone(), "/ipc/unknownChannel", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown channel: unknownChannel");

        let (status, _) = call(app.clone(), "/ipc/loadFolderContents", r#"{"folder": 1}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(app, "/ipc/loadFolderContents", r#"["Nowhere"]"#).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_channels() {
        let home = tempfile::tempdir().unwrap();
        let app = create_app(offline_bridge(home.path()).await);

        let response = app
            .oneshot(Request::builder().uri("/ipc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let names: Vec<String> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(names.len(), 19);
        assert!(names.contains(&"removeArticleFromFolder".to_string()));
    }
}
