//! Shared test helpers: local mock HTTP endpoints for the client tests

use axum::Router;

/// Serve `app` on an ephemeral local port, returning its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock app");
    });

    format!("http://{}", addr)
}
