use axum::Router;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A local URL nothing listens on.
pub const DEAD_URL: &str = "http://127.0.0.1:1";
