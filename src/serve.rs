use std::{net::SocketAddr, path::Path};

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::{Error, Result};

/// serves the generated files, `/` maps to the table of contents
pub fn router<T: AsRef<Path>>(site_dir: T) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(site_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(app: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(Error::ServeError)?;
    tracing::info!(
        "listening on http://{}",
        listener.local_addr().map_err(Error::ServeError)?
    );
    axum::serve(listener, app).await.map_err(Error::ServeError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn serves_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>contents</h1>").unwrap();
        std::fs::create_dir(dir.path().join("types")).unwrap();
        std::fs::write(dir.path().join("types/coercion.html"), "<p>coercion</p>").unwrap();

        let response = router(dir.path())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<h1>contents</h1>");

        let response = router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/types/coercion.html")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router(dir.path())
            .oneshot(Request::builder().uri("/missing.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
