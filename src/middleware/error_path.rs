// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adds the request path to JSON error bodies.

use crate::error::ErrorResponse;
use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response, Json};

/// Re-render [`ErrorResponse`] bodies with the path of the failed request.
pub async fn add_error_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;

    let Some(mut error) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    error.path = Some(path);

    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Json(error).into_response().into_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_error_body_gets_path() {
        let app = Router::new()
            .route(
                "/missing/{id}",
                get(|| async { Err::<(), _>(AppError::NotFound(7)) }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(axum::middleware::from_fn(add_error_path));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/missing/7?x=1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["path"], "/missing/7");
        assert_eq!(body["message"], "Feedback not found with id: 7");

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"fine");
    }
}
