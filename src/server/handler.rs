// src/server/handler.rs
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;

use crate::health::HealthAggregator;

const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct RequestHandler {
    aggregator: Arc<HealthAggregator>,
}

impl RequestHandler {
    pub fn new(aggregator: Arc<HealthAggregator>) -> Self {
        Self { aggregator }
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        match (req.method(), req.uri().path()) {
            (&Method::GET, HEALTH_PATH) => {
                let report = self.aggregator.produce_report().await;
                match serde_json::to_string(&report) {
                    Ok(body) => json_response(report.status_code(), body),
                    Err(err) => {
                        // Should never happen; answer with a well-formed
                        // body anyway rather than an empty response.
                        tracing::error!(%err, "failed to serialize health report");
                        json_response(
                            StatusCode::SERVICE_UNAVAILABLE,
                            r#"{"status":"unhealthy"}"#.to_string(),
                        )
                    }
                }
            }
            (_, HEALTH_PATH) => error_response(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            _ => error_response(StatusCode::NOT_FOUND, "not_found"),
        }
    }
}

fn json_response(status: StatusCode, body: String) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .expect("static response parts are valid")
}

fn error_response(status: StatusCode, error: &str) -> Response<Body> {
    json_response(status, format!("{{\"error\":\"{}\"}}", error))
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}
