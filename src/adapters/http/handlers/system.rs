use actix_web::{HttpRequest, HttpResponse, web};

use crate::adapters::http::{dtos::NodeResponse, errors::ApiError};
use crate::infrastructure::metrics::AuthMetrics;

/// Label of this instance, reported by `GET /node`
#[derive(Debug, Clone)]
pub struct NodeIdentity(pub String);

/// GET /node
pub async fn node_handler(node: web::Data<NodeIdentity>) -> HttpResponse {
  HttpResponse::Ok().json(NodeResponse {
    node_id: node.0.clone(),
  })
}

/// GET /metrics, Prometheus text format
pub async fn metrics_handler(metrics: web::Data<AuthMetrics>) -> Result<HttpResponse, ApiError> {
  let body = metrics
    .render()
    .map_err(|e| ApiError::Internal(format!("Failed to encode metrics: {}", e)))?;

  Ok(
    HttpResponse::Ok()
      .content_type("text/plain; version=0.0.4")
      .body(body),
  )
}

/// Fallback for unknown routes
pub async fn not_found_handler(req: HttpRequest) -> Result<HttpResponse, ApiError> {
  Err(ApiError::NotFound(req.path().to_string()))
}
