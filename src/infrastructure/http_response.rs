// HTTP response mapping for service errors
use crate::error::DashboardError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::UnknownDashboard(_) | DashboardError::UnknownTemplate(_) => StatusCode::NOT_FOUND,
            DashboardError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DashboardError::Backend(_) => StatusCode::BAD_GATEWAY,
            DashboardError::Storage(_) | DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
