//! Health check.

use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Q&A Dashboard API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
    }))
}
