//! Shared helpers for the report-api integration tests

use report_api::{MdfiveConfig, MdfiveConfigBuilder, ReportClient};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Config pointing at a mock server, with polling shortened to run in real time
pub fn config_for(server: &MockServer) -> MdfiveConfig {
    MdfiveConfigBuilder::new()
        .base_url(server.uri())
        .timeout(5)
        .polling(0, 0, 5)
        .build()
        .expect("valid test config")
}

pub fn client_for(server: &MockServer) -> ReportClient {
    ReportClient::new(&config_for(server)).expect("client")
}

/// `{ status: "success", data }` envelope
pub fn success(data: Value) -> Value {
    json!({ "status": "success", "data": data })
}

/// `{ status: "error", message }` envelope
pub fn failure(message: &str) -> Value {
    json!({ "status": "error", "message": message })
}
