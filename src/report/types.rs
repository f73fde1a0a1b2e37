use serde::Deserialize;

/// Request payload for reporting a listing
#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    #[serde(default)]
    pub reason: String,
}
