use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::Profile;

/// Response for the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub profiles: Vec<Profile>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub profiles: Option<i64>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Per-step validation result for the submission form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidationResponse {
    pub step: u8,
    pub name: String,
    pub valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}
