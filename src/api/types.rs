use serde::{Deserialize, Serialize};

use crate::generation::LevelMetrics;
use crate::level::Level;

#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> ApiResponse<String> {
        ApiResponse {
            ok: true,
            data: Some("ok".to_string()),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> ApiResponse<String> {
        ApiResponse {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct GenerateRequest {
    /// Omitted seeds are drawn from entropy and echoed back.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct GenerateResponse {
    pub seed: u64,
    pub level: Level,
    pub metrics: LevelMetrics,
    pub validation: serde_json::Value,
}

#[derive(Deserialize, Debug)]
pub struct ValidateRequest {
    pub level: Level,
    /// Empty means every known constraint.
    #[serde(default)]
    pub constraints: Vec<String>,
}
