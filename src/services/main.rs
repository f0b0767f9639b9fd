use serde::Serialize;

use crate::ai::{AiService, AiServiceInfo};

/// Body returned by the liveness probe.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Body returned by the AI status endpoint.
#[derive(Debug, Serialize)]
pub struct AiStatus {
    pub status: &'static str,
    pub message: String,
    #[serde(flatten)]
    pub info: AiServiceInfo,
}

pub fn health() -> HealthStatus {
    HealthStatus { status: "healthy" }
}

/// Reports which AI backend and model the service is running with.
pub fn ai_status<A>(ai: &A) -> AiStatus
where
    A: AiService + ?Sized,
{
    let info = ai.service_info();
    AiStatus {
        status: "healthy",
        message: format!("{} service is working correctly", info.service),
        info,
    }
}
