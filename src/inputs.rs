//! Engine inputs: detected services and the captured event log
//!
//! These types mirror the wire format produced by the browser capture layer.
//! Events arrive as JSON discriminated by `type`; unrecognized types (or
//! undecodable details) deserialize to [`EventLog::Unknown`] so a newer
//! capture layer never breaks an older engine — the builder treats them as
//! no-ops.

use crate::scoring::Confidence;
use serde::Deserialize;
use serde_json::Value;

/// Newly-registered-domain verdict from the capture layer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NrdResult {
    #[serde(rename = "isNRD")]
    pub is_nrd: bool,
    pub confidence: Confidence,
}

/// Typosquat verdict from the capture layer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TyposquatResult {
    pub is_typosquat: bool,
    pub confidence: Confidence,
}

/// Cookie observed on a detected service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCookie {
    pub name: String,
    #[serde(default)]
    pub is_session: bool,
}

/// One service discovered by the capture layer; seeds a domain node
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedService {
    pub domain: String,
    #[serde(default)]
    pub has_login_page: bool,
    #[serde(default)]
    pub privacy_policy_url: Option<String>,
    #[serde(default)]
    pub terms_of_service_url: Option<String>,
    #[serde(default)]
    pub nrd_result: Option<NrdResult>,
    #[serde(default)]
    pub typosquat_result: Option<TyposquatResult>,
    #[serde(default)]
    pub cookies: Vec<ServiceCookie>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub detected_at: i64,
}

impl Default for NrdResult {
    fn default() -> Self {
        Self {
            is_nrd: false,
            confidence: Confidence::Unknown,
        }
    }
}

/// Prompt text payload of an AI interaction
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptContent {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPromptDetails {
    #[serde(default)]
    pub inferred_provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub prompt_content: PromptContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponseDetails {
    #[serde(default)]
    pub inferred_provider: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRequestDetails {
    pub extension_id: String,
    #[serde(default)]
    pub extension_name: Option<String>,
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequestDetails {
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
}

/// One captured browser event, discriminated by `type` on the wire
///
/// The union is closed: adding a variant forces every dispatch site to
/// handle it before the crate compiles again.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawEvent")]
pub enum EventLog {
    AiPromptSent {
        domain: String,
        timestamp: i64,
        details: AiPromptDetails,
    },
    AiResponseReceived {
        domain: String,
        timestamp: i64,
        details: AiResponseDetails,
    },
    ExtensionRequest {
        domain: String,
        timestamp: i64,
        details: ExtensionRequestDetails,
    },
    NetworkRequest {
        domain: String,
        timestamp: i64,
        details: NetworkRequestDetails,
    },
    LoginDetected {
        domain: String,
        timestamp: i64,
    },
    CspViolation {
        domain: String,
        timestamp: i64,
    },
    /// Unrecognized event type or undecodable details; always a no-op
    Unknown {
        event_type: String,
        domain: String,
        timestamp: i64,
    },
}

impl EventLog {
    pub fn domain(&self) -> &str {
        match self {
            EventLog::AiPromptSent { domain, .. }
            | EventLog::AiResponseReceived { domain, .. }
            | EventLog::ExtensionRequest { domain, .. }
            | EventLog::NetworkRequest { domain, .. }
            | EventLog::LoginDetected { domain, .. }
            | EventLog::CspViolation { domain, .. }
            | EventLog::Unknown { domain, .. } => domain,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            EventLog::AiPromptSent { timestamp, .. }
            | EventLog::AiResponseReceived { timestamp, .. }
            | EventLog::ExtensionRequest { timestamp, .. }
            | EventLog::NetworkRequest { timestamp, .. }
            | EventLog::LoginDetected { timestamp, .. }
            | EventLog::CspViolation { timestamp, .. }
            | EventLog::Unknown { timestamp, .. } => *timestamp,
        }
    }
}

/// Wire-shape intermediate used to keep unknown event types non-fatal
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    domain: String,
    timestamp: i64,
    #[serde(default)]
    details: Value,
}

impl From<RawEvent> for EventLog {
    fn from(raw: RawEvent) -> Self {
        let RawEvent {
            event_type,
            domain,
            timestamp,
            details,
        } = raw;

        // Undecodable details degrade to Unknown rather than failing the
        // whole batch
        macro_rules! parse_details {
            ($ty:ty, $variant:ident) => {
                match serde_json::from_value::<$ty>(details) {
                    Ok(details) => EventLog::$variant {
                        domain,
                        timestamp,
                        details,
                    },
                    Err(e) => {
                        tracing::debug!(
                            event_type = %event_type,
                            error = %e,
                            "Undecodable event details, treating as no-op"
                        );
                        EventLog::Unknown {
                            event_type: event_type.clone(),
                            domain,
                            timestamp,
                        }
                    }
                }
            };
        }

        match event_type.as_str() {
            "ai_prompt_sent" => parse_details!(AiPromptDetails, AiPromptSent),
            "ai_response_received" => parse_details!(AiResponseDetails, AiResponseReceived),
            "extension_request" => parse_details!(ExtensionRequestDetails, ExtensionRequest),
            "network_request" => parse_details!(NetworkRequestDetails, NetworkRequest),
            "login_detected" => EventLog::LoginDetected { domain, timestamp },
            "csp_violation" => EventLog::CspViolation { domain, timestamp },
            _ => EventLog::Unknown {
                event_type: event_type.clone(),
                domain,
                timestamp,
            },
        }
    }
}
