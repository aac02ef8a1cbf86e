// ==========================================
// Club Session Scheduler - remote planner client
// ==========================================
// HTTP round trip to a text-generation endpoint. Transport failures map to
// Unavailable, everything wrong with the returned text to BadResponse.
// ==========================================

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::planner::dto::{MatchPlanRequest, PlanProposal, RawProposal};
use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::prompt::render_prompt;
use crate::planner::validate::validate_proposal;

// ==========================================
// BalancedMatchPlanner - the planner seam
// ==========================================
// The scheduling API depends on this trait, not on HTTP; tests substitute
// a canned implementation.
#[async_trait]
pub trait BalancedMatchPlanner: Send + Sync {
    async fn propose(&self, request: &MatchPlanRequest) -> PlannerResult<PlanProposal>;
}

// ==========================================
// RemotePlannerClient
// ==========================================
pub struct RemotePlannerClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl RemotePlannerClient {
    /// `endpoint` is the full generate-content URL of the upstream model.
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl BalancedMatchPlanner for RemotePlannerClient {
    async fn propose(&self, request: &MatchPlanRequest) -> PlannerResult<PlanProposal> {
        // Correlates the request/response pair in logs across retries by the caller.
        let request_id = uuid::Uuid::new_v4();
        let prompt = render_prompt(request);
        debug!(
            %request_id,
            mode = %request.mode,
            participants = request.participants.len(),
            "requesting plan"
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlannerError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%request_id, %status, "planner endpoint returned an error status");
            return Err(PlannerError::Unavailable(format!(
                "upstream status {status}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::BadResponse(format!("unreadable response body: {e}")))?;

        let text = payload
            .first_text()
            .ok_or_else(|| PlannerError::BadResponse("response carries no text".to_string()))?;

        let raw: RawProposal = serde_json::from_str(strip_code_fences(text))
            .map_err(|e| PlannerError::BadResponse(format!("proposal is not valid JSON: {e}")))?;

        validate_proposal(raw, &request.config)
    }
}

// ==========================================
// Upstream response envelope
// ==========================================
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .find_map(|p| p.text.as_deref())
    }
}

/// Models often wrap the JSON in a markdown code fence despite being told
/// not to; peel one fence (with or without a language tag) when present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
