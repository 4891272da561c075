//! AI-Assisted Extractor: prompt construction, completion call, response parsing.
//!
//! Any failure before a JSON object is in hand (call, empty reply, parse, wrong
//! JSON type) re-derives the whole record with the heuristic extractor. There is
//! no merging of partial AI output with heuristic output.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::extraction::heuristic;
use crate::extraction::prompts::{EXTRACTION_PROMPT_TEMPLATE, NO_PROJECTS};
use crate::extraction::record::RawRecord;
use crate::extraction::rules::INSTITUTION_NAME_VARIANTS;
use crate::extraction::ExtractionResult;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, NO_INVENTION_INSTRUCTION};
use crate::llm_client::{strip_json_fences, CompletionClient, CompletionRequest, LlmError};
use crate::profile::validation::FOUNDING_YEAR;

/// Output cap for one extraction reply.
pub const MAX_COMPLETION_TOKENS: u32 = 4096;
/// Projects summarised for skill inference.
pub const MAX_PROMPT_PROJECTS: usize = 5;
/// Characters of each project description kept in the summary.
pub const PROJECT_DESCRIPTION_LIMIT: usize = 200;
/// Experience entries forwarded in the payload, to bound prompt size.
pub const MAX_PROMPT_EXPERIENCE: usize = 5;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion call failed: {0}")]
    Call(#[from] LlmError),

    #[error("completion was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion JSON was not an object")]
    NotAnObject,
}

pub struct AiExtractor {
    client: Arc<dyn CompletionClient>,
}

impl AiExtractor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Tries the model first; falls back to the heuristic extractor on any failure.
    pub async fn extract(&self, raw: &RawRecord) -> ExtractionResult {
        match self.try_extract(raw).await {
            Ok(fields) => {
                let confidence = fields.get("extraction_confidence").and_then(Value::as_f64);
                debug!(
                    "AI extraction succeeded for {} (confidence {:?})",
                    raw.display_name(),
                    confidence
                );
                ExtractionResult::AiDerived { fields, confidence }
            }
            Err(e) => {
                warn!(
                    "AI extraction failed for {}, using heuristic fallback: {}",
                    raw.display_name(),
                    e
                );
                ExtractionResult::HeuristicDerived {
                    fields: heuristic::extract(raw),
                    fallback_reason: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_extract(&self, raw: &RawRecord) -> Result<Value, ExtractionError> {
        let request = CompletionRequest {
            prompt: build_prompt(raw),
            system: Some(JSON_ONLY_SYSTEM.to_string()),
            temperature: 0.0,
            max_tokens: MAX_COMPLETION_TOKENS,
        };
        let reply = self.client.complete(&request).await?;
        parse_completion(&reply)
    }
}

/// Strips optional code fences and parses the reply as a JSON object.
pub fn parse_completion(reply: &str) -> Result<Value, ExtractionError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ExtractionError::NotAnObject)
    }
}

pub fn build_prompt(raw: &RawRecord) -> String {
    let payload = serde_json::to_string_pretty(&prompt_payload(raw)).unwrap_or_default();
    let prompt = EXTRACTION_PROMPT_TEMPLATE
        .replace("{founding_year}", &FOUNDING_YEAR.to_string())
        .replace("{institution_variants}", &INSTITUTION_NAME_VARIANTS.join(", "))
        .replace("{raw_json}", &payload)
        .replace("{projects_summary}", &summarize_projects(raw.list("projects")));
    format!("{prompt}\n\n{NO_INVENTION_INSTRUCTION}")
}

/// The subset of the raw record the model sees. Project bodies are left out;
/// they only reach the prompt through the summary.
pub fn prompt_payload(raw: &RawRecord) -> Value {
    let experience: Vec<&Value> = raw
        .list("experience")
        .iter()
        .take(MAX_PROMPT_EXPERIENCE)
        .collect();
    json!({
        "id": raw.get("id"),
        "name": raw.get("name"),
        "position": raw.get("position"),
        "current_company": raw.get("current_company"),
        "education": raw.list("education"),
        "experience": experience,
        "location": raw.get("location"),
        "city": raw.get("city"),
        "country_code": raw.get("country_code"),
        "about": raw.get("about"),
        "avatar": raw.get("avatar"),
        "url": raw.get("url"),
        "input_url": raw.get("input_url"),
        "linkedin_id": raw.get("linkedin_id"),
        "followers": raw.get("followers"),
        "connections": raw.get("connections"),
    })
}

/// Numbered "title: description" lines for at most five projects.
pub fn summarize_projects(projects: &[Value]) -> String {
    if projects.is_empty() {
        return NO_PROJECTS.to_string();
    }
    projects
        .iter()
        .take(MAX_PROMPT_PROJECTS)
        .enumerate()
        .map(|(i, project)| {
            let title = project
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("Untitled");
            let description: String = project
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .chars()
                .take(PROJECT_DESCRIPTION_LIMIT)
                .collect();
            format!("{}. {}: {}", i + 1, title, description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractionSource;
    use crate::llm_client::stub::StubCompletion;

    fn raw() -> RawRecord {
        RawRecord::from_value(json!({
            "name": "Asha Verma",
            "linkedin_id": "asha-verma",
            "education": [{
                "title": "IIIT Naya Raipur",
                "degree": "B.Tech",
                "field": "Computer Science",
                "start_year": "2018",
                "end_year": "2022"
            }],
            "projects": [{"title": "Weather Bot", "description": "SECRET-BODY python telegram bot"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_truncates_and_limits() {
        let long = "x".repeat(450);
        let projects: Vec<Value> = (0..7)
            .map(|i| json!({"title": format!("P{i}"), "description": long}))
            .collect();
        let summary = summarize_projects(&projects);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], format!("1. P0: {}", "x".repeat(200)));
    }

    #[test]
    fn test_summary_defaults() {
        assert_eq!(summarize_projects(&[]), NO_PROJECTS);
        assert_eq!(summarize_projects(&[json!({})]), "1. Untitled: ");
    }

    #[test]
    fn test_summary_truncation_respects_char_boundaries() {
        let projects = vec![json!({"title": "Hindi", "description": "क".repeat(300)})];
        let summary = summarize_projects(&projects);
        assert_eq!(summary.chars().count(), "1. Hindi: ".len() + 200);
    }

    #[test]
    fn test_payload_excludes_project_bodies() {
        let payload = prompt_payload(&raw());
        assert!(payload.get("projects").is_none());
        let prompt = build_prompt(&raw());
        assert!(prompt.contains("\"linkedin_id\": \"asha-verma\""));
        assert!(prompt.contains("1. Weather Bot: SECRET-BODY python telegram bot"));
        assert_eq!(prompt.matches("SECRET-BODY").count(), 1);
        assert!(prompt.contains("established in 2015"));
        assert!(prompt.contains(r#"end_date is "Present""#));
        assert!(!prompt.contains("{raw_json}"));
    }

    #[test]
    fn test_parse_completion_handles_fences() {
        let parsed = parse_completion("```json\n{\"name\": \"A\"}\n```").unwrap();
        assert_eq!(parsed["name"], "A");
        assert!(matches!(
            parse_completion("[1, 2]"),
            Err(ExtractionError::NotAnObject)
        ));
        assert!(matches!(
            parse_completion("Sure! Here is the JSON"),
            Err(ExtractionError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_ai_reply_used_when_parseable() {
        let stub = Arc::new(StubCompletion::replying(
            r#"```json
{"id": "1", "linkedin_id": "asha-verma", "name": "Asha Verma", "branch": "CSE", "extraction_confidence": 0.9}
```"#,
        ));
        let extractor = AiExtractor::new(stub.clone());

        let result = extractor.extract(&raw()).await;

        assert_eq!(result.source(), ExtractionSource::Ai);
        assert_eq!(result.confidence(), Some(0.9));
        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, 0.0);
        assert_eq!(requests[0].max_tokens, MAX_COMPLETION_TOKENS);
    }

    #[tokio::test]
    async fn test_garbage_reply_falls_back_to_heuristic() {
        let extractor = AiExtractor::new(Arc::new(StubCompletion::replying("not json at all")));

        let result = extractor.extract(&raw()).await;

        assert_eq!(result.source(), ExtractionSource::Heuristic);
        assert_eq!(result.candidate(), &heuristic::extract(&raw()));
        assert_eq!(result.confidence(), Some(0.5));
        assert!(result.fallback_reason().unwrap().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn test_call_failure_falls_back_to_heuristic() {
        let extractor = AiExtractor::new(Arc::new(StubCompletion::failing()));

        let result = extractor.extract(&raw()).await;

        assert_eq!(result.source(), ExtractionSource::Heuristic);
        assert!(result
            .fallback_reason()
            .unwrap()
            .contains("completion call failed"));
    }
}
