//! Profile Assembler: extraction → validation → quality score, one record at a time.

use chrono::{Datelike, Utc};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::errors::RecordError;
use crate::extraction::ai::AiExtractor;
use crate::extraction::record::RawRecord;
use crate::extraction::ExtractionSource;
use crate::profile::models::AlumniProfile;
use crate::profile::validation::validate_profile;

/// A validated profile and how its fields were obtained.
#[derive(Debug, Clone)]
pub struct AssembledProfile {
    pub profile: AlumniProfile,
    pub source: ExtractionSource,
    pub fallback_reason: Option<String>,
}

/// A record that could not be assembled. Carries the extraction path when one ran,
/// so a heuristic fallback is still reported for records that then fail validation.
#[derive(Debug)]
pub struct RejectedRecord {
    pub error: RecordError,
    pub source: Option<ExtractionSource>,
    pub fallback_reason: Option<String>,
}

impl From<RecordError> for RejectedRecord {
    fn from(error: RecordError) -> Self {
        Self {
            error,
            source: None,
            fallback_reason: None,
        }
    }
}

pub struct ProfileAssembler {
    extractor: AiExtractor,
    current_year: i32,
}

impl ProfileAssembler {
    pub fn new(extractor: AiExtractor) -> Self {
        Self {
            extractor,
            current_year: Utc::now().year(),
        }
    }

    /// Pins the year used for the future-year bound.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Builds one profile. Failures are logged with the record's display name and
    /// returned as a per-record error; they never abort the caller's batch.
    pub async fn assemble(&self, raw: &RawRecord) -> Result<AssembledProfile, RejectedRecord> {
        let extraction = self.extractor.extract(raw).await;

        let mut profile = match validate_profile(extraction.candidate(), self.current_year) {
            Ok(profile) => profile,
            Err(e) => {
                error!("Error processing {}: {}", raw.display_name(), e);
                return Err(RejectedRecord {
                    error: e.into(),
                    source: Some(extraction.source()),
                    fallback_reason: extraction.fallback_reason().map(str::to_string),
                });
            }
        };
        // The extractor's score is never trusted.
        profile.data_quality_score = profile.calculate_data_quality();

        info!(
            "Processed {} (source: {:?}, confidence: {:?}, quality: {}, skills: {})",
            profile.display_name(),
            extraction.source(),
            extraction.confidence(),
            profile.data_quality_score,
            profile.skills.as_ref().map_or(0, |s| s.technical.len())
        );
        let missing = profile.missing_quality_fields();
        if !missing.is_empty() {
            debug!("{} is missing: {}", profile.display_name(), missing.join(", "));
        }

        Ok(AssembledProfile {
            profile,
            source: extraction.source(),
            fallback_reason: extraction.fallback_reason().map(str::to_string),
        })
    }

    /// Same as `assemble`, for an entry that has not been checked to be an object yet.
    pub async fn assemble_value(&self, entry: Value) -> Result<AssembledProfile, RejectedRecord> {
        let raw = RawRecord::from_value(entry).inspect_err(|e| {
            error!("Error processing Unknown: {}", e);
        })?;
        self.assemble(&raw).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::extraction::heuristic;
    use crate::llm_client::stub::StubCompletion;
    use crate::profile::models::Branch;

    fn assembler(stub: StubCompletion) -> ProfileAssembler {
        ProfileAssembler::new(AiExtractor::new(Arc::new(stub))).with_current_year(2026)
    }

    fn asha() -> Value {
        json!({
            "id": "42",
            "name": "Asha Verma",
            "linkedin_id": "asha-verma",
            "location": "Bengaluru",
            "current_company": {"name": "Acme", "title": "SDE"},
            "education": [{
                "title": "IIIT Naya Raipur",
                "degree": "B.Tech",
                "field": "Computer Science and Engineering",
                "start_year": "2018",
                "end_year": "2022"
            }],
            "experience": [{
                "company": "Acme",
                "positions": [{"title": "Software Engineer", "start_date": "2022"}]
            }]
        })
    }

    #[tokio::test]
    async fn test_garbage_reply_matches_direct_heuristic_output() {
        let assembled = assembler(StubCompletion::replying("<html>502</html>"))
            .assemble_value(asha())
            .await
            .unwrap();

        let raw = RawRecord::from_value(asha()).unwrap();
        let mut expected = validate_profile(&heuristic::extract(&raw), 2026).unwrap();
        expected.data_quality_score = expected.calculate_data_quality();

        assert_eq!(assembled.source, ExtractionSource::Heuristic);
        assert_eq!(assembled.profile, expected);
        assert_eq!(assembled.profile.extraction_confidence, 0.5);
        assert_eq!(assembled.profile.batch.as_deref(), Some("2018"));
    }

    #[tokio::test]
    async fn test_quality_score_is_recomputed() {
        let reply = json!({
            "id": "42",
            "linkedin_id": "asha-verma",
            "name": "Asha Verma",
            "batch": "2018",
            "branch": "ECE",
            "data_quality_score": 1.0,
            "extraction_confidence": 0.8
        })
        .to_string();

        let assembled = assembler(StubCompletion::replying(&reply))
            .assemble_value(asha())
            .await
            .unwrap();

        assert_eq!(assembled.source, ExtractionSource::Ai);
        assert_eq!(assembled.profile.branch, Branch::Ece);
        // batch only: 1 / 12
        assert_eq!(assembled.profile.data_quality_score, 0.08);
        assert_eq!(assembled.profile.extraction_confidence, 0.8);
    }

    #[tokio::test]
    async fn test_invalid_ai_output_is_a_record_failure() {
        let reply = r#"{"id": "1", "linkedin_id": "x", "name": "X", "graduationYear": "1999"}"#;
        let err = assembler(StubCompletion::replying(reply))
            .assemble_value(asha())
            .await
            .unwrap_err();
        assert!(matches!(err.error, RecordError::Validation(ref v) if v.fields() == vec!["graduationYear"]));
        assert_eq!(err.source, Some(ExtractionSource::Ai));
        assert!(err.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_rejected_heuristic_record_keeps_fallback_reason() {
        let mut old = asha();
        old["education"][0]["start_year"] = json!("1995");
        old["education"][0]["end_year"] = json!("1999");

        let err = assembler(StubCompletion::failing())
            .assemble_value(old)
            .await
            .unwrap_err();

        assert!(matches!(err.error, RecordError::Validation(_)));
        assert_eq!(err.source, Some(ExtractionSource::Heuristic));
        assert!(err
            .fallback_reason
            .unwrap()
            .contains("completion call failed"));
    }

    #[tokio::test]
    async fn test_non_object_entry_rejected() {
        let err = assembler(StubCompletion::new(vec![]))
            .assemble_value(json!(42))
            .await
            .unwrap_err();
        assert!(matches!(err.error, RecordError::InvalidRecord(_)));
        assert!(err.source.is_none());
    }
}
