//! Batch Coordinator: runs the assembler over every record, strictly in input order,
//! and accumulates the run's `ValidationReport`.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{error, info};

use crate::errors::RecordError;
use crate::extraction::record::split_document;
use crate::extraction::ExtractionSource;
use crate::pipeline::assembler::{AssembledProfile, ProfileAssembler, RejectedRecord};
use crate::profile::models::ValidationReport;

/// One input unit handed over by the file-discovery collaborator.
#[derive(Debug, Clone)]
pub enum BatchInput {
    /// A parsed document: one profile object or an array of them.
    Document { source: String, content: Value },
    /// A unit that could not be read or parsed.
    Unreadable { source: String, reason: String },
}

#[derive(Debug)]
pub struct RecordOutcome {
    pub source: String,
    /// Position of the record within its document.
    pub index: usize,
    pub result: Result<AssembledProfile, RecordError>,
}

#[derive(Debug)]
pub struct BatchRun {
    pub outcomes: Vec<RecordOutcome>,
    pub report: ValidationReport,
}

impl BatchRun {
    pub fn profiles(&self) -> impl Iterator<Item = &AssembledProfile> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

/// Accumulates report counters during a run. `finalize` consumes it.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    total: usize,
    successful: usize,
    failed: usize,
    quality_scores: Vec<f64>,
    missing_batch: usize,
    missing_company: usize,
    missing_experience: usize,
    with_skills: usize,
    heuristic_fallbacks: usize,
    by_branch: BTreeMap<String, usize>,
    by_batch: BTreeMap<String, usize>,
    warnings: Vec<String>,
}

impl ReportBuilder {
    pub fn record_success(&mut self, assembled: &AssembledProfile) {
        let profile = &assembled.profile;
        self.total += 1;
        self.successful += 1;
        self.quality_scores.push(profile.data_quality_score);

        if !profile.has_batch() {
            self.missing_batch += 1;
        }
        if profile.current_company.is_none() {
            self.missing_company += 1;
        }
        if profile.experience.is_empty() {
            self.missing_experience += 1;
        }
        if profile.has_skills() {
            self.with_skills += 1;
        }

        *self
            .by_branch
            .entry(profile.branch.as_str().to_string())
            .or_default() += 1;
        if let Some(batch) = profile.batch.as_deref().filter(|b| !b.is_empty()) {
            *self.by_batch.entry(batch.to_string()).or_default() += 1;
        }

        if assembled.source == ExtractionSource::Heuristic {
            self.record_fallback(profile.display_name(), assembled.fallback_reason.as_deref());
        }
    }

    pub fn record_failure(&mut self, label: &str, error: &RecordError) {
        self.total += 1;
        self.failed += 1;
        self.warnings
            .push(format!("{}: {}: {}", label, error.code(), error));
    }

    /// A failed record that went through the heuristic fallback before failing.
    pub fn record_rejection(&mut self, label: &str, rejected: &RejectedRecord) {
        if rejected.source == Some(ExtractionSource::Heuristic) {
            self.record_fallback(label, rejected.fallback_reason.as_deref());
        }
        self.record_failure(label, &rejected.error);
    }

    fn record_fallback(&mut self, name: &str, reason: Option<&str>) {
        self.heuristic_fallbacks += 1;
        self.warnings.push(format!(
            "{}: AI extraction failed, used heuristic fallback ({})",
            name,
            reason.unwrap_or("no reason given")
        ));
    }

    pub fn finalize(self) -> ValidationReport {
        let average_quality_score = if self.quality_scores.is_empty() {
            0.0
        } else {
            self.quality_scores.iter().sum::<f64>() / self.quality_scores.len() as f64
        };

        ValidationReport {
            total_profiles: self.total,
            successfully_processed: self.successful,
            failed: self.failed,
            warnings: self.warnings,
            average_quality_score,
            profiles_with_missing_batch: self.missing_batch,
            profiles_with_missing_company: self.missing_company,
            profiles_with_missing_experience: self.missing_experience,
            profiles_with_skills: self.with_skills,
            heuristic_fallbacks: self.heuristic_fallbacks,
            by_branch: self.by_branch,
            by_batch: self.by_batch,
        }
    }
}

pub struct BatchCoordinator {
    assembler: ProfileAssembler,
}

impl BatchCoordinator {
    pub fn new(assembler: ProfileAssembler) -> Self {
        Self { assembler }
    }

    /// Processes every record sequentially. A failing record is counted and skipped;
    /// it never stops the run.
    pub async fn run<I>(&self, inputs: I) -> BatchRun
    where
        I: IntoIterator<Item = BatchInput>,
    {
        let mut outcomes = Vec::new();
        let mut report = ReportBuilder::default();

        for input in inputs {
            match input {
                BatchInput::Unreadable { source, reason } => {
                    error!("Could not read {}: {}", source, reason);
                    let err = RecordError::Unreadable(reason);
                    report.record_failure(&source, &err);
                    outcomes.push(RecordOutcome {
                        source,
                        index: 0,
                        result: Err(err),
                    });
                }
                BatchInput::Document { source, content } => {
                    info!("Processing: {}", source);
                    for (index, entry) in split_document(content).into_iter().enumerate() {
                        let label = entry_label(&source, index, &entry);
                        let result = match self.assembler.assemble_value(entry).await {
                            Ok(assembled) => {
                                report.record_success(&assembled);
                                Ok(assembled)
                            }
                            Err(rejected) => {
                                report.record_rejection(&label, &rejected);
                                Err(rejected.error)
                            }
                        };
                        outcomes.push(RecordOutcome {
                            source: source.clone(),
                            index,
                            result,
                        });
                    }
                }
            }
        }

        BatchRun {
            outcomes,
            report: report.finalize(),
        }
    }
}

fn entry_label(source: &str, index: usize, entry: &Value) -> String {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown");
    format!("{source}[{index}] {name}")
}
