use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::profile::lenient;
use crate::profile::models::{
    AlumniProfile, Branch, CurrentCompany, Education, Experience, Skills,
};
use crate::profile::normalize::{flatten_experience, trim_company};

/// IIIT Naya Raipur was established in 2015.
pub const FOUNDING_YEAR: i64 = 2015;
/// Latest accepted batch or graduation year, relative to the current year.
pub const MAX_YEARS_AHEAD: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

/// A candidate record violated the alumni schema. Lists every offending field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks a batch or graduation year.
///
/// Non-numeric text is accepted unchanged. Numeric values must fall within
/// `FOUNDING_YEAR..=current_year + MAX_YEARS_AHEAD`.
pub fn validate_year(value: &str, current_year: i32) -> Result<(), String> {
    let trimmed = value.trim();
    if !is_integer_literal(trimmed) {
        return Ok(());
    }
    let latest = i64::from(current_year) + MAX_YEARS_AHEAD;
    let year = match trimmed.parse::<i64>() {
        Ok(year) => year,
        Err(_) => return Err(format!("Invalid year: {trimmed}")),
    };
    if year < FOUNDING_YEAR {
        return Err(format!(
            "IIIT-NR didn't exist before {FOUNDING_YEAR}. Got year: {year}"
        ));
    }
    if year > latest {
        return Err(format!("Invalid future year: {year} (latest allowed {latest})"));
    }
    Ok(())
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Builds an `AlumniProfile` from a candidate map produced by either extraction path.
///
/// Types are coerced leniently, experience is flattened, company names trimmed and
/// skills deduplicated. `data_quality_score` is carried through range-checked only;
/// the assembler recomputes it.
pub fn validate_profile(candidate: &Value, current_year: i32) -> Result<AlumniProfile, ValidationError> {
    let Some(map) = candidate.as_object() else {
        return Err(ValidationError {
            issues: vec![FieldIssue {
                field: "profile".to_string(),
                reason: "expected a JSON object".to_string(),
            }],
        });
    };
    let mut r = FieldReader::new(map);

    let id = r.required_string("id");
    let linkedin_id = r.required_string("linkedin_id");
    let name = r.required_string("name");

    let batch = r.year("batch", current_year);
    let graduation_year = r.year("graduationYear", current_year);
    let branch = r.branch("branch");

    let current_company = r.typed::<CurrentCompany>("current_company").map(|mut c| {
        c.name = trim_company(c.name);
        c
    });
    let education = r.typed::<Vec<Education>>("education").unwrap_or_default();
    let experience = flatten_experience(r.typed::<Vec<Experience>>("experience").unwrap_or_default())
        .into_iter()
        .map(|mut e| {
            e.company = trim_company(e.company);
            e
        })
        .collect();
    let skills = r.typed::<Skills>("skills").map(Skills::deduplicated);

    let profile = AlumniProfile {
        id: id.unwrap_or_default(),
        linkedin_id: linkedin_id.unwrap_or_default(),
        name: name.unwrap_or_default(),
        first_name: r.string("first_name"),
        last_name: r.string("last_name"),
        batch,
        branch,
        graduation_year,
        city: r.string("city"),
        country_code: r.string("country_code"),
        position: r.string("position"),
        current_company,
        location: r.string("location"),
        avatar: r.string("avatar"),
        about: r.string("about"),
        education,
        experience,
        skills,
        url: r.string("url"),
        input_url: r.string("input_url"),
        followers: r.count("followers"),
        connections: r.count("connections"),
        current_company_company_id: r.string("current_company_company_id"),
        current_company_name: r.string("current_company_name"),
        educations_details: r.string("educations_details"),
        linkedin_num_id: r.string("linkedin_num_id"),
        banner_image: r.string("banner_image"),
        honors_and_awards: r.object("honors_and_awards"),
        similar_profiles: r.typed::<Vec<Value>>("similar_profiles").unwrap_or_default(),
        bio_links: r.typed::<Vec<Value>>("bio_links").unwrap_or_default(),
        timestamp: r.timestamp("timestamp"),
        input: r.object("input"),
        default_avatar: r.typed::<bool>("default_avatar"),
        memorialized_account: r.typed::<bool>("memorialized_account"),
        data_quality_score: r.unit_score("data_quality_score"),
        extraction_confidence: r.unit_score("extraction_confidence"),
    };

    r.finish().map(|_| profile)
}

/// Reads fields off a candidate map, recording an issue per bad field instead of stopping.
struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            issues: Vec::new(),
        }
    }

    fn raw(&self, key: &str) -> Value {
        self.map.get(key).cloned().unwrap_or(Value::Null)
    }

    fn fail(&mut self, field: &str, reason: impl Into<String>) {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    fn record<T>(&mut self, field: &str, result: Result<Option<T>, serde_json::Error>) -> Option<T> {
        result.unwrap_or_else(|e| {
            self.fail(field, e.to_string());
            None
        })
    }

    fn string(&mut self, key: &str) -> Option<String> {
        let result = lenient::opt_string(self.raw(key));
        self.record(key, result)
    }

    fn required_string(&mut self, key: &str) -> Option<String> {
        let value = self.string(key);
        if value.is_none() && !self.issues.iter().any(|i| i.field == key) {
            self.fail(key, "field required");
        }
        value
    }

    fn year(&mut self, key: &str, current_year: i32) -> Option<String> {
        let value = self.string(key)?;
        if let Err(reason) = validate_year(&value, current_year) {
            self.fail(key, reason);
        }
        Some(value)
    }

    fn branch(&mut self, key: &str) -> Branch {
        match self.string(key) {
            None => Branch::default(),
            Some(code) => code.parse().unwrap_or_else(|reason: String| {
                self.fail(key, reason);
                Branch::default()
            }),
        }
    }

    fn count(&mut self, key: &str) -> Option<u64> {
        let result = lenient::opt_count(self.raw(key));
        self.record(key, result)
    }

    fn timestamp(&mut self, key: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        let result = lenient::opt_timestamp(self.raw(key));
        self.record(key, result)
    }

    fn object(&mut self, key: &str) -> Option<Value> {
        match self.raw(key) {
            Value::Null => None,
            obj @ Value::Object(_) => Some(obj),
            other => {
                self.fail(key, format!("expected an object, found {other}"));
                None
            }
        }
    }

    fn typed<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let result = serde_json::from_value::<Option<T>>(self.raw(key));
        self.record(key, result)
    }

    /// Floats constrained to [0, 1]; missing means 0.0.
    fn unit_score(&mut self, key: &str) -> f64 {
        let score = match self.raw(key) {
            Value::Null => return 0.0,
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match score {
            Some(s) if (0.0..=1.0).contains(&s) => s,
            Some(s) => {
                self.fail(key, format!("must be between 0 and 1, got {s}"));
                0.0
            }
            None => {
                self.fail(key, "expected a number");
                0.0
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}
