use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::lenient;

/// Academic program code at the institution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    #[default]
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "ECE")]
    Ece,
    #[serde(rename = "DSAI")]
    Dsai,
    Mechanical,
    Civil,
    Other,
}

impl Branch {
    pub const ALL: [Branch; 6] = [
        Branch::Cse,
        Branch::Ece,
        Branch::Dsai,
        Branch::Mechanical,
        Branch::Civil,
        Branch::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Cse => "CSE",
            Branch::Ece => "ECE",
            Branch::Dsai => "DSAI",
            Branch::Mechanical => "Mechanical",
            Branch::Civil => "Civil",
            Branch::Other => "Other",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = String;

    /// Exact code match, as stored in the alumni database.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "'{s}' is not a valid branch (expected one of CSE, ECE, DSAI, Mechanical, Civil, Other)"
                )
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentCompany {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
}

/// Nested role inside a LinkedIn experience block. Only present before flattening.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub meta: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description_html: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company_id: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub company_logo_url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub duration: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description_html: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::vec_or_null")]
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub field: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub start_year: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub end_year: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description_html: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub institute_logo_url: Option<String>,
}

/// Skills inferred from experience titles and projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    #[serde(deserialize_with = "lenient::string_list")]
    pub technical: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tools: Vec<String>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.tools.is_empty()
    }

    /// Drops later entries that differ from an earlier one only by case.
    /// Keeps first-seen order and casing; idempotent.
    pub fn deduplicated(self) -> Self {
        Self {
            technical: dedup_case_insensitive(self.technical),
            tools: dedup_case_insensitive(self.tools),
        }
    }
}

pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

/// Validated alumni record, as written for the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlumniProfile {
    // Identity
    pub id: String,
    pub linkedin_id: String,
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    // Institution
    pub batch: Option<String>,
    pub branch: Branch,
    #[serde(rename = "graduationYear")]
    pub graduation_year: Option<String>,

    // Current status
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub position: Option<String>,
    pub current_company: Option<CurrentCompany>,
    pub location: Option<String>,

    // Profile details
    pub avatar: Option<String>,
    pub about: Option<String>,

    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Option<Skills>,

    // LinkedIn metadata
    pub url: Option<String>,
    pub input_url: Option<String>,
    pub followers: Option<u64>,
    pub connections: Option<u64>,
    pub current_company_company_id: Option<String>,
    pub current_company_name: Option<String>,
    pub educations_details: Option<String>,
    pub linkedin_num_id: Option<String>,
    pub banner_image: Option<String>,
    pub honors_and_awards: Option<Value>,
    pub similar_profiles: Vec<Value>,
    pub bio_links: Vec<Value>,
    pub timestamp: Option<DateTime<Utc>>,
    pub input: Option<Value>,
    pub default_avatar: Option<bool>,
    pub memorialized_account: Option<bool>,

    pub data_quality_score: f64,
    pub extraction_confidence: f64,
}

impl AlumniProfile {
    pub fn has_batch(&self) -> bool {
        self.batch.as_deref().is_some_and(|b| !b.is_empty())
    }

    pub fn has_skills(&self) -> bool {
        self.skills.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Name used in logs and report warnings.
    pub fn display_name(&self) -> &str {
        &self.name
    }
}

/// Aggregate outcome of one batch run. Built by `ReportBuilder::finalize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_profiles: usize,
    pub successfully_processed: usize,
    pub failed: usize,
    pub warnings: Vec<String>,
    pub average_quality_score: f64,
    pub profiles_with_missing_batch: usize,
    pub profiles_with_missing_company: usize,
    pub profiles_with_missing_experience: usize,
    pub profiles_with_skills: usize,
    pub heuristic_fallbacks: usize,
    pub by_branch: BTreeMap<String, usize>,
    pub by_batch: BTreeMap<String, usize>,
}
