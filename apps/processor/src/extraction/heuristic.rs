//! Heuristic Extractor: deterministic fallback that needs no model call.
//!
//! Produces the same candidate shape the AI path is asked for, so both feed the
//! one validation entry point.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::warn;

use crate::extraction::record::RawRecord;
use crate::extraction::rules::{
    branch_for_field, is_institution, is_recognised_degree, matching_skill_rules,
    DEFAULT_BRANCH, MAX_PROJECTS_FOR_SKILLS, PROJECT_SKILL_RULES, TITLE_SKILL_RULES,
};
use crate::profile::models::{Branch, CurrentCompany, Education, Experience, Skills};
use crate::profile::normalize::{flatten_experience, trim_company};

/// Fixed confidence marking a record as heuristic-derived.
pub const HEURISTIC_CONFIDENCE: f64 = 0.5;

/// Institution facts resolved from the education history.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionFacts {
    pub batch: Option<String>,
    pub graduation_year: Option<String>,
    pub branch: Branch,
}

/// First education entry at the institution with a recognised degree level.
pub fn find_institution_education(education: &[Education]) -> Option<&Education> {
    education.iter().find(|edu| {
        edu.title.as_deref().is_some_and(is_institution)
            && edu.degree.as_deref().is_some_and(is_recognised_degree)
    })
}

pub fn resolve_institution_facts(education: &[Education]) -> InstitutionFacts {
    match find_institution_education(education) {
        Some(edu) => InstitutionFacts {
            batch: non_empty(edu.start_year.clone()),
            graduation_year: non_empty(edu.end_year.clone()),
            branch: branch_for_field(edu.field.as_deref().unwrap_or_default()),
        },
        None => InstitutionFacts {
            batch: None,
            graduation_year: None,
            branch: DEFAULT_BRANCH,
        },
    }
}

/// Projects the raw `current_company` object when it names a company.
pub fn extract_current_company(raw: &RawRecord) -> Option<CurrentCompany> {
    let company: CurrentCompany = raw
        .get("current_company")
        .and_then(|v| serde_json::from_value(v.clone()).ok())?;
    let name = trim_company(company.name).filter(|n| !n.is_empty())?;
    Some(CurrentCompany {
        name: Some(name),
        ..company
    })
}

/// Raw experience entries, typed and flattened. Entries that are not
/// profile-shaped objects are skipped.
pub fn flatten_raw_experience(raw: &RawRecord) -> Vec<Experience> {
    flatten_experience(parse_entries(raw, "experience"))
}

pub fn parse_education(raw: &RawRecord) -> Vec<Education> {
    parse_entries(raw, "education")
}

fn parse_entries<T: DeserializeOwned>(raw: &RawRecord, key: &str) -> Vec<T> {
    raw.list(key)
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(
                    "Skipping {}[{}] for {}: {}",
                    key,
                    i,
                    raw.display_name(),
                    e
                );
                None
            }
        })
        .collect()
}

/// Union of skills implied by experience titles and the first few projects.
/// `None` when nothing matched.
pub fn infer_skills(experience: &[Experience], projects: &[Value]) -> Option<Skills> {
    let mut technical = BTreeSet::new();
    let mut tools = BTreeSet::new();

    let titles = experience.iter().filter_map(|e| e.title.as_deref());
    let project_texts = projects
        .iter()
        .take(MAX_PROJECTS_FOR_SKILLS)
        .map(project_text);

    let hits = titles
        .flat_map(|title| matching_skill_rules(TITLE_SKILL_RULES, title).collect::<Vec<_>>())
        .chain(project_texts.flat_map(|text| {
            matching_skill_rules(PROJECT_SKILL_RULES, &text).collect::<Vec<_>>()
        }));

    for rule in hits {
        technical.extend(rule.technical.iter().map(|s| s.to_string()));
        tools.extend(rule.tools.iter().map(|s| s.to_string()));
    }

    if technical.is_empty() && tools.is_empty() {
        return None;
    }
    Some(Skills {
        technical: technical.into_iter().collect(),
        tools: tools.into_iter().collect(),
    })
}

fn project_text(project: &Value) -> String {
    let field = |key: &str| {
        project
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    format!("{} {}", field("description"), field("title"))
}

/// Full deterministic extraction of one raw record into a candidate profile object.
pub fn extract(raw: &RawRecord) -> Value {
    let education = parse_education(raw);
    let facts = resolve_institution_facts(&education);
    let experience = flatten_raw_experience(raw);
    let skills = infer_skills(&experience, raw.list("projects"));
    let (first_name, last_name) = split_name(raw);

    json!({
        "id": raw.text("id").unwrap_or_default(),
        "linkedin_id": raw.text("linkedin_id").unwrap_or_default(),
        "name": raw.display_name(),
        "first_name": first_name,
        "last_name": last_name,
        "batch": facts.batch,
        "branch": facts.branch,
        "graduationYear": facts.graduation_year,
        "city": raw.text("city"),
        "country_code": raw.text("country_code"),
        "position": raw.text("position"),
        "current_company": extract_current_company(raw),
        "location": raw.text("location"),
        "avatar": raw.text("avatar"),
        "about": raw.text("about"),
        "education": education,
        "experience": experience,
        "skills": skills,
        "url": raw.text("url").unwrap_or_default(),
        "input_url": raw.text("input_url").or_else(|| raw.text("url")),
        "followers": raw.get("followers"),
        "connections": raw.get("connections"),
        "current_company_company_id": raw.text("current_company_company_id"),
        "current_company_name": raw.text("current_company_name"),
        "educations_details": raw.text("educations_details"),
        "linkedin_num_id": raw.text("linkedin_num_id"),
        "banner_image": raw.text("banner_image"),
        "honors_and_awards": raw.get("honors_and_awards").filter(|v| v.is_object()),
        "similar_profiles": raw.list("similar_profiles"),
        "bio_links": raw.list("bio_links"),
        "timestamp": raw.get("timestamp").filter(|v| v.is_string() || v.is_number()),
        "input": raw.get("input").filter(|v| v.is_object()),
        "default_avatar": raw.get("default_avatar").and_then(Value::as_bool),
        "memorialized_account": raw.get("memorialized_account").and_then(Value::as_bool),
        "extraction_confidence": HEURISTIC_CONFIDENCE,
    })
}

/// Explicit first/last names win; otherwise the display name is split on whitespace.
fn split_name(raw: &RawRecord) -> (Option<String>, Option<String>) {
    let full = raw.text("name").unwrap_or_default();
    let mut parts = full.split_whitespace();
    let first = raw
        .text("first_name")
        .or_else(|| parts.next().map(str::to_string));
    let last = raw.text("last_name").or_else(|| {
        let rest: Vec<&str> = parts.collect();
        (!rest.is_empty()).then(|| rest.join(" "))
    });
    (first, last)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
