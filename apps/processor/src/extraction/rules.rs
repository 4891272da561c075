//! Keyword rule tables for the heuristic extractor.
//!
//! Every table is an ordered list evaluated against lowercased text with plain
//! substring matching. Tables documented as first-match-wins stop at the first hit;
//! skill tables accumulate every hit.

use crate::profile::models::Branch;

/// Spellings of the institution accepted in an education `title`.
pub const INSTITUTION_NAME_VARIANTS: &[&str] = &[
    "iiit-naya raipur",
    "iiit naya raipur",
    "iiitnr",
    "iiit-nr",
];

/// Degree levels that count as an enrollment at the institution.
pub const DEGREE_KEYWORDS: &[&str] = &[
    "btech", "b.tech", "bachelor", "mtech", "m.tech", "master", "phd", "ph.d", "doctor",
];

/// Only the first few projects feed skill inference.
pub const MAX_PROJECTS_FOR_SKILLS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    AnyOf(&'static [&'static str]),
    AllOf(&'static [&'static str]),
}

impl Pattern {
    /// `text` must already be lowercase.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::AnyOf(needles) => needles.iter().any(|n| text.contains(n)),
            Pattern::AllOf(needles) => needles.iter().all(|n| text.contains(n)),
        }
    }
}

/// Field-of-study rules, first match wins.
///
/// Plain substrings: "cs" also matches inside "electronics", so an
/// "Electronics and Communication" field resolves to CSE under the first rule.
pub const BRANCH_RULES: &[(Pattern, Branch)] = &[
    (Pattern::AnyOf(&["computer science", "cs", "cse"]), Branch::Cse),
    (Pattern::AllOf(&["electronics", "communication"]), Branch::Ece),
    (Pattern::AnyOf(&["ece", "e&c"]), Branch::Ece),
    (Pattern::AnyOf(&["data science", "ai", "dsai"]), Branch::Dsai),
];

pub const DEFAULT_BRANCH: Branch = Branch::Cse;

#[derive(Debug, Clone, Copy)]
pub struct SkillRule {
    pub pattern: Pattern,
    pub technical: &'static [&'static str],
    pub tools: &'static [&'static str],
}

/// Matched against each flattened experience title.
pub const TITLE_SKILL_RULES: &[SkillRule] = &[
    SkillRule {
        pattern: Pattern::AnyOf(&["analyst", "business"]),
        technical: &["Data Analytics", "Business Analysis"],
        tools: &["SQL", "Excel"],
    },
    SkillRule {
        pattern: Pattern::AnyOf(&["engineer", "developer"]),
        technical: &["Software Development", "Programming"],
        tools: &["Git"],
    },
    SkillRule {
        pattern: Pattern::AnyOf(&["data scientist", "ml", "ai"]),
        technical: &["Machine Learning", "Data Science", "Python"],
        tools: &["TensorFlow", "scikit-learn"],
    },
];

/// Matched against "description title" of each of the first projects.
pub const PROJECT_SKILL_RULES: &[SkillRule] = &[
    SkillRule {
        pattern: Pattern::AnyOf(&["deep learning", "neural network"]),
        technical: &["Deep Learning"],
        tools: &[],
    },
    SkillRule {
        pattern: Pattern::AnyOf(&["iot"]),
        technical: &["IoT"],
        tools: &[],
    },
    SkillRule {
        pattern: Pattern::AnyOf(&["arduino"]),
        technical: &[],
        tools: &["Arduino"],
    },
    SkillRule {
        pattern: Pattern::AnyOf(&["python"]),
        technical: &["Python"],
        tools: &[],
    },
];

pub fn is_institution(title: &str) -> bool {
    let title = title.to_lowercase();
    INSTITUTION_NAME_VARIANTS.iter().any(|v| title.contains(v))
}

pub fn is_recognised_degree(degree: &str) -> bool {
    let degree = degree.to_lowercase();
    DEGREE_KEYWORDS.iter().any(|k| degree.contains(k))
}

pub fn branch_for_field(field: &str) -> Branch {
    let field = field.to_lowercase();
    BRANCH_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(&field))
        .map(|(_, branch)| *branch)
        .unwrap_or(DEFAULT_BRANCH)
}

/// Every rule in `rules` whose pattern matches `text` (any case).
pub fn matching_skill_rules<'r>(
    rules: &'r [SkillRule],
    text: &str,
) -> impl Iterator<Item = &'r SkillRule> {
    let text = text.to_lowercase();
    rules.iter().filter(move |rule| rule.pattern.matches(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_variants_case_insensitive() {
        assert!(is_institution("IIIT Naya Raipur"));
        assert!(is_institution("Dr. SPM IIIT-NR"));
        assert!(is_institution("IIITNR"));
        assert!(!is_institution("IIIT Hyderabad"));
    }

    #[test]
    fn test_degree_keywords() {
        assert!(is_recognised_degree("B.Tech"));
        assert!(is_recognised_degree("Master of Technology - MTech"));
        assert!(is_recognised_degree("Doctor of Philosophy"));
        assert!(!is_recognised_degree("High School"));
    }

    #[test]
    fn test_branch_rules_in_priority_order() {
        assert_eq!(branch_for_field("Computer Science and Engineering"), Branch::Cse);
        assert_eq!(branch_for_field("ECE"), Branch::Ece);
        assert_eq!(branch_for_field("E&C Engineering"), Branch::Ece);
        assert_eq!(branch_for_field("Data Science and Artificial Intelligence"), Branch::Dsai);
        assert_eq!(branch_for_field("DSAI"), Branch::Dsai);
    }

    #[test]
    fn test_electronics_field_is_shadowed_by_cs_substring() {
        assert_eq!(
            branch_for_field("Electronics and Communication Engineering"),
            Branch::Cse
        );
    }

    #[test]
    fn test_unknown_field_defaults_to_cse() {
        assert_eq!(branch_for_field("Mechanical Engineering"), Branch::Cse);
        assert_eq!(branch_for_field(""), Branch::Cse);
    }

    #[test]
    fn test_title_rules_accumulate() {
        let hits: Vec<_> = matching_skill_rules(TITLE_SKILL_RULES, "Business Analyst - ML Platform")
            .map(|r| r.technical[0])
            .collect();
        assert_eq!(hits, vec!["Data Analytics", "Machine Learning"]);
    }

    #[test]
    fn test_all_of_pattern_needs_every_needle() {
        let pattern = Pattern::AllOf(&["electronics", "communication"]);
        assert!(pattern.matches("electronics and communication"));
        assert!(!pattern.matches("electronics"));
    }
}
