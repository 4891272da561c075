//! Normalisation rules shared by the heuristic path and schema validation.

use crate::profile::models::{Experience, Position};

/// Expands nested positions into sibling experience entries.
///
/// Each position inherits `company`, `company_id`, `company_logo_url` and `url`
/// from its parent and takes its own title, location, dates and `meta` (as `duration`).
/// Entries without positions pass through with `positions` cleared. Order is kept.
/// One level only: a position cannot itself carry positions.
pub fn flatten_experience(entries: Vec<Experience>) -> Vec<Experience> {
    let mut result = Vec::with_capacity(entries.len());

    for mut entry in entries {
        if entry.positions.is_empty() {
            result.push(entry);
            continue;
        }

        let positions = std::mem::take(&mut entry.positions);
        result.extend(
            positions
                .into_iter()
                .map(|position| from_position(&entry, position)),
        );
    }

    result
}

fn from_position(parent: &Experience, position: Position) -> Experience {
    Experience {
        title: position.title,
        company: parent.company.clone(),
        company_id: parent.company_id.clone(),
        company_logo_url: parent.company_logo_url.clone(),
        location: position.location,
        start_date: position.start_date,
        end_date: position.end_date,
        duration: position.meta,
        description_html: None,
        url: parent.url.clone(),
        positions: Vec::new(),
    }
}

/// Trims surrounding whitespace from a company name, keeping `None` as is.
pub fn trim_company(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(title: &str) -> Position {
        Position {
            title: Some(title.to_string()),
            start_date: Some("2021".to_string()),
            end_date: Some("2021".to_string()),
            meta: Some("6 mos".to_string()),
            location: Some("Pune".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_positions_become_siblings_with_inherited_company() {
        let parent = Experience {
            company: Some("Acme".to_string()),
            company_id: Some("acme-inc".to_string()),
            company_logo_url: Some("x.png".to_string()),
            url: Some("https://linkedin.com/company/acme".to_string()),
            title: Some("ignored parent title".to_string()),
            positions: vec![position("Intern"), position("SDE I"), position("SDE II")],
            ..Default::default()
        };

        let flat = flatten_experience(vec![parent]);

        assert_eq!(flat.len(), 3);
        let titles: Vec<_> = flat.iter().map(|e| e.title.as_deref().unwrap()).collect();
        assert_eq!(titles, vec!["Intern", "SDE I", "SDE II"]);
        for entry in &flat {
            assert!(entry.positions.is_empty());
            assert_eq!(entry.company.as_deref(), Some("Acme"));
            assert_eq!(entry.company_id.as_deref(), Some("acme-inc"));
            assert_eq!(entry.company_logo_url.as_deref(), Some("x.png"));
            assert_eq!(entry.url.as_deref(), Some("https://linkedin.com/company/acme"));
            assert_eq!(entry.duration.as_deref(), Some("6 mos"));
        }
    }

    #[test]
    fn test_entries_without_positions_pass_through_in_order() {
        let first = Experience {
            title: Some("Analyst".to_string()),
            company: Some("Beta".to_string()),
            duration: Some("1 yr".to_string()),
            ..Default::default()
        };
        let nested = Experience {
            company: Some("Acme".to_string()),
            positions: vec![position("Intern")],
            ..Default::default()
        };
        let last = Experience {
            title: Some("Founder".to_string()),
            ..Default::default()
        };

        let flat = flatten_experience(vec![first.clone(), nested, last.clone()]);

        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0], first);
        assert_eq!(flat[1].title.as_deref(), Some("Intern"));
        assert_eq!(flat[2], last);
    }

    #[test]
    fn test_flattening_is_terminal() {
        let nested = Experience {
            company: Some("Acme".to_string()),
            positions: vec![position("Intern")],
            ..Default::default()
        };
        let once = flatten_experience(vec![nested]);
        assert_eq!(flatten_experience(once.clone()), once);
    }

    #[test]
    fn test_trim_company() {
        assert_eq!(
            trim_company(Some("  Acme Corp \n".to_string())).as_deref(),
            Some("Acme Corp")
        );
        assert_eq!(trim_company(None), None);
    }
}
