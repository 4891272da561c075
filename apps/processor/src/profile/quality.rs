use crate::profile::models::AlumniProfile;

/// Fixed denominator of the completeness score.
const TOTAL_WEIGHT: u32 = 12;

type Check = fn(&AlumniProfile) -> bool;

const QUALITY_CHECKLIST: &[(&str, u32, Check)] = &[
    ("batch", 1, |p: &AlumniProfile| p.has_batch()),
    ("graduationYear", 1, |p: &AlumniProfile| {
        p.graduation_year.as_deref().is_some_and(|y| !y.is_empty())
    }),
    ("current_company", 2, |p: &AlumniProfile| p.current_company.is_some()),
    ("about", 1, |p: &AlumniProfile| p.about.as_deref().is_some_and(|a| !a.is_empty())),
    ("education", 2, |p: &AlumniProfile| !p.education.is_empty()),
    ("experience", 2, |p: &AlumniProfile| !p.experience.is_empty()),
    ("skills", 2, |p: &AlumniProfile| p.has_skills()),
    ("location", 1, |p: &AlumniProfile| {
        p.location.as_deref().is_some_and(|l| !l.is_empty())
    }),
];

impl AlumniProfile {
    /// Weighted completeness over a fixed checklist, in [0, 1], rounded to 2 decimals.
    pub fn calculate_data_quality(&self) -> f64 {
        let filled: u32 = QUALITY_CHECKLIST
            .iter()
            .filter(|(_, _, check)| check(self))
            .map(|(_, weight, _)| weight)
            .sum();
        let score = f64::from(filled) / f64::from(TOTAL_WEIGHT);
        ((score * 100.0).round() / 100.0).clamp(0.0, 1.0)
    }

    /// Checklist fields that contributed nothing to the score.
    pub fn missing_quality_fields(&self) -> Vec<&'static str> {
        QUALITY_CHECKLIST
            .iter()
            .filter(|(_, _, check)| !check(self))
            .map(|(field, _, _)| *field)
            .collect()
    }
}
