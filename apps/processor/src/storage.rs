use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::pipeline::batch::BatchInput;
use crate::profile::models::{AlumniProfile, ValidationReport};

pub const REPORT_FILE_NAME: &str = "processing_report.json";

/// Fails unless `dir` exists and is a directory.
pub async fn ensure_input_dir(dir: &Path) -> Result<()> {
    let metadata = fs::metadata(dir)
        .await
        .with_context(|| format!("Input directory {} does not exist", dir.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("Input path {} is not a directory", dir.display());
    }
    Ok(())
}

/// Every `*.json` file directly inside `dir`, sorted by path.
pub async fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && entry.file_type().await?.is_file() {
            files.push(path);
        }
    }
    files.sort();

    debug!("Discovered {} input files in {}", files.len(), dir.display());
    Ok(files)
}

/// Reads one input file. Read or parse errors become an `Unreadable` input
/// so the batch can count them instead of aborting.
pub async fn load_input(path: &Path) -> BatchInput {
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let parsed = match fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match parsed {
        Ok(content) => BatchInput::Document { source, content },
        Err(reason) => BatchInput::Unreadable { source, reason },
    }
}

/// `validated_<stem>.json`, where the stem comes from `linkedin_id`, then `id`,
/// then the record's ordinal in the run.
pub fn profile_file_name(profile: &AlumniProfile, ordinal: usize) -> String {
    let stem = [profile.linkedin_id.as_str(), profile.id.as_str()]
        .into_iter()
        .map(sanitize_stem)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| format!("unidentified_{ordinal}"));
    format!("validated_{stem}.json")
}

fn sanitize_stem(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

pub async fn write_profile(dir: &Path, profile: &AlumniProfile, ordinal: usize) -> Result<PathBuf> {
    let path = dir.join(profile_file_name(profile, ordinal));
    write_json(&path, profile).await?;
    Ok(path)
}

pub async fn write_report(dir: &Path, report: &ValidationReport) -> Result<PathBuf> {
    let path = dir.join(REPORT_FILE_NAME);
    write_json(&path, report).await?;
    info!("Report saved to: {}", path.display());
    Ok(path)
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pipeline::batch::ReportBuilder;
    use crate::profile::validation::validate_profile;

    fn profile(id: &str, linkedin_id: &str) -> AlumniProfile {
        validate_profile(
            &json!({"id": id, "linkedin_id": linkedin_id, "name": "Asha"}),
            2026,
        )
        .unwrap()
    }

    #[test]
    fn test_file_name_prefers_linkedin_id() {
        assert_eq!(
            profile_file_name(&profile("42", "asha-verma-01"), 3),
            "validated_asha-verma-01.json"
        );
    }

    #[test]
    fn test_file_name_sanitizes_and_falls_back() {
        assert_eq!(
            profile_file_name(&profile("42", "../../etc/passwd"), 0),
            "validated_etcpasswd.json"
        );
        assert_eq!(profile_file_name(&profile("42", ""), 0), "validated_42.json");
        assert_eq!(
            profile_file_name(&profile("", "  "), 7),
            "validated_unidentified_7.json"
        );
    }

    #[tokio::test]
    async fn test_discover_only_json_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.JSON", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").await.unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).await.unwrap();

        let files = discover_inputs(dir.path()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[tokio::test]
    async fn test_ensure_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_input_dir(dir.path()).await.is_ok());

        let missing = dir.path().join("alumnidata");
        let err = ensure_input_dir(&missing).await.unwrap_err();
        assert!(format!("{err:#}").contains("does not exist"));

        let file = dir.path().join("a.json");
        fs::write(&file, "{}").await.unwrap();
        let err = ensure_input_dir(&file).await.unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[tokio::test]
    async fn test_discover_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_inputs(&dir.path().join("missing")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_input_parses_or_marks_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        fs::write(&good, r#"[{"name": "Asha"}]"#).await.unwrap();
        fs::write(&bad, "{not json").await.unwrap();

        match load_input(&good).await {
            BatchInput::Document { source, content } => {
                assert_eq!(source, "good.json");
                assert!(content.is_array());
            }
            other => panic!("expected document, got {other:?}"),
        }
        assert!(matches!(
            load_input(&bad).await,
            BatchInput::Unreadable { .. }
        ));
    }

    #[tokio::test]
    async fn test_write_profile_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("validated");

        let path = write_profile(&out, &profile("42", "asha"), 0).await.unwrap();
        let written: Value =
            serde_json::from_str(&fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["linkedin_id"], "asha");
        assert_eq!(written["branch"], "CSE");
        assert!(written.get("graduationYear").is_some());

        let report_path = write_report(&out, &ReportBuilder::default().finalize())
            .await
            .unwrap();
        assert!(report_path.ends_with(REPORT_FILE_NAME));
        let report: ValidationReport =
            serde_json::from_str(&fs::read_to_string(&report_path).await.unwrap()).unwrap();
        assert_eq!(report.total_profiles, 0);
    }
}
