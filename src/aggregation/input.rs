// src/aggregation/input.rs - Loading and pre-cleaning raw listings
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::matching::normalize::normalize;
use crate::models::location::RawLocation;

/// Reads one JSON array of raw listings.
pub async fn load_raw_location_file(path: &Path) -> Result<Vec<RawLocation>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read raw locations from {}", path.display()))?;
    let records: Vec<RawLocation> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse raw locations in {}", path.display()))?;
    debug!("Read {} raw locations from {}", records.len(), path.display());
    Ok(records)
}

/// Concatenates every file in order. Any unreadable file fails the whole load.
pub async fn load_raw_locations(paths: &[PathBuf]) -> Result<Vec<RawLocation>> {
    let mut all = Vec::new();
    for path in paths {
        let records = load_raw_location_file(path).await?;
        info!("Loaded {} raw locations from {}", records.len(), path.display());
        all.extend(records);
    }
    Ok(all)
}

/// Drops internal catalog rows that repeat an earlier row's normalized name and
/// sub-label. Supplier rows pass through untouched. Returns the kept rows and
/// how many were dropped.
pub fn dedupe_internal_locations(records: Vec<RawLocation>) -> (Vec<RawLocation>, usize) {
    let mut seen = HashSet::new();
    let before = records.len();
    let kept: Vec<RawLocation> = records
        .into_iter()
        .filter(|record| {
            if !record.is_internal() {
                return true;
            }
            let key = format!(
                "{}{}",
                normalize(&record.name),
                normalize(record.below_label.as_deref().unwrap_or(""))
            );
            seen.insert(key)
        })
        .collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        debug!("Dropped {} duplicate internal locations", dropped);
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_dedupe_internal_only() {
        let records = vec![
            RawLocation {
                below_label: Some("Lazio, Italy".to_string()),
                ..RawLocation::new("internal_1", "internal", "Rome Fiumicino")
            },
            RawLocation {
                below_label: Some("lazio italy".to_string()),
                ..RawLocation::new("internal_2", "internal", "ROME-FIUMICINO")
            },
            RawLocation::new("internal_3", "internal", "Rome Fiumicino"),
            RawLocation::new("gm_1", "greenmotion", "Rome Fiumicino"),
            RawLocation::new("gm_2", "greenmotion", "Rome Fiumicino"),
        ];
        let (kept, dropped) = dedupe_internal_locations(records);
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["internal_1", "internal_3", "gm_1", "gm_2"]);
        assert_eq!(dropped, 1);
    }

    #[tokio::test]
    async fn test_load_multiple_files_in_order() {
        let mut first = NamedTempFile::new().unwrap();
        write!(
            first,
            r#"[{{"id": "gm_359", "source": "greenmotion", "label": "Fiumicino Airport", "provider_location_id": "359"}}]"#
        )
        .unwrap();
        let mut second = NamedTempFile::new().unwrap();
        write!(
            second,
            r#"[{{"id": "internal_7", "source": "internal", "name": "Rome", "latitude": 41.8003, "longitude": 12.2389}},
               {{"id": "us_fco", "source": "usave", "name": "Rome Fiumicino Airport"}}]"#
        )
        .unwrap();

        let records = load_raw_locations(&[first.path().to_path_buf(), second.path().to_path_buf()])
            .await
            .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["gm_359", "internal_7", "us_fco"]);
        assert_eq!(records[0].name, "Fiumicino Airport");
    }

    #[tokio::test]
    async fn test_null_label_does_not_reject_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "us_1", "source": "usave", "label": null, "provider_location_id": "1"}},
               {{"id": "us_2", "source": "usave", "label": "Nice Airport", "provider_location_id": "2"}}]"#
        )
        .unwrap();

        let records = load_raw_location_file(file.path()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].name.is_empty());
        assert_eq!(records[1].name, "Nice Airport");
    }

    #[tokio::test]
    async fn test_load_reports_bad_files() {
        let mut bad = NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        let err = load_raw_locations(&[bad.path().to_path_buf()]).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse raw locations"));

        let missing = PathBuf::from("/nonexistent/raw_locations.json");
        assert!(load_raw_locations(&[missing]).await.is_err());
    }
}
