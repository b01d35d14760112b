// src/catalog/snapshot.rs - Persisting the canonical set as a JSON file
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::models::location::CanonicalSet;

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

/// Writes `set` as a pretty-printed JSON array.
///
/// The previous snapshot, if any, is copied to `<path>.bak` first. The new
/// content goes to a temporary file next to `path` and is renamed over it, so
/// readers see either the old or the new snapshot.
pub async fn save_snapshot(path: &Path, set: &CanonicalSet) -> Result<()> {
    let json = serde_json::to_string_pretty(set).context("Failed to serialize canonical set")?;

    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check for snapshot {}", path.display()))?;
    if exists {
        let backup = backup_path(path);
        tokio::fs::copy(path, &backup)
            .await
            .with_context(|| format!("Failed to back up snapshot to {}", backup.display()))?;
    }

    let tmp = with_suffix(path, ".tmp");
    tokio::fs::write(&tmp, json)
        .await
        .with_context(|| format!("Failed to write snapshot to {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to move snapshot into place at {}", path.display()))?;

    info!("Saved {} unified locations to {}", set.len(), path.display());
    Ok(())
}

async fn read_set(path: &Path) -> Result<Option<CanonicalSet>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read snapshot {}", path.display()))
        }
    };
    match serde_json::from_str::<CanonicalSet>(&contents) {
        Ok(set) => Ok(Some(set)),
        Err(e) => {
            error!("Snapshot {} is not a valid canonical set: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Loads the snapshot at `path`.
///
/// A missing or undecodable snapshot yields an empty set (falling back to the
/// `.bak` copy when the main file is corrupt). I/O failures, including a path
/// whose existence cannot be checked, are errors.
pub async fn load_snapshot(path: &Path) -> Result<CanonicalSet> {
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check for snapshot {}", path.display()))?;
    if !exists {
        warn!("No snapshot at {}, serving an empty catalog", path.display());
        return Ok(CanonicalSet::default());
    }
    if let Some(set) = read_set(path).await? {
        info!("Loaded {} unified locations from {}", set.len(), path.display());
        return Ok(set);
    }

    let backup = backup_path(path);
    match read_set(&backup).await? {
        Some(set) => {
            warn!(
                "Using backup snapshot {} ({} unified locations)",
                backup.display(),
                set.len()
            );
            Ok(set)
        }
        None => {
            error!("No usable snapshot at {} or its backup, serving an empty catalog", path.display());
            Ok(CanonicalSet::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::{LocationType, ProviderMapping, UnifiedLocation};
    use tempfile::tempdir;

    fn sample_set(name: &str) -> CanonicalSet {
        CanonicalSet::new(vec![UnifiedLocation {
            unified_location_id: crc32fast::hash(name.to_lowercase().as_bytes()),
            name: name.to_string(),
            aliases: vec!["Fiumicino Airport".to_string()],
            city: Some("Rome".to_string()),
            country: Some("Italy".to_string()),
            latitude: 41.8009,
            longitude: 12.23895,
            location_type: LocationType::Airport,
            providers: vec![ProviderMapping {
                provider: "greenmotion".to_string(),
                pickup_id: "359".to_string(),
                original_name: "Fiumicino Airport".to_string(),
            }],
            our_location_id: Some("internal_7".to_string()),
        }])
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unified_locations.json");
        let set = sample_set("Rome Fiumicino Airport");

        save_snapshot(&path, &set).await.unwrap();
        assert!(!backup_path(&path).exists());
        assert!(!with_suffix(&path, ".tmp").exists());
        assert_eq!(load_snapshot(&path).await.unwrap(), set);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.is_array());
        assert_eq!(raw[0]["providers"][0]["pickup_id"], "359");
    }

    #[tokio::test]
    async fn test_second_save_keeps_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unified_locations.json");
        let first = sample_set("Rome Fiumicino Airport");
        let second = sample_set("Rome Ciampino Airport");

        save_snapshot(&path, &first).await.unwrap();
        save_snapshot(&path, &second).await.unwrap();
        assert_eq!(load_snapshot(&path).await.unwrap(), second);

        // corrupt the main file: the previous snapshot is served
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_snapshot(&path).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_missing_or_corrupt_snapshot_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unified_locations.json");
        assert!(load_snapshot(&path).await.unwrap().is_empty());

        std::fs::write(&path, "[{\"name\": 5}]").unwrap();
        assert!(load_snapshot(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_uncheckable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a regular file").unwrap();
        // a file used as a directory cannot be checked, which is not the same as missing
        let path = blocker.join("unified_locations.json");

        let err = load_snapshot(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to check for snapshot"));
        assert!(save_snapshot(&path, &sample_set("Nice Airport")).await.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_snapshot_is_an_error() {
        let dir = tempdir().unwrap();
        // exists but cannot be read as a file
        assert!(load_snapshot(dir.path()).await.is_err());
    }
}
