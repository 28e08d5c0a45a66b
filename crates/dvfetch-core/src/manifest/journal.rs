//! Per-day JSON manifest: an audit trail of every file expected on a day.
//!
//! One file per reference date at
//! `<data_root>/<YYYY>/<MM>/<DD>/download_manifest_<YYYYMMDD>.json`, holding a
//! JSON array of [`ManifestEntry`]. Updates append entries that are not
//! already present (whole-entry equality), re-sort by source id and rewrite
//! the file.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::model::DownloadRecord;
use crate::storage;
use crate::url_model;

/// One journaled file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file_name: String,
    pub download_url: String,
    pub file_path: String,
    pub source_id: u32,
    #[serde(with = "iso_date")]
    pub reference_date: NaiveDate,
    pub size: u64,
    pub md5sum: String,
}

impl From<&DownloadRecord> for ManifestEntry {
    fn from(r: &DownloadRecord) -> Self {
        Self {
            file_name: r.file_name.clone(),
            download_url: r.download_url.clone(),
            file_path: r.file_path.to_string_lossy().into_owned(),
            source_id: r.source_id,
            reference_date: r.reference_date,
            size: r.size,
            md5sum: r.md5sum.clone(),
        }
    }
}

/// Where the journal for `record`'s reference date lives.
pub fn day_manifest_path(record: &DownloadRecord) -> Result<PathBuf> {
    let day_dir = url_model::day_directory(&record.file_path).with_context(|| {
        format!(
            "file path has no day directory: {}",
            record.file_path.display()
        )
    })?;
    Ok(day_dir.join(format!(
        "download_manifest_{}.json",
        record.reference_date.format("%Y%m%d")
    )))
}

/// Journals `records`, one file per distinct reference date.
pub fn record_files(records: &[DownloadRecord]) -> Result<()> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&DownloadRecord>> = BTreeMap::new();
    for r in records {
        by_date.entry(r.reference_date).or_default().push(r);
    }
    for (date, day_records) in by_date {
        let path = day_manifest_path(day_records[0])?;
        let entries: Vec<ManifestEntry> = day_records.into_iter().map(ManifestEntry::from).collect();
        update_day_manifest(&path, &entries)?;
        tracing::debug!(%date, path = %path.display(), "updated day manifest");
    }
    Ok(())
}

/// Appends new entries to the journal at `path` (creating it if needed),
/// sorts by source id and rewrites the whole file.
pub fn update_day_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let mut current: Vec<ManifestEntry> = match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("parse day manifest: {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e).with_context(|| format!("read day manifest: {}", path.display())),
    };
    for entry in entries {
        if !current.contains(entry) {
            current.push(entry.clone());
        }
    }
    current.sort_by_key(|e| e.source_id);

    let json = serde_json::to_string_pretty(&current).context("serialize day manifest")?;
    storage::write_atomic(path, json.as_bytes())
}

/// ISO-8601 reference dates: written as `YYYY-MM-DDT00:00:00`, read from
/// that form or a bare `YYYY-MM-DD`.
mod iso_date {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const DATETIME: &str = "%Y-%m-%dT%H:%M:%S";
    const DATE: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format("%Y-%m-%dT00:00:00"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME)
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(&raw, DATE))
            .map_err(serde::de::Error::custom)
    }
}
