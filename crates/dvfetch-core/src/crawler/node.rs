//! Listing API nodes and their conversion into discovered files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use super::name::{clean_raw_filename, parse_reference_date, parse_source_id};
use crate::model::DiscoveredFile;

/// One entry of a listing page: a directory to descend into, or a file.
/// Fields the listing carries beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingNode {
    pub name: String,
    /// Root-relative path, e.g. `/v2/list/2020/07/16`.
    pub url: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5sum: Option<String>,
    #[serde(default)]
    pub directory: bool,
}

/// Resolves a node path against the origin of `root`. A missing leading `/` is tolerated.
pub fn resolve_node_url(root: &Url, node_path: &str) -> Result<Url> {
    let absolute = if node_path.starts_with('/') || node_path.contains("://") {
        node_path.to_string()
    } else {
        format!("/{}", node_path)
    };
    root.join(&absolute)
        .with_context(|| format!("invalid node url: {}", node_path))
}

impl ListingNode {
    /// A file node as a [`DiscoveredFile`], with its name cleaned and its
    /// source id and reference date parsed.
    pub fn to_discovered(&self, root: &Url) -> Result<DiscoveredFile> {
        let file_name = clean_raw_filename(&self.name);
        let md5sum = self
            .md5sum
            .clone()
            .with_context(|| format!("file node without md5sum: {}", self.name))?;
        Ok(DiscoveredFile {
            source_id: parse_source_id(&file_name)?,
            reference_date: parse_reference_date(&file_name)?,
            download_url: resolve_node_url(root, &self.url)?.to_string(),
            size: self.size,
            md5sum,
            file_name,
        })
    }
}
