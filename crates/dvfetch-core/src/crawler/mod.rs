//! Discovery: depth-first walk of the listing API from a root URL.
//!
//! Directory nodes are descended into, file nodes become
//! [`DiscoveredFile`](crate::model::DiscoveredFile)s. Each listing URL is
//! fetched at most once. Any failed listing request fails the whole crawl.

mod name;
mod node;

pub use name::{clean_raw_filename, parse_reference_date, parse_source_id};
pub use node::{resolve_node_url, ListingNode};

use anyhow::{Context, Result};
use std::collections::HashSet;
use url::Url;

use crate::model::DiscoveredFile;
use crate::transport::Transport;

/// Source directories are named `S<source id>`.
fn source_directory_id(name: &str) -> Option<u32> {
    name.strip_prefix('S').and_then(|id| id.parse().ok())
}

/// Lists every file reachable from `root_url`, keeping only `source_id` when given.
/// Files appear in depth-first listing order, each once.
pub fn crawl<T: Transport>(
    transport: &mut T,
    root_url: &str,
    source_id: Option<u32>,
) -> Result<Vec<DiscoveredFile>> {
    let root = Url::parse(root_url).with_context(|| format!("invalid endpoint: {}", root_url))?;
    let mut stack = vec![root.to_string()];
    let mut visited: HashSet<String> = HashSet::new();
    let mut seen_files: HashSet<String> = HashSet::new();
    let mut found = Vec::new();

    while let Some(url) = stack.pop() {
        if !visited.insert(url.clone()) {
            continue;
        }
        let nodes = transport
            .list(&url)
            .with_context(|| format!("listing {} failed", url))?;
        tracing::debug!(url = %url, nodes = nodes.len(), "listed");

        let mut subdirs = Vec::new();
        for node in nodes {
            if node.directory {
                let skip = matches!(
                    (source_id, source_directory_id(&node.name)),
                    (Some(wanted), Some(id)) if wanted != id
                );
                if !skip {
                    subdirs.push(resolve_node_url(&root, &node.url)?.to_string());
                }
                continue;
            }
            let file = node.to_discovered(&root)?;
            if source_id.map_or(true, |s| s == file.source_id)
                && seen_files.insert(file.download_url.clone())
            {
                found.push(file);
            }
        }
        // Reverse so the first subdirectory is popped first.
        stack.extend(subdirs.into_iter().rev().filter(|u| !visited.contains(u)));
    }

    tracing::info!(files = found.len(), root = %root, "crawl finished");
    Ok(found)
}
