use crate::error::{ChapterSyncError, Result};
use crate::profile::Markers;
use crate::types::{MergeOutcome, RenderedFragment};
use regex::Regex;
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

/// Splits a target document around its marked region and prepends new videos.
pub struct BlockMerger {
    markers: Markers,
    watch_id: Regex,
}

struct MarkedRegion<'c> {
    before: &'c str,
    block: &'c str,
    after: &'c str,
}

impl BlockMerger {
    pub fn new(markers: Markers) -> Result<Self> {
        Ok(Self {
            markers,
            watch_id: Regex::new(r"watch\?v=([A-Za-z0-9_\-]+)")?,
        })
    }

    fn split<'c>(&self, content: &'c str, label: &str) -> Result<MarkedRegion<'c>> {
        let (start, end) = (&self.markers.start, &self.markers.end);

        let (start_count, end_count) = (
            content.matches(start.as_str()).count(),
            content.matches(end.as_str()).count(),
        );
        if start_count == 0 || end_count == 0 {
            return Err(ChapterSyncError::MarkersMissing {
                path: label.to_string(),
            });
        }
        if start_count > 1 || end_count > 1 {
            return Err(ChapterSyncError::MarkersDuplicated {
                path: label.to_string(),
            });
        }

        let start_at = content.find(start.as_str()).unwrap_or_default();
        let rest = &content[start_at + start.len()..];
        let end_at = rest
            .find(end.as_str())
            .ok_or_else(|| ChapterSyncError::MarkersOutOfOrder {
                path: label.to_string(),
            })?;

        Ok(MarkedRegion {
            before: &content[..start_at],
            block: &rest[..end_at],
            after: &rest[end_at + end.len()..],
        })
    }

    /// Video ids referenced by `watch?v=` links in `text`.
    pub fn video_ids(&self, text: &str) -> Vec<String> {
        self.watch_id
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn line_id<'l>(&self, line: &'l str) -> Option<&'l str> {
        self.watch_id
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Ids already present in the marked region of `content`.
    pub fn existing_ids(&self, content: &str, label: &str) -> Result<HashSet<String>> {
        let region = self.split(content, label)?;
        Ok(self.video_ids(region.block).into_iter().collect())
    }

    /// Merge fragment lines into `content`. Only lines carrying a video id
    /// absent from the block survive; the document is returned untouched when
    /// nothing is new.
    pub fn merge(&self, content: &str, lines: &[String], label: &str) -> Result<MergeOutcome> {
        let region = self.split(content, label)?;
        let mut seen: HashSet<String> = self.video_ids(region.block).into_iter().collect();

        let mut new_lines: Vec<&str> = Vec::new();
        let mut added = Vec::new();
        for line in lines {
            let Some(id) = self.line_id(line) else {
                continue;
            };
            if seen.insert(id.to_string()) {
                new_lines.push(line);
                added.push(id.to_string());
            }
        }

        if added.is_empty() {
            return Ok(MergeOutcome {
                content: content.to_string(),
                added,
            });
        }

        let block = format!(
            "\n{}\n{}\n{}",
            self.markers.batch_comment,
            new_lines.join("\n"),
            region.block.trim()
        );
        let merged = format!(
            "{}{}\n{}\n{}{}",
            region.before, self.markers.start, block, self.markers.end, region.after
        );

        Ok(MergeOutcome {
            content: merged,
            added,
        })
    }

    /// Merge a fragment into `root/<filename>` and rewrite the file unless
    /// `dry_run` is set. The rewrite happens even when no video was added.
    pub async fn apply(
        &self,
        root: &Path,
        fragment: &RenderedFragment,
        dry_run: bool,
    ) -> Result<MergeOutcome> {
        let path = root.join(&fragment.filename);
        let content = Self::read_target(&path).await?;
        let outcome = self.merge(&content, &fragment.lines, &fragment.filename)?;

        if dry_run {
            debug!("Dry run, not writing {}", path.display());
            return Ok(outcome);
        }

        let content = outcome.content.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &content))
            .await
            .map_err(|e| ChapterSyncError::Anyhow(anyhow::Error::new(e)))??;

        Ok(outcome)
    }

    /// Number of videos already in the marked region of `root/<filename>`.
    pub async fn inspect(&self, root: &Path, filename: &str) -> Result<usize> {
        let content = Self::read_target(&root.join(filename)).await?;
        Ok(self.existing_ids(&content, filename)?.len())
    }

    async fn read_target(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ChapterSyncError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(fs::read_to_string(path).await?)
    }
}

/// Write through a temp file in the same directory, then rename over `path`.
/// Readers see either the old document or the new one, never a partial write.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| ChapterSyncError::Persist {
        path: path.display().to_string(),
        reason: e.error.to_string(),
    })?;

    Ok(())
}
