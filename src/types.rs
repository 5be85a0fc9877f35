use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Chapter slot that collects topics matching no chapter.
pub const MISC_INDEX: usize = 0;

/// Paper that owns the misc slot.
pub const MISC_PAPER: &str = "Paper 1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
}

/// subject -> topic -> videos, both levels in encounter order.
pub type TopicBucket = IndexMap<String, IndexMap<String, Vec<VideoEntry>>>;

/// paper -> chapter index -> videos. Papers iterate in lexical order.
pub type PaperChapters = BTreeMap<String, BTreeMap<usize, Vec<VideoEntry>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub source: String,
    pub source_type: SourceType,
    pub fetched_at: String,
    pub total_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SourceType {
    LocalFile,
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectClassification {
    /// Subject string as it appeared in the catalog.
    pub subject: String,
    /// Key of the subject/file table entry that matched.
    pub subject_key: String,
    pub filename: String,
    pub papers: PaperChapters,
}

impl SubjectClassification {
    pub fn video_count(&self) -> usize {
        self.papers
            .values()
            .flat_map(|chapters| chapters.values())
            .map(Vec::len)
            .sum()
    }

    pub fn misc_count(&self) -> usize {
        self.papers
            .values()
            .filter_map(|chapters| chapters.get(&MISC_INDEX))
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFragment {
    pub filename: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub content: String,
    pub added: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub root: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Updated { added: usize },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub filename: String,
    pub status: FileStatus,
}
