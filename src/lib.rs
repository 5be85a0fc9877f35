//! # Chapter Sync Library
//!
//! Pulls tagged video listings from a course catalog page, sorts them onto a
//! fixed per-subject chapter taxonomy, and injects the new ones into the
//! marked region of each subject's static HTML page.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chapter_sync::{build_fragments, BlockMerger, CatalogFetcher, SyncProfile};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let profile = SyncProfile::builtin();
//!
//!     let fetcher = CatalogFetcher::new(20)?;
//!     let (html, _metadata) = fetcher.fetch(chapter_sync::profile::DEFAULT_SOURCE_URL).await?;
//!
//!     let merger = BlockMerger::new(profile.markers.clone())?;
//!     for fragment in build_fragments(&html, &profile)? {
//!         let outcome = merger.apply(Path::new("."), &fragment, false).await?;
//!         println!("{}: {} new videos", fragment.filename, outcome.added.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod profile;
pub mod services;
pub mod types;

pub use error::{ChapterSyncError, Result};
pub use profile::{ChapterTaxonomy, Markers, SubjectFile, SyncProfile};
pub use services::{
    BlockMerger, CatalogFetcher, FragmentRenderer, SubstringMatcher, TopicClassifier,
    TopicMatcher, VideoExtractor,
};
pub use types::{
    CatalogMetadata, FileReport, FileStatus, MergeOutcome, RenderedFragment, SourceType,
    SubjectClassification, SyncConfig, TopicBucket, VideoEntry,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract and classify every tagged video on a catalog page.
pub fn classify_catalog(
    html: &str,
    profile: &SyncProfile,
) -> Result<(TopicBucket, Vec<SubjectClassification>)> {
    let bucket = VideoExtractor::new()?.extract(html);
    let classifications = TopicClassifier::new(profile).classify(&bucket);
    Ok((bucket, classifications))
}

/// Rendered fragment per target file for a catalog page.
pub fn build_fragments(html: &str, profile: &SyncProfile) -> Result<Vec<RenderedFragment>> {
    let (_, classifications) = classify_catalog(html, profile)?;
    Ok(FragmentRenderer::new(&profile.taxonomy).render_files(&classifications))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{AUTO_END, AUTO_START};
    use tempfile::TempDir;

    const CATALOG: &str = r#"<html><body>
        <div class="lessons">
          <a data-name="wave01" data-topic_name="তরঙ্গ" data-subject_name="Physics">Waves</a>
          <a data-name="abc123" data-topic_name="ভেক্টর" data-subject_name="Physics">Intro to Vectors</a>
          <a data-name="heat01" data-topic_name="তাপগতিবিদ্যা" data-subject_name="Physics">Heat engines</a>
          <a data-name="stat01" data-topic_name="স্থির তড়িৎ" data-subject_name="Physics">Electrostatics</a>
          <a data-name="" data-topic_name="Live class recap" data-subject_name="Physics"
             href="https://www.youtube.com/watch?v=misc01&list=x">Recap</a>
          <a data-name="circ01" data-topic_name="বৃত্ত ও বৃত্তস্থ কোণ" data-subject_name="Higher Math">Circles</a>
          <a data-name="acct01" data-topic_name="Ledger" data-subject_name="Accounting">Ledgers</a>
        </div>
    </body></html>"#;

    fn target(block: &str) -> String {
        format!(
            "<html><body><nav>menu</nav>\n{}{}{}\n</body></html>",
            AUTO_START, block, AUTO_END
        )
    }

    #[test]
    fn test_classify_catalog() {
        let profile = SyncProfile::builtin();
        let (bucket, classifications) = classify_catalog(CATALOG, &profile).unwrap();

        assert_eq!(bucket.len(), 3);
        // Accounting has no target file.
        assert_eq!(classifications.len(), 2);

        let physics = &classifications[0];
        assert_eq!(physics.filename, "physics.html");
        assert_eq!(physics.video_count(), 5);
        assert_eq!(physics.misc_count(), 1);
        assert_eq!(physics.papers["Paper 1"][&2][0].id, "abc123");
        assert_eq!(physics.papers["Paper 2"][&2][0].id, "stat01");
        // "গতিবিদ্যা" (paper 1, chapter 3) is contained in the thermodynamics topic.
        assert_eq!(physics.papers["Paper 1"][&3][0].id, "heat01");

        let math = &classifications[1];
        assert_eq!(math.filename, "math.html");
        assert_eq!(math.papers["Paper 1"][&4][0].id, "circ01");
    }

    #[test]
    fn test_fragment_chapter_order_ignores_encounter_order() {
        let profile = SyncProfile::builtin();
        let fragments = build_fragments(CATALOG, &profile).unwrap();

        let physics = fragments.iter().find(|f| f.filename == "physics.html").unwrap();
        let pos = |needle: &str| physics.lines.iter().position(|l| l.contains(needle)).unwrap();

        // "তরঙ্গ" (chapter 9) was encountered before "ভেক্টর" (chapter 2).
        assert!(pos("watch?v=abc123") < pos("watch?v=wave01"));
        assert!(pos("<h2>Paper 1</h2>") < pos("<h2>Paper 2</h2>"));
        assert!(pos("<h3>Misc</h3>") < pos("<h2>Paper 2</h2>"));
        assert!(pos("<h3>Misc</h3>") < pos("watch?v=misc01"));
        assert!(physics.lines.contains(
            &r#"<li><a href="https://www.youtube.com/watch?v=abc123" target="_blank">Intro to Vectors</a></li>"#
                .to_string()
        ));
    }

    #[tokio::test]
    async fn test_full_sync_workflow() {
        let dir = TempDir::new().unwrap();
        let existing = "\n<li><a href=\"https://www.youtube.com/watch?v=abc123\" target=\"_blank\">Intro to Vectors</a></li>\n";
        std::fs::write(dir.path().join("physics.html"), target(existing)).unwrap();
        // math.html is missing on purpose.

        let profile = SyncProfile::builtin();
        let merger = BlockMerger::new(profile.markers.clone()).unwrap();
        let fragments = build_fragments(CATALOG, &profile).unwrap();

        let mut added = Vec::new();
        let mut skipped = Vec::new();
        for fragment in &fragments {
            match merger.apply(dir.path(), fragment, false).await {
                Ok(outcome) => added.push((fragment.filename.clone(), outcome.added.len())),
                Err(e) if e.is_skippable() => skipped.push(fragment.filename.clone()),
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(added, vec![("physics.html".to_string(), 4)]);
        assert_eq!(skipped, vec!["math.html".to_string()]);

        let written = std::fs::read_to_string(dir.path().join("physics.html")).unwrap();
        assert_eq!(written.matches("watch?v=abc123").count(), 1);
        assert!(written.starts_with("<html><body><nav>menu</nav>\n"));

        // Second pass adds nothing and leaves the page as it was.
        for fragment in fragments.iter().filter(|f| f.filename == "physics.html") {
            let outcome = merger.apply(dir.path(), fragment, false).await.unwrap();
            assert!(outcome.added.is_empty());
        }
        let rewritten = std::fs::read_to_string(dir.path().join("physics.html")).unwrap();
        assert_eq!(rewritten, written);
    }
}
