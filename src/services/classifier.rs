use crate::profile::SyncProfile;
use crate::types::{SubjectClassification, TopicBucket, VideoEntry, MISC_INDEX, MISC_PAPER};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Decides whether a catalog topic belongs to a taxonomy chapter.
pub trait TopicMatcher {
    fn matches(&self, topic: &str, chapter: &str) -> bool;
}

/// Case-insensitive containment in either direction.
///
/// Deliberately loose: a short chapter name will claim any longer topic
/// that happens to contain it, and an empty topic matches every chapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl TopicMatcher for SubstringMatcher {
    fn matches(&self, topic: &str, chapter: &str) -> bool {
        let topic = topic.to_lowercase();
        let chapter = chapter.to_lowercase();
        topic.contains(&chapter) || chapter.contains(&topic)
    }
}

pub struct TopicClassifier<'a, M: TopicMatcher = SubstringMatcher> {
    profile: &'a SyncProfile,
    matcher: M,
}

impl<'a> TopicClassifier<'a, SubstringMatcher> {
    pub fn new(profile: &'a SyncProfile) -> Self {
        Self::with_matcher(profile, SubstringMatcher)
    }
}

impl<'a, M: TopicMatcher> TopicClassifier<'a, M> {
    pub fn with_matcher(profile: &'a SyncProfile, matcher: M) -> Self {
        Self { profile, matcher }
    }

    /// Classify every subject that maps to a target file. Unmapped subjects
    /// are dropped without a diagnostic.
    pub fn classify(&self, bucket: &TopicBucket) -> Vec<SubjectClassification> {
        bucket
            .iter()
            .filter_map(|(subject, topics)| self.classify_subject(subject, topics))
            .collect()
    }

    pub fn classify_subject(
        &self,
        subject: &str,
        topics: &IndexMap<String, Vec<VideoEntry>>,
    ) -> Option<SubjectClassification> {
        let target = self.profile.resolve_subject(subject)?;
        let mut papers: BTreeMap<String, BTreeMap<usize, Vec<VideoEntry>>> = BTreeMap::new();

        for (topic, videos) in topics {
            let (paper, index) = self
                .locate(&target.key, topic)
                .unwrap_or_else(|| (MISC_PAPER.to_string(), MISC_INDEX));

            debug!("{} / {} -> {} #{}", subject, topic, paper, index);

            papers
                .entry(paper)
                .or_default()
                .entry(index)
                .or_default()
                .extend(videos.iter().cloned());
        }

        Some(SubjectClassification {
            subject: subject.to_string(),
            subject_key: target.key.clone(),
            filename: target.filename.clone(),
            papers,
        })
    }

    /// First chapter (paper declaration order, then chapter order) the topic
    /// matches, as (paper, 1-based index).
    pub fn locate(&self, subject_key: &str, topic: &str) -> Option<(String, usize)> {
        let papers = self.profile.taxonomy.papers(subject_key)?;

        papers.iter().find_map(|(paper, chapters)| {
            chapters
                .iter()
                .position(|chapter| self.matcher.matches(topic, chapter))
                .map(|pos| (paper.clone(), pos + 1))
        })
    }
}
