use crate::error::{ChapterSyncError, Result};
use crate::types::{TopicBucket, VideoEntry};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

const VIDEO_SELECTOR: &str = "[data-name][data-topic_name]";

/// Pulls tagged video elements out of the catalog page.
pub struct VideoExtractor {
    video_selector: Selector,
    watch_pattern: Regex,
    short_link_pattern: Regex,
    whitespace: Regex,
}

impl VideoExtractor {
    pub fn new() -> Result<Self> {
        let video_selector =
            Selector::parse(VIDEO_SELECTOR).map_err(|e| ChapterSyncError::Selector {
                reason: format!("{}: {:?}", VIDEO_SELECTOR, e),
            })?;

        Ok(Self {
            video_selector,
            watch_pattern: Regex::new(r"v=([^&\s]+)")?,
            short_link_pattern: Regex::new(r"youtu\.be/([^?\s]+)")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn extract(&self, html: &str) -> TopicBucket {
        let document = Html::parse_document(html);
        let elements: Vec<ElementRef> = document.select(&self.video_selector).collect();
        info!("Found {} video elements", elements.len());

        let mut bucket = TopicBucket::new();
        for element in elements {
            let Some((subject, topic, entry)) = self.read_element(&element) else {
                continue;
            };
            bucket
                .entry(subject)
                .or_default()
                .entry(topic)
                .or_default()
                .push(entry);
        }

        debug!(
            "Grouped videos into {} subjects, {} topics",
            bucket.len(),
            bucket.values().map(|topics| topics.len()).sum::<usize>()
        );
        bucket
    }

    fn read_element(&self, element: &ElementRef) -> Option<(String, String, VideoEntry)> {
        let attrs = element.value();
        let topic_attr = attrs.attr("data-topic_name");

        let subject = self.normalize(non_empty(attrs.attr("data-subject_name")).or(topic_attr));
        let topic = self.normalize(topic_attr);

        let id = match non_empty(attrs.attr("data-name")) {
            Some(name) => name.to_string(),
            None => self.video_id_from_link(attrs.attr("href")?)?,
        };

        let text: String = element.text().map(str::trim).collect();
        let title = if !text.is_empty() {
            self.normalize(Some(text.as_str()))
        } else if !topic.is_empty() {
            topic.clone()
        } else {
            self.normalize(Some(id.as_str()))
        };

        Some((subject, topic, VideoEntry { id, title }))
    }

    /// `...?v=<id>` or `youtu.be/<id>`.
    pub fn video_id_from_link(&self, href: &str) -> Option<String> {
        self.watch_pattern
            .captures(href)
            .or_else(|| self.short_link_pattern.captures(href))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Collapse whitespace runs and trim.
    pub fn normalize(&self, text: Option<&str>) -> String {
        text.map(|t| self.whitespace.replace_all(t, " ").trim().to_string())
            .unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> VideoExtractor {
        VideoExtractor::new().unwrap()
    }

    #[test]
    fn test_video_id_from_link() {
        let ex = extractor();
        assert_eq!(
            ex.video_id_from_link("https://www.youtube.com/watch?v=abc123&t=10"),
            Some("abc123".to_string())
        );
        assert_eq!(
            ex.video_id_from_link("https://youtu.be/xyz_9-Q?si=share"),
            Some("xyz_9-Q".to_string())
        );
        assert_eq!(ex.video_id_from_link("https://example.com/lesson/4"), None);
    }

    #[test]
    fn test_normalize() {
        let ex = extractor();
        assert_eq!(ex.normalize(Some("  ভেক্টর \n  ও   স্কেলার ")), "ভেক্টর ও স্কেলার");
        assert_eq!(ex.normalize(None), "");
    }

    #[test]
    fn test_extract_groups_by_subject_and_topic() {
        let html = r#"
            <div>
              <a data-name="abc123" data-topic_name="ভেক্টর" data-subject_name="Physics">Intro to Vectors</a>
              <a data-name="def456" data-topic_name="গতিবিদ্যা" data-subject_name="Physics"> Motion
                 basics </a>
              <a data-name="ghi789" data-topic_name="ভেক্টর" data-subject_name="Physics">Vector sums</a>
              <a data-name="zzz000" data-topic_name="Organic" data-subject_name="Chemistry"></a>
            </div>"#;

        let bucket = extractor().extract(html);

        assert_eq!(bucket.keys().collect::<Vec<_>>(), vec!["Physics", "Chemistry"]);
        let physics = &bucket["Physics"];
        assert_eq!(physics.keys().collect::<Vec<_>>(), vec!["ভেক্টর", "গতিবিদ্যা"]);
        assert_eq!(
            physics["ভেক্টর"],
            vec![
                VideoEntry { id: "abc123".into(), title: "Intro to Vectors".into() },
                VideoEntry { id: "ghi789".into(), title: "Vector sums".into() },
            ]
        );
        assert_eq!(physics["গতিবিদ্যা"][0].title, "Motion basics");

        // Empty text falls back to the topic.
        assert_eq!(bucket["Chemistry"]["Organic"][0].title, "Organic");
    }

    #[test]
    fn test_extract_fallbacks() {
        let html = r#"
            <a data-name="" data-topic_name="Physics  Vectors" href="https://youtu.be/short1">x</a>
            <a data-name="" data-topic_name="Orphan" href="https://example.com/nothing">y</a>
            <a data-name="" data-topic_name="Orphan">z</a>
            <a data-topic_name="Untagged" data-subject_name="Physics">missing name attribute</a>
        "#;

        let bucket = extractor().extract(html);

        // Subject falls back to the topic attribute; only the resolvable id survives.
        assert_eq!(bucket.len(), 1);
        let entries = &bucket["Physics Vectors"]["Physics Vectors"];
        assert_eq!(entries[0].id, "short1");
        assert_eq!(entries[0].title, "x");
    }
}
