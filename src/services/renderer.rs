use crate::profile::ChapterTaxonomy;
use crate::types::{RenderedFragment, SubjectClassification, VideoEntry, MISC_INDEX};
use indexmap::IndexMap;

pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

pub struct FragmentRenderer<'a> {
    taxonomy: &'a ChapterTaxonomy,
}

impl<'a> FragmentRenderer<'a> {
    pub fn new(taxonomy: &'a ChapterTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// One fragment per target file. Subjects sharing a file are appended in
    /// classification order.
    pub fn render_files(&self, classifications: &[SubjectClassification]) -> Vec<RenderedFragment> {
        let mut files: IndexMap<&str, Vec<String>> = IndexMap::new();

        for classification in classifications {
            files
                .entry(classification.filename.as_str())
                .or_default()
                .extend(self.render_subject(classification));
        }

        files
            .into_iter()
            .map(|(filename, lines)| RenderedFragment {
                filename: filename.to_string(),
                lines,
            })
            .collect()
    }

    /// Papers in lexical order, chapters in taxonomy order, misc last.
    pub fn render_subject(&self, classification: &SubjectClassification) -> Vec<String> {
        let mut lines = Vec::new();

        for (paper, buckets) in &classification.papers {
            lines.push(format!("<h2>{}</h2>", escape_html(paper)));

            let chapters = self.taxonomy.chapters(&classification.subject_key, paper);
            for (pos, chapter) in chapters.iter().enumerate() {
                let index = pos + 1;
                lines.push(format!(
                    "<h3>Chapter {}: {}</h3>",
                    index,
                    escape_html(chapter)
                ));
                push_list(&mut lines, buckets.get(&index).map(Vec::as_slice).unwrap_or(&[]));
            }

            if let Some(misc) = buckets.get(&MISC_INDEX).filter(|videos| !videos.is_empty()) {
                lines.push("<h3>Misc</h3>".to_string());
                push_list(&mut lines, misc);
            }
        }

        lines
    }
}

fn push_list(lines: &mut Vec<String>, videos: &[VideoEntry]) {
    lines.push("<ul>".to_string());
    lines.extend(videos.iter().map(render_item));
    lines.push("</ul>".to_string());
}

pub fn render_item(video: &VideoEntry) -> String {
    format!(
        r#"<li><a href="{}{}" target="_blank">{}</a></li>"#,
        WATCH_URL,
        escape_html(&video.id),
        escape_html(&video.title)
    )
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
