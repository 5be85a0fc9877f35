//! Static sync profile: catalog source, subject/file table, chapter taxonomy
//! and the sentinel markers owned by the tool.

use indexmap::IndexMap;

pub const DEFAULT_SOURCE_URL: &str =
    "https://www.bondipathshala.education/bn/course/hsc-powerplay-2026/Course1758213800537";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const AUTO_START: &str = "<!-- AUTO GENERATED START -->";
pub const AUTO_END: &str = "<!-- AUTO GENERATED END -->";
pub const BATCH_COMMENT: &str = "<!-- added by auto-updater -->";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFile {
    pub key: String,
    pub filename: String,
}

/// subject key -> paper -> chapters. Paper and chapter order are as declared.
#[derive(Debug, Clone, Default)]
pub struct ChapterTaxonomy {
    subjects: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl ChapterTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paper(mut self, subject: &str, paper: &str, chapters: &[&str]) -> Self {
        self.subjects
            .entry(subject.to_string())
            .or_default()
            .insert(
                paper.to_string(),
                chapters.iter().map(|c| c.to_string()).collect(),
            );
        self
    }

    pub fn papers(&self, subject: &str) -> Option<&IndexMap<String, Vec<String>>> {
        self.subjects.get(subject)
    }

    /// Chapters of one paper; empty when the subject or paper is unknown.
    pub fn chapters(&self, subject: &str, paper: &str) -> &[String] {
        self.subjects
            .get(subject)
            .and_then(|papers| papers.get(paper))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
    pub batch_comment: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: AUTO_START.to_string(),
            end: AUTO_END.to_string(),
            batch_comment: BATCH_COMMENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncProfile {
    pub subject_files: Vec<SubjectFile>,
    pub taxonomy: ChapterTaxonomy,
    pub markers: Markers,
}

impl SyncProfile {
    pub fn new(subject_files: &[(&str, &str)], taxonomy: ChapterTaxonomy) -> Self {
        Self {
            subject_files: subject_files
                .iter()
                .map(|(key, filename)| SubjectFile {
                    key: key.to_string(),
                    filename: filename.to_string(),
                })
                .collect(),
            taxonomy,
            markers: Markers::default(),
        }
    }

    /// First table entry whose key is a case-insensitive substring of `subject`.
    /// Table order decides ties ("Higher Math" must come before "Math").
    pub fn resolve_subject(&self, subject: &str) -> Option<&SubjectFile> {
        let subject = subject.to_lowercase();
        self.subject_files
            .iter()
            .find(|entry| subject.contains(&entry.key.to_lowercase()))
    }

    /// Distinct target filenames in table order.
    pub fn target_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for entry in &self.subject_files {
            if !files.contains(&entry.filename.as_str()) {
                files.push(&entry.filename);
            }
        }
        files
    }

    pub fn builtin() -> Self {
        let subject_files = [
            ("Bangla", "bangla.html"),
            ("Biology", "biology.html"),
            ("Chemistry", "chemistry.html"),
            ("English", "english.html"),
            ("ICT", "ict.html"),
            ("Higher Math", "math.html"),
            ("Math", "math.html"),
            ("Physics", "physics.html"),
        ];

        let taxonomy = ChapterTaxonomy::new()
            .with_paper(
                "Physics",
                "Paper 1",
                &[
                    "ভৌতজগত ও পরিমাপ",
                    "ভেক্টর",
                    "গতিবিদ্যা",
                    "নিউটনীয় বলবিদ্যা",
                    "কাজ, ক্ষমতা ও শক্তি",
                    "মহাকর্ষ ও অভিকর্ষ",
                    "পদার্থের গাঠনিক ধর্ম",
                    "পর্যাবৃত্ত গতি",
                    "তরঙ্গ",
                    "আদর্শ গ্যাস ও গ্যাসের গতিতত্ত্ব",
                ],
            )
            .with_paper(
                "Physics",
                "Paper 2",
                &[
                    "তাপগতিবিদ্যা",
                    "স্থির তড়িৎ",
                    "চলতড়িৎ",
                    "তড়িৎ প্রবাহের চৌম্বক ক্রিয়া ও চুম্বকত্ব",
                    "তাড়িত-চৌম্বক আবেশ",
                    "জ্যামিতিক আলোকবিজ্ঞান",
                    "ভৌত আলোকবিজ্ঞান",
                    "আধুনিক পদার্থবিজ্ঞান",
                    "পরমাণুর মডেল ও নিউক্লিয়ার পদার্থবিজ্ঞান",
                    "সেমিকন্ডাক্টর ও ইলেকট্রনিক্স",
                    "জ্যোতির্বিজ্ঞান",
                ],
            )
            .with_paper(
                "Chemistry",
                "Paper 1",
                &[
                    "ল্যাবরেটরির নিরাপদ ব্যবহার",
                    "গুণগত রসায়ন",
                    "মৌলের পর্যাবৃত্তিক ধর্ম ও রাসায়নিক বন্ধন",
                    "রাসায়নিক পরিবর্তন",
                    "কর্মমুখী রসায়ন",
                ],
            )
            .with_paper(
                "Chemistry",
                "Paper 2",
                &[
                    "পরিবেশ রসায়ন",
                    "জৈব রসায়ন",
                    "পরিমাণগত রসায়ন",
                    "তড়িৎ রসায়ন",
                    "অর্থনৈতিক রসায়ন",
                ],
            )
            .with_paper(
                "Higher Math",
                "Paper 1",
                &[
                    "ম্যাট্রিক্স ও নির্ণায়ক",
                    "ভেক্টর",
                    "সরলরেখা",
                    "বৃত্ত",
                    "বিন্যাস ও সমাবেশ",
                    "ত্রিকোণমিতিক অনুপাত",
                    "সংযুক্ত কোনের ত্রিকোনমিতিক অনুপাত",
                    "ফাংশন ও ফাংশনের লেখচিত্র",
                    "অন্তরীকরণ",
                    "যোগজীকরণ",
                ],
            )
            .with_paper(
                "Higher Math",
                "Paper 2",
                &[
                    "বাস্তব সংখ্যা ও অসমতা",
                    "যোগাশ্রয়ী প্রোগ্রাম",
                    "জটিল সংখ্যা",
                    "বহুপদী ও বহুপদী সমীকরণ",
                    "দ্বিপদী বিস্তৃতি",
                    "কনিক",
                    "বিপরীত ত্রিকোনমিতিক ফাংশন ও ত্রিকোণমিতিক সমীকরণ",
                    "স্থিতিবিদ্যা",
                    "সমতলে বস্তুকনার গতি",
                    "বিস্তার পরিমাপ ও সম্ভাবনা",
                ],
            )
            .with_paper(
                "Biology",
                "Paper 1",
                &[
                    "কোষ ও এর গঠন",
                    "কোষ বিভাজন",
                    "কোষ রসায়ন",
                    "অণুজীব",
                    "শৈবাল ও ছত্রাক",
                    "ব্রায়োফাইটা ও টেরিডোফাইটা",
                    "নগ্নবীজী ও আবৃতবীজী উদ্ভিদ",
                    "টিস্যু ও টিস্যুতন্ত্র",
                    "উদ্ভিদ শারীরতত্ত্ব",
                    "উদ্ভিদ প্রজনন",
                    "জীবপ্রযুক্তি",
                    "জীবের পরিবেশ বিস্তার ও সংরক্ষন",
                ],
            )
            .with_paper(
                "Biology",
                "Paper 2",
                &[
                    "প্রাণীর বিভিন্নতা ও শ্রেণিবিন্যাস",
                    "প্রাণীর পরিচিতি",
                    "পরিপাক ও শোষণ",
                    "রক্ত ও সংবহন",
                    "শ্বসন ও শ্বাসক্রিয়া",
                    "বর্জ্য ও নিষ্কাশন",
                    "চলন ও অঙগচালনা",
                    "সমন্বয় ও নিয়ন্ত্রণ",
                    "মানব জীবনের ধারাবাহিকতা",
                    "মানবদেহের প্রতিরক্ষা",
                    "জিনতত্ত্ব ও বিবর্তন",
                    "প্রাণীর আচরণ",
                ],
            );

        Self::new(&subject_files, taxonomy)
    }
}

impl Default for SyncProfile {
    fn default() -> Self {
        Self::builtin()
    }
}
