pub mod classifier;
pub mod extractor;
pub mod fetcher;
pub mod merger;
pub mod renderer;

pub use classifier::{SubstringMatcher, TopicClassifier, TopicMatcher};
pub use extractor::VideoExtractor;
pub use fetcher::CatalogFetcher;
pub use merger::BlockMerger;
pub use renderer::FragmentRenderer;
