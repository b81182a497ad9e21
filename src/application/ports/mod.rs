pub mod document_extractor;
pub mod language_model;
pub mod object_storage;
pub mod source_fetcher;

pub use document_extractor::DocumentExtractor;
pub use language_model::LanguageModel;
pub use object_storage::ObjectStorage;
pub use source_fetcher::SourceFetcher;
