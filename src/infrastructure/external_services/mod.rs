pub mod gemini_client;
pub mod http_source_fetcher;
pub mod marker_client;
pub mod supabase_storage;

pub use gemini_client::{GeminiClient, GeminiConfig};
pub use http_source_fetcher::HttpSourceFetcher;
pub use marker_client::{MarkerClient, MarkerConfig};
pub use supabase_storage::{SupabaseStorage, SupabaseStorageConfig};
