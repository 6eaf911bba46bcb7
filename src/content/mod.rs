mod errors;
pub mod fallback;
pub mod provider;
pub mod source;

pub use errors::ProviderError;
pub use fallback::{FallbackBank, QuestionHistory};
pub use provider::{ContentProvider, HttpContentProvider};
pub use source::PromptSource;
