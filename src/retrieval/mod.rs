//! Schema-relevance retrieval.
//!
//! Narrows a large schema down to the handful of tables, columns and
//! foreign keys a question is plausibly about, then renders them as the
//! text block embedded in the language-model prompt.

pub mod format;
mod keywords;
mod selector;

pub use format::render;
pub use keywords::{like_matches, Keywords, LikePattern};
pub use selector::{RelevanceSelector, RetrievalLimits};
