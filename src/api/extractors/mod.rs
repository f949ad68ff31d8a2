//! Request extractors that reject malformed input with 422.

mod validated_json;
mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::{Filter, IdPath, ValidatedQuery};

pub(crate) use validated_json::format_validation_errors;
