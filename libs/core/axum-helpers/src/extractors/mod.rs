//! Extractors that reject with [`AppError`](crate::AppError) so every
//! malformed request is a JSON 400.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
