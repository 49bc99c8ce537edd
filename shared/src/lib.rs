//! Fit AI Shared Library
//!
//! Domain types, profile validation, progress analytics and narration text
//! handling shared by the backend and its tests. Nothing here performs I/O.

pub mod analytics;
pub mod countries;
pub mod errors;
pub mod models;
pub mod narration;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use analytics::{summarize_progress, ProgressAnalytics};
pub use errors::*;
pub use models::*;
pub use validation::{
    validate_profile, validate_profile_input, FieldError, ProfileValidationError, RawProfile,
};
