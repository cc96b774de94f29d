//! Prompt construction for the review step.

pub mod prompt;

pub use prompt::{LINE_ADVISORY_LIMIT, REVIEWER_ROLE, build_review_prompt};
