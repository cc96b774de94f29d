//! Shaping of the note posted back to the merge request.

/// Heading prefixed to every review note.
pub const REVIEW_BANNER: &str = "### 🤖 AI Code Review";

/// Note body: banner, blank line, trimmed review text.
///
/// An empty review still produces a note carrying the banner.
pub fn format_note_body(review: &str) -> String {
    format!("{REVIEW_BANNER}\n\n{}", review.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_comes_first_and_review_is_trimmed() {
        let body = format_note_body("\n\n  Looks good.  \n");
        assert_eq!(body, format!("{REVIEW_BANNER}\n\nLooks good."));
    }

    #[test]
    fn empty_review_keeps_banner() {
        let body = format_note_body("   ");
        assert!(body.starts_with(REVIEW_BANNER));
        assert_eq!(body.trim_end(), REVIEW_BANNER);
    }
}
