//! Form validation for the review and sign-in forms.

use crate::types::{CommentDraft, Credentials, OfferId};
use thiserror::Error;

/// Shortest accepted review text, in characters
pub const MIN_COMMENT_LENGTH: usize = 50;

/// Longest accepted review text, in characters
pub const MAX_COMMENT_LENGTH: usize = 300;

/// Highest star rating
pub const MAX_RATING: u8 = 5;

/// Validation failure of a form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// No star selected, or out of range
    #[error("rating must be between 1 and {}, got {0}", MAX_RATING)]
    Rating(u8),

    /// Review text outside the accepted length
    #[error(
        "review must be between {} and {} characters, got {0}",
        MIN_COMMENT_LENGTH,
        MAX_COMMENT_LENGTH
    )]
    CommentLength(usize),

    /// Another review is being posted
    #[error("a review is already being posted")]
    Busy,

    /// Email left blank
    #[error("email is required")]
    EmptyEmail,

    /// Password blank or missing a letter or a digit
    #[error("password must contain at least one letter and one digit")]
    WeakPassword,
}

/// Validate a review before posting it
///
/// # Errors
///
/// Returns [`FormError`] if a review is already posting, the rating is not
/// 1 to 5, or the text length is outside 50 to 300 characters.
pub fn review_draft(
    offer_id: OfferId,
    rating: u8,
    comment: &str,
    is_review_posting: bool,
) -> Result<CommentDraft, FormError> {
    if is_review_posting {
        return Err(FormError::Busy);
    }
    if !(1..=MAX_RATING).contains(&rating) {
        return Err(FormError::Rating(rating));
    }

    let length = comment.chars().count();
    if !(MIN_COMMENT_LENGTH..=MAX_COMMENT_LENGTH).contains(&length) {
        return Err(FormError::CommentLength(length));
    }

    Ok(CommentDraft {
        offer_id,
        comment: comment.to_string(),
        rating,
    })
}

/// Validate sign-in input
///
/// # Errors
///
/// Returns [`FormError`] if the email is blank or the password is blank or
/// lacks a letter or a digit.
pub fn credentials(email: &str, password: &str) -> Result<Credentials, FormError> {
    if email.trim().is_empty() {
        return Err(FormError::EmptyEmail);
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if password.trim().is_empty() || !has_letter || !has_digit {
        return Err(FormError::WeakPassword);
    }

    Ok(Credentials::new(email.trim(), password))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn review_bounds() {
        let id = || OfferId::new("1");
        assert_eq!(
            review_draft(id(), 0, &comment(60), false),
            Err(FormError::Rating(0))
        );
        assert_eq!(
            review_draft(id(), 6, &comment(60), false),
            Err(FormError::Rating(6))
        );
        assert_eq!(
            review_draft(id(), 3, &comment(49), false),
            Err(FormError::CommentLength(49))
        );
        assert_eq!(
            review_draft(id(), 3, &comment(301), false),
            Err(FormError::CommentLength(301))
        );
        assert!(review_draft(id(), 1, &comment(50), false).is_ok());
        assert!(review_draft(id(), 5, &comment(300), false).is_ok());
    }

    #[test]
    fn review_blocked_while_posting() {
        assert_eq!(
            review_draft(OfferId::new("1"), 5, &comment(60), true),
            Err(FormError::Busy)
        );
    }

    #[test]
    fn comment_length_counts_characters() {
        let text = "é".repeat(50);
        assert!(review_draft(OfferId::new("1"), 4, &text, false).is_ok());
    }

    #[test]
    fn password_rules() {
        assert_eq!(credentials("a@b.c", "   "), Err(FormError::WeakPassword));
        assert_eq!(credentials("a@b.c", "letters"), Err(FormError::WeakPassword));
        assert_eq!(credentials("a@b.c", "123456"), Err(FormError::WeakPassword));
        assert_eq!(credentials("", "abc123"), Err(FormError::EmptyEmail));

        let Ok(ok) = credentials(" a@b.c ", "abc123") else {
            unreachable!("valid input");
        };
        assert_eq!(ok.email, "a@b.c");
        assert_eq!(ok.password, "abc123");
    }
}
