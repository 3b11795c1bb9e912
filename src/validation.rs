pub const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    Empty,
    #[error("Title is too long")]
    TooLong { max: usize, actual: usize },
}

/// Submission rule for task titles: non-empty and at most [`MAX_TITLE_CHARS`] characters.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::Empty);
    }
    let actual = title.chars().count();
    if actual > MAX_TITLE_CHARS {
        return Err(ValidationError::TooLong {
            max: MAX_TITLE_CHARS,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_titles_up_to_the_limit() {
        assert_eq!(validate_title("a"), Ok(()));
        assert_eq!(validate_title(&"x".repeat(MAX_TITLE_CHARS)), Ok(()));
    }

    #[test]
    fn rejects_empty_title() {
        assert_eq!(validate_title(""), Err(ValidationError::Empty));
        assert_eq!(ValidationError::Empty.to_string(), "Title is required");
    }

    #[test]
    fn rejects_long_title_counting_characters() {
        let err = validate_title(&"x".repeat(MAX_TITLE_CHARS + 1)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                max: 100,
                actual: 101
            }
        );
        assert_eq!(err.to_string(), "Title is too long");

        // Multi-byte characters count once each.
        assert_eq!(validate_title(&"é".repeat(MAX_TITLE_CHARS)), Ok(()));
    }
}
