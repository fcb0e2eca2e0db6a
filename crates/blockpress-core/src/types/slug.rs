use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// SlugError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SlugError {
    #[error("slug is empty after normalization")]
    Empty,

    #[error("invalid slug character: '{ch}'")]
    InvalidCharacter { ch: char },
}

///
/// Slug
///
/// URL-safe article identifier. Lowercase `[a-z0-9_-]` only. Derivation
/// from a title lowercases, collapses whitespace runs to a single hyphen,
/// and strips everything outside the slug alphabet.
///

#[derive(
    Clone, Debug, Deref, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a free-form title.
    pub fn derive(title: &str) -> Result<Self, SlugError> {
        let lowered = title.to_lowercase();
        let mut out = String::with_capacity(lowered.len());
        let mut in_whitespace = false;

        for ch in lowered.chars() {
            if ch.is_whitespace() {
                // Whitespace runs collapse to one hyphen, even mid-word
                // punctuation gaps ("a & b" becomes "a--b").
                if !out.is_empty() {
                    in_whitespace = true;
                }
                continue;
            }

            if in_whitespace {
                out.push('-');
                in_whitespace = false;
            }
            if Self::is_slug_char(ch) {
                out.push(ch);
            }
        }

        let out = out.trim_matches('-').to_string();

        if out.is_empty() {
            return Err(SlugError::Empty);
        }

        Ok(Self(out))
    }

    /// Validate a caller-supplied slug.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(ch) = s.chars().find(|ch| !Self::is_slug_char(*ch)) {
            return Err(SlugError::InvalidCharacter { ch });
        }

        Ok(Self(s.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    const fn is_slug_char(ch: char) -> bool {
        ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-'
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_from_simple_title() {
        let slug = Slug::derive("Test Review").expect("derive");
        assert_eq!(slug.as_str(), "test-review");
    }

    #[test]
    fn strips_punctuation_and_keeps_hyphen_runs() {
        let slug = Slug::derive("Alpha & Beta!").expect("derive");
        assert_eq!(slug.as_str(), "alpha--beta");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let slug = Slug::derive("  One   Two  ").expect("derive");
        assert_eq!(slug.as_str(), "one-two");
    }

    #[test]
    fn keeps_digits_and_underscores() {
        let slug = Slug::derive("Omega_3 2024").expect("derive");
        assert_eq!(slug.as_str(), "omega_3-2024");
    }

    #[test]
    fn empty_after_normalization_is_an_error() {
        assert_eq!(Slug::derive("!!!"), Err(SlugError::Empty));
        assert_eq!(Slug::derive("   "), Err(SlugError::Empty));
    }

    #[test]
    fn parse_rejects_uppercase() {
        let err = Slug::parse("Not-Valid").unwrap_err();
        assert!(matches!(err, SlugError::InvalidCharacter { ch: 'N' }));
    }

    #[test]
    fn parse_accepts_valid_slug() {
        assert!(Slug::parse("omega-3_review").is_ok());
    }
}
