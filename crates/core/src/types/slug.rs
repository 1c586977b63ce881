//! URL slugs for categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a name has no characters usable in a slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("name must contain at least one letter or digit")]
pub struct SlugError;

/// A lowercase, dash-separated identifier derived from a display name.
///
/// ```
/// use silk_saree_core::Slug;
///
/// let slug = Slug::from_name("Kanchipuram  Silk & Zari").unwrap();
/// assert_eq!(slug.as_str(), "kanchipuram-silk-zari");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a display name.
    ///
    /// ASCII letters and digits are kept (lowercased); every other run of
    /// characters becomes a single dash. Leading and trailing dashes are
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError`] if nothing remains after normalisation.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(name.len());
        let mut pending_dash = false;

        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        if slug.is_empty() {
            return Err(SlugError);
        }
        Ok(Self(slug))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a slug read back from storage.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_collapses_separators() {
        assert_eq!(Slug::from_name("Banarasi").unwrap().as_str(), "banarasi");
        assert_eq!(
            Slug::from_name("  Soft Silk -- Wedding ").unwrap().as_str(),
            "soft-silk-wedding"
        );
        assert_eq!(Slug::from_name("Paithani 2024").unwrap().as_str(), "paithani-2024");
    }

    #[test]
    fn test_from_name_drops_non_ascii() {
        assert_eq!(Slug::from_name("Tussar ✨ Silk").unwrap().as_str(), "tussar-silk");
    }

    #[test]
    fn test_from_name_rejects_empty() {
        assert_eq!(Slug::from_name(""), Err(SlugError));
        assert_eq!(Slug::from_name(" -- "), Err(SlugError));
    }
}
