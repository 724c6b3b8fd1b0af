//! # Guide Errors
//!
//! Error taxonomy shared by every loader of the user guide. All failures are
//! returned to the caller (the GUI host decides how to present them); nothing
//! here is logged-and-swallowed.
//!
//! | Variant | Meaning | Recoverable |
//! |---------|---------|-------------|
//! | `Schema` | malformed document or missing required field | no |
//! | `LanguageNotFound` | neither requested nor default language present | via default language |
//! | `UnknownRole` | theme lacks a colour/font/note role | via default theme |
//! | `SectionNotFound` | no TOC node carries the requested id | no |
//! | `Io` | the document could not be read | no |

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which kind of theme role failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Color,
    Font,
    Note,
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoleKind::Color => "color",
            RoleKind::Font => "font",
            RoleKind::Note => "note",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("Schema error in '{path}': {message}")]
    Schema { path: String, message: String },
    #[error(
        "Language '{requested}' not found in section '{section_id}' (default language '{default}' is absent too)"
    )]
    LanguageNotFound {
        section_id: String,
        requested: String,
        default: String,
    },
    #[error("Unknown {kind} role '{role}' in theme '{theme}'")]
    UnknownRole {
        kind: RoleKind,
        role: String,
        theme: String,
    },
    #[error("Section '{0}' not found in the table of contents")]
    SectionNotFound(String),
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GuideError {
    /// Shortcut for building a schema error from anything printable.
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        GuideError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// `true` when the caller has a fallback (default language or default theme).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GuideError::LanguageNotFound { .. } | GuideError::UnknownRole { .. }
        )
    }
}

pub type GuideResult<T> = Result<T, GuideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_variants() {
        let lang = GuideError::LanguageNotFound {
            section_id: "installation".to_string(),
            requested: "fr".to_string(),
            default: "ru".to_string(),
        };
        let role = GuideError::UnknownRole {
            kind: RoleKind::Color,
            role: "accent".to_string(),
            theme: "dark".to_string(),
        };
        assert!(lang.is_recoverable());
        assert!(role.is_recoverable());
        assert!(!GuideError::SectionNotFound("x".to_string()).is_recoverable());
        assert!(!GuideError::schema("toc.json", "bad").is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = GuideError::UnknownRole {
            kind: RoleKind::Font,
            role: "caption".to_string(),
            theme: "default".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown font role 'caption' in theme 'default'"
        );
        let err = GuideError::SectionNotFound("nonexistent_section".to_string());
        assert!(err.to_string().contains("nonexistent_section"));
    }
}
