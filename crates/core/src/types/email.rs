//! Email address type used by the checkout form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a checkout email was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming.
    #[error("email cannot be empty")]
    Empty,
    /// Longer than [`Email::MAX_LENGTH`].
    #[error("email must be at most {max} characters")]
    TooLong {
        max: usize,
    },
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// Zero or several `@`.
    #[error("email must contain exactly one @ symbol")]
    AtSymbol,
    /// Nothing before the `@`.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain has no dot, or a dot at either end.
    #[error("email domain must look like name.tld")]
    InvalidDomain,
}

/// An email address.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - No whitespace anywhere
/// - Exactly one @ symbol with a non-empty local part
/// - Domain contains a dot with text on both sides
///
/// ## Examples
///
/// ```
/// use styleshop_core::Email;
///
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("user@localhost").is_err());
/// assert!(Email::parse("two@@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first constraint violated.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::AtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::AtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }

        match domain.rsplit_once('.') {
            Some((name, tld)) if !name.is_empty() && !tld.is_empty() => {}
            _ => return Err(EmailError::InvalidDomain),
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
