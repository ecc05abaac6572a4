//! Session keys
//!
//! Every record set belongs to exactly one [`SessionKey`]. The file backend
//! names its documents after the key, so the accepted alphabet is kept to
//! characters that are safe in a file name on every platform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted key, in bytes
pub const MAX_KEY_LEN: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionKeyError {
    #[error("session key is empty")]
    Empty,

    #[error("session key is {0} bytes long, limit is {MAX_KEY_LEN}")]
    TooLong(usize),

    #[error("session key contains {0:?}; only ASCII letters, digits, '_' and '-' are accepted")]
    ForbiddenChar(char),
}

/// Identifier of one conversation's record set, validated on construction
/// and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionKey(String);

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

fn check(raw: &str) -> Result<(), SessionKeyError> {
    match raw.len() {
        0 => Err(SessionKeyError::Empty),
        len if len > MAX_KEY_LEN => Err(SessionKeyError::TooLong(len)),
        _ => match raw.chars().find(|c| !is_key_char(*c)) {
            Some(c) => Err(SessionKeyError::ForbiddenChar(c)),
            None => Ok(()),
        },
    }
}

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionKey {
    type Error = SessionKeyError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        check(&raw).map(|()| Self(raw))
    }
}

impl TryFrom<&str> for SessionKey {
    type Error = SessionKeyError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::try_from(raw.to_owned())
    }
}

impl std::str::FromStr for SessionKey {
    type Err = SessionKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::try_from(raw)
    }
}

impl From<SessionKey> for String {
    fn from(key: SessionKey) -> Self {
        key.0
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
