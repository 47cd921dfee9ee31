//! crates/neurone_profile_core/src/ids.rs
//!
//! The user identifier every record is keyed to.
//!
//! User ids are issued by the external authority as 12-byte object ids and
//! travel as 24 hexadecimal characters. They are validated at the edge so a
//! malformed id never reaches the document store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The number of hexadecimal characters in a well-formed user id.
pub const USER_ID_LEN: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("user id must be {USER_ID_LEN} characters long, got {0}")]
    Length(usize),
    #[error("user id must only contain hexadecimal characters")]
    NotHex,
}

/// A validated, lowercase 24-character hexadecimal user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validates `raw` and normalises it to lowercase.
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let len = raw.chars().count();
        if len != USER_ID_LEN {
            return Err(IdError::Length(len));
        }
        if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdError::NotHex);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
