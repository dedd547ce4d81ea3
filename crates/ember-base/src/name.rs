use std::fmt;

use serde::{Deserialize, Serialize};

/// A (possibly module-qualified) identifier such as `std/core/int-add` or `x`.
///
/// Names freshened by a pass carry a `.<unique>` suffix on their local part,
/// e.g. `x.17`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Module part of a qualified name (`std/core` for `std/core/int-add`).
    pub fn qualifier(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(module, _)| module)
    }

    /// Unqualified part of the name.
    pub fn local(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, local)) => local,
            None => &self.0,
        }
    }

    /// The name without a previously attached `.<unique>` suffix.
    pub fn base(&self) -> &str {
        match self.0.rsplit_once('.') {
            Some((base, suffix))
                if !base.is_empty()
                    && !base.ends_with('/')
                    && !suffix.is_empty()
                    && suffix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                base
            }
            _ => &self.0,
        }
    }

    /// A new name derived from this one, tagged with `unique`.
    pub fn with_unique(&self, unique: u64) -> Self {
        Self(format!("{}.{unique}", self.base()))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
