use std::borrow::Cow;
use std::fmt;

use crate::InvariantError;

/// Programmer-chosen identifier for a tracked type.
///
/// Keys order lexicographically, which is the order reports are emitted in.
/// Two distinct tracked types must never share a key; the registry has no way
/// to notice if they do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
    pub fn new(value: impl Into<Cow<'static, str>>) -> Result<Self, InvariantError> {
        let value = value.into();
        if value.is_empty() {
            return Err(InvariantError::EmptyField("type_key"));
        }
        Ok(Self(value))
    }

    /// Unchecked constructor usable in `const` position.
    ///
    /// The registry debug-asserts non-emptiness on first use instead.
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of a single lifecycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delta {
    Created,
    Destroyed,
}

impl Delta {
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Created => 1,
            Self::Destroyed => -1,
        }
    }
}

impl TryFrom<i64> for Delta {
    type Error = InvariantError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Created),
            -1 => Ok(Self::Destroyed),
            other => Err(InvariantError::InvalidDelta(other)),
        }
    }
}
