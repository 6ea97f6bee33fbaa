use std::fmt;

use thiserror::Error;

/// Longest accepted resource name, in bytes.
pub const MAX_RESOURCE_LEN: usize = 128;

const RESERVED_CHARS: [char; 3] = ['/', '\\', ':'];

/// Reasons a resource name is rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidResource {
    /// The name is empty.
    #[error("resource name is empty")]
    Empty,

    /// The name is longer than `MAX_RESOURCE_LEN` bytes.
    #[error("resource name is {0} bytes long, the limit is {MAX_RESOURCE_LEN}")]
    TooLong(usize),

    /// The name contains whitespace, a control character or a reserved
    /// separator.
    #[error("resource name contains reserved character {0:?}")]
    ReservedCharacter(char),

    /// The name is a relative path component.
    #[error("resource name {0:?} is reserved")]
    Reserved(String),
}

/// The validated name of a lockable resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resource(String);

impl Resource {
    /// Validates a resource name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, `.` or `..`, or
    /// contains whitespace, control characters, `/`, `\` or `:`.
    pub fn parse(name: impl Into<String>) -> Result<Self, InvalidResource> {
        let name = name.into();

        if name.is_empty() {
            return Err(InvalidResource::Empty);
        }

        if name.len() > MAX_RESOURCE_LEN {
            return Err(InvalidResource::TooLong(name.len()));
        }

        if let Some(c) = name
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || RESERVED_CHARS.contains(c))
        {
            return Err(InvalidResource::ReservedCharacter(c));
        }

        if name == "." || name == ".." {
            return Err(InvalidResource::Reserved(name));
        }

        Ok(Self(name))
    }

    /// The resource name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Resource {
    type Error = InvalidResource;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::parse(name)
    }
}
