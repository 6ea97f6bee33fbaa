use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

const RESOURCE_KEY: &str = "resource";
const MESSAGE_KEY: &str = "message";
const USERNAME_KEY: &str = "username";

/// Who locked what, and why.
///
/// The lock store keeps no metadata, so this travels with the release
/// control and comes back unchanged when the control is invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockContext {
    /// Locked resource name.
    pub resource: String,

    /// Free-form message given with the command; may be empty.
    pub message: String,

    /// Display name of the user who took the lock.
    pub username: String,
}

impl LockContext {
    /// The text announcing the lock.
    #[must_use]
    pub fn notice(&self) -> String {
        if self.message.is_empty() {
            format!("{} by {}", self.resource, self.username)
        } else {
            format!("{} {} by {}", self.resource, self.message, self.username)
        }
    }

    /// The lock announcement followed by a release line.
    #[must_use]
    pub fn released_notice(&self, released_at: DateTime<Utc>) -> String {
        format!(
            "{}\nLock released at: {}",
            self.notice(),
            released_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )
    }

    /// Encodes the context for a release control.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (RESOURCE_KEY.to_string(), self.resource.clone()),
            (MESSAGE_KEY.to_string(), self.message.clone()),
            (USERNAME_KEY.to_string(), self.username.clone()),
        ])
    }

    /// Decodes the context returned by a release control.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `resource` is missing or empty.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self> {
        let resource = map
            .get(RESOURCE_KEY)
            .filter(|resource| !resource.is_empty())
            .ok_or_else(|| Error::InvalidArgument("context has no resource".to_string()))?;

        Ok(Self {
            resource: resource.clone(),
            message: map.get(MESSAGE_KEY).cloned().unwrap_or_default(),
            username: map.get(USERNAME_KEY).cloned().unwrap_or_default(),
        })
    }
}
