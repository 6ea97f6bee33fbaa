//! Wire types exchanged with the chat host.
//!
//! Field names follow the host's JSON conventions (snake case); empty
//! optional fields are omitted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Who sees a command response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only the user who ran the command.
    Ephemeral,

    /// Everyone in the channel.
    InChannel,
}

/// A command invocation as delivered by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgs {
    /// Full command line, including the trigger.
    pub command: String,

    /// Id of the user who ran the command.
    pub user_id: String,

    /// Id of the channel the command was run in.
    pub channel_id: String,
}

/// Response to a command invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Visibility of the response.
    pub response_type: ResponseType,

    /// Message body.
    pub text: String,

    /// Name to post as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Channel to post in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    /// Rich attachments, carrying interactive controls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl CommandResponse {
    /// A plain response visible only to the caller.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
            username: None,
            channel_id: None,
            attachments: Vec::new(),
        }
    }
}

/// A message attachment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Text shown above the attachment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pretext: String,

    /// Attachment body.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Interactive controls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<PostAction>,
}

/// An interactive control (button) on a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAction {
    /// Button label.
    pub name: String,

    /// What invoking the button calls.
    pub integration: PostActionIntegration,
}

/// Callback bound to a control. The host posts `context` back to `url`
/// unchanged when the control is invoked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostActionIntegration {
    /// Callback URL.
    pub url: String,

    /// Opaque context returned with the callback.
    pub context: BTreeMap<String, String>,
}

/// Callback request sent by the host when a control is invoked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostActionIntegrationRequest {
    /// Id of the user who invoked the control.
    #[serde(default)]
    pub user_id: String,

    /// Id of the channel holding the message.
    #[serde(default)]
    pub channel_id: String,

    /// Id of the message holding the control.
    #[serde(default)]
    pub post_id: String,

    /// Context attached to the control when it was created.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

/// Reply to a callback request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostActionIntegrationResponse {
    /// Replacement for the message holding the control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Post>,

    /// Notice shown only to the invoking user.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ephemeral_text: String,
}

impl PostActionIntegrationResponse {
    /// A reply that leaves the message alone and notifies the invoker.
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            update: None,
            ephemeral_text: text.into(),
        }
    }

    /// A reply that replaces the message.
    #[must_use]
    pub const fn update(post: Post) -> Self {
        Self {
            update: Some(post),
            ephemeral_text: String::new(),
        }
    }
}

/// A full message rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Message body.
    pub message: String,

    /// Message properties.
    #[serde(default)]
    pub props: PostProps,
}

/// Message properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostProps {
    /// Attachments. Always serialized, so an empty list clears existing
    /// controls on update.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
