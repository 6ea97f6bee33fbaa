use simplelock_locks::Resource;

use crate::{Error, Result};

/// Trigger word of the lock command.
pub const TRIGGER: &str = "lock";

/// Registration descriptor for the lock command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    /// Word after the slash that invokes the command.
    pub trigger: &'static str,

    /// Name shown in command listings.
    pub display_name: &'static str,

    /// What the command does.
    pub description: &'static str,

    /// Whether the host should offer autocompletion.
    pub auto_complete: bool,

    /// Description shown in autocompletion.
    pub auto_complete_desc: &'static str,

    /// Argument hint shown in autocompletion.
    pub auto_complete_hint: &'static str,
}

/// The command registered on activation.
#[must_use]
pub const fn command() -> Command {
    Command {
        trigger: TRIGGER,
        display_name: "Lock",
        description: "Lock shared resource.",
        auto_complete: true,
        auto_complete_desc: "Lock shared resource.",
        auto_complete_hint: "resource [message]",
    }
}

/// A parsed `lock` command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Resource to lock.
    pub resource: Resource,

    /// Remaining words joined by single spaces; empty if none.
    pub message: String,
}

/// Parses `[/]lock resource [message...]`.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` if the trigger is not `lock`, or the
/// resource name is missing or invalid.
pub fn parse_command(text: &str) -> Result<ParsedCommand> {
    let mut parts = text.split_whitespace();

    let trigger = parts
        .next()
        .map(|trigger| trigger.strip_prefix('/').unwrap_or(trigger));
    if trigger != Some(TRIGGER) {
        return Err(Error::InvalidArgument(format!(
            "expected a /{TRIGGER} command"
        )));
    }

    let resource = parts
        .next()
        .ok_or_else(|| Error::InvalidArgument("resource is required".to_string()))?;
    let resource = Resource::parse(resource)?;

    let message = parts.collect::<Vec<_>>().join(" ");

    Ok(ParsedCommand { resource, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    #[test]
    fn test_resource_and_message() {
        let parsed = parse_command("/lock widgetA doing   maintenance").unwrap();

        assert_eq!(parsed.resource.as_str(), "widgetA");
        assert_eq!(parsed.message, "doing maintenance");
    }

    #[test]
    fn test_slash_is_optional() {
        let parsed = parse_command("lock widgetA").unwrap();

        assert_eq!(parsed.resource.as_str(), "widgetA");
        assert_eq!(parsed.message, "");
    }

    #[test]
    fn test_missing_resource() {
        assert_matches!(parse_command("/lock"), Err(Error::InvalidArgument(_)));
        assert_matches!(parse_command("lock   "), Err(Error::InvalidArgument(_)));
    }

    #[test]
    fn test_wrong_or_missing_trigger() {
        assert_matches!(parse_command("/unlock widgetA"), Err(Error::InvalidArgument(_)));
        assert_matches!(parse_command(""), Err(Error::InvalidArgument(_)));
    }

    #[test]
    fn test_invalid_resource_name() {
        assert_matches!(
            parse_command("/lock ../etc doing things"),
            Err(Error::InvalidArgument(_))
        );
    }

    #[test]
    fn test_descriptor_uses_trigger() {
        assert_eq!(command().trigger, "lock");
        assert_eq!(command().auto_complete_hint, "resource [message]");
    }
}
