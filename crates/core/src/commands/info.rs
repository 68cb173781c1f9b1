//! Parsed chat command invocations

use cs2prac_sdk::SteamId;

/// How a chat command was typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandContext {
    /// `!cmd`, the message stays visible
    ChatPublic,
    /// `/cmd` or `.cmd`, the message is swallowed
    ChatSilent,
}

impl CommandContext {
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::ChatSilent)
    }
}

/// Whether the host should keep processing a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CommandResult {
    /// Not ours, let the message through
    #[default]
    Continue = 0,
    /// Consumed by the plugin
    Handled = 1,
}

/// One command typed by a player
///
/// Index 0 of the argument list is the command name as typed.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    args: Vec<String>,
    caller: SteamId,
    context: CommandContext,
}

impl CommandInfo {
    pub fn new(args: Vec<String>, caller: SteamId, context: CommandContext) -> Self {
        Self {
            args,
            caller,
            context,
        }
    }

    /// Argument at `index`, empty when missing
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map(String::as_str).unwrap_or("")
    }

    /// Arguments after the command name
    pub fn rest(&self) -> &[String] {
        self.args_from(1)
    }

    /// Arguments starting at `index`
    pub fn args_from(&self, index: usize) -> &[String] {
        self.args.get(index..).unwrap_or(&[])
    }

    pub fn caller(&self) -> SteamId {
        self.caller
    }

    pub fn context(&self) -> CommandContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_access() {
        let caller = SteamId::new(76561198000000001);
        let info = CommandInfo::new(
            vec!["bot".to_string(), "kick".to_string(), "Alpha".to_string()],
            caller,
            CommandContext::ChatSilent,
        );

        assert_eq!(info.arg(0), "bot");
        assert_eq!(info.arg(2), "Alpha");
        assert_eq!(info.arg(9), "");
        assert_eq!(info.rest().len(), 2);
        assert_eq!(info.args_from(2), &["Alpha".to_string()]);
        assert!(info.args_from(5).is_empty());
        assert_eq!(info.caller(), caller);
        assert!(info.context().is_silent());
    }

    #[test]
    fn test_empty_invocation() {
        let info = CommandInfo::new(Vec::new(), SteamId::new(1), CommandContext::ChatPublic);
        assert_eq!(info.arg(0), "");
        assert!(info.rest().is_empty());
        assert!(!info.context().is_silent());
    }
}
