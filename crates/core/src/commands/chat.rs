//! Chat command recognition
//!
//! Players type commands in chat with a leading trigger character:
//! `!cmd` (public, message stays visible), `/cmd` (silent) or `.cmd`
//! (the practice-server shorthand, also silent).

/// Default public chat trigger
pub const DEFAULT_PUBLIC_TRIGGER: char = '!';

/// Default silent chat trigger
pub const DEFAULT_SILENT_TRIGGER: char = '/';

/// Dot trigger used by the short practice commands (`.bot`, `.rt`, `.a`)
pub const DOT_TRIGGER: char = '.';

/// Chat trigger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTriggers {
    /// Public trigger character (message shown in chat)
    pub public: char,
    /// Silent trigger characters (message hidden from chat)
    pub silent: Vec<char>,
}

impl Default for ChatTriggers {
    fn default() -> Self {
        Self {
            public: DEFAULT_PUBLIC_TRIGGER,
            silent: vec![DEFAULT_SILENT_TRIGGER, DOT_TRIGGER],
        }
    }
}

impl ChatTriggers {
    /// Check if a message starts with a chat trigger
    ///
    /// Returns (is_silent, command_text) if a trigger is found
    pub fn check<'a>(&self, message: &'a str) -> Option<(bool, &'a str)> {
        let message = message.trim_start();
        let first_char = message.chars().next()?;
        let rest = &message[first_char.len_utf8()..];

        if first_char == self.public {
            Some((false, rest))
        } else if self.silent.contains(&first_char) {
            Some((true, rest))
        } else {
            None
        }
    }
}

/// Check a message against the default triggers
pub fn check_chat_trigger(message: &str) -> Option<(bool, &str)> {
    ChatTriggers::default().check(message)
}

/// Parse a chat command into name and arguments
///
/// The name is lower-cased; the returned arguments include it at index 0
/// in its original case.
pub fn parse_chat_command(text: &str) -> (String, Vec<String>) {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let command_name = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();
    let args: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
    (command_name, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_chat_trigger() {
        assert_eq!(check_chat_trigger("!ping"), Some((false, "ping")));
        assert_eq!(check_chat_trigger("/ping"), Some((true, "ping")));
        assert_eq!(check_chat_trigger(".rt index=2"), Some((true, "rt index=2")));
        assert_eq!(check_chat_trigger("hello"), None);
        assert_eq!(check_chat_trigger(""), None);
    }

    #[test]
    fn test_parse_chat_command() {
        let (name, args) = parse_chat_command("Bot spawn TestBot");
        assert_eq!(name, "bot");
        assert_eq!(args, vec!["Bot", "spawn", "TestBot"]);

        let (name, args) = parse_chat_command("   ");
        assert!(name.is_empty());
        assert!(args.is_empty());
    }
}
