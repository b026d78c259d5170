//! REPL line parsing.

/// Slash commands offered for completion, in display order.
pub const COMMANDS: &[&str] = &["/more", "/copy", "/songs", "/reset", "/help", "/quit"];

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Free text describing the user's mood.
    Send(String),
    /// Recommend another song for the last mood.
    More,
    /// Print the recommended list in copyable form.
    Copy,
    /// Show the songs recommended so far.
    Songs,
    /// Clear the conversation.
    Reset,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }

        if !trimmed.starts_with('/') {
            return Self::Send(trimmed.to_string());
        }

        match trimmed.to_lowercase().as_str() {
            "/more" => Self::More,
            "/copy" => Self::Copy,
            "/songs" => Self::Songs,
            "/reset" => Self::Reset,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_is_send() {
        assert_eq!(
            ReplCommand::parse("  오늘 너무 행복해 "),
            ReplCommand::Send("오늘 너무 행복해".to_string())
        );
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(ReplCommand::parse("/more"), ReplCommand::More);
        assert_eq!(ReplCommand::parse("/COPY"), ReplCommand::Copy);
        assert_eq!(ReplCommand::parse("/songs"), ReplCommand::Songs);
        assert_eq!(ReplCommand::parse("/reset"), ReplCommand::Reset);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("quit"), ReplCommand::Quit);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(
            ReplCommand::parse("/dance"),
            ReplCommand::Unknown("/dance".to_string())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
    }

    #[test]
    fn test_every_completion_parses() {
        for command in COMMANDS {
            assert!(!matches!(
                ReplCommand::parse(command),
                ReplCommand::Unknown(_) | ReplCommand::Send(_)
            ));
        }
    }
}
