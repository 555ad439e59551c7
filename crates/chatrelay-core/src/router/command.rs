//! Classification of inbound text into commands and freeform messages.

/// What an inbound message asks the relay to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the greeting.
    Start,
    /// Show usage help.
    Help,
    /// Forget this user's conversation history.
    Reset,
    /// Anything else: forward to the completion service. Holds trimmed text.
    Freeform(String),
}

impl Command {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Reset => "reset",
            Command::Freeform(_) => "freeform",
        }
    }
}

/// Classify inbound text.
///
/// Command tokens match exactly (case-sensitive, no arguments) after
/// trimming; anything else is freeform. Returns `None` for blank text,
/// which gets no reply at all.
pub fn classify(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let command = match trimmed {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/reset" => Command::Reset,
        other => Command::Freeform(other.to_string()),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_commands() {
        assert_eq!(classify("/start"), Some(Command::Start));
        assert_eq!(classify("/help"), Some(Command::Help));
        assert_eq!(classify(" /reset\n"), Some(Command::Reset));
    }

    #[test]
    fn classify_blank_is_ignored() {
        assert_eq!(classify(""), None);
        assert_eq!(classify(" \n\t"), None);
    }

    #[test]
    fn classify_freeform_is_trimmed() {
        assert_eq!(
            classify("  Hello  "),
            Some(Command::Freeform("Hello".to_string()))
        );
    }

    #[test]
    fn commands_are_case_sensitive_and_take_no_arguments() {
        assert_eq!(
            classify("/Start"),
            Some(Command::Freeform("/Start".to_string()))
        );
        assert_eq!(
            classify("/reset now"),
            Some(Command::Freeform("/reset now".to_string()))
        );
        assert_eq!(
            classify("/unknown"),
            Some(Command::Freeform("/unknown".to_string()))
        );
    }
}
