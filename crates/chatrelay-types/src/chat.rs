//! Conversation types: participants, roles, turns, and request payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a conversation participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-side address that replies are sent to.
///
/// Distinct from [`UserId`]: one user may talk to the relay from several
/// chats, and history is keyed by user, not by chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a turn in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged message.
///
/// Fields are private so a turn cannot change after it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered turns sent to the completion service for one request:
/// the system turn, the retained history, then the new user turn.
///
/// Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPayload {
    turns: Vec<Turn>,
}

impl RequestPayload {
    /// Assemble a payload in the fixed `[system, ..history, user]` order.
    pub fn new(system: Turn, history: Vec<Turn>, user: Turn) -> Self {
        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(system);
        turns.extend(history);
        turns.push(user);
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The trailing user turn this payload was built for.
    pub fn user_turn(&self) -> &Turn {
        // `new` always pushes the user turn last.
        &self.turns[self.turns.len() - 1]
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serializes_with_lowercase_role() {
        let json = serde_json::to_string(&Turn::assistant("Hi there")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Hi there"}"#);
    }

    #[test]
    fn payload_keeps_fixed_order() {
        let payload = RequestPayload::new(
            Turn::system("be brief"),
            vec![Turn::user("Hello"), Turn::assistant("Hi there")],
            Turn::user("How are you?"),
        );

        let roles: Vec<Role> = payload.turns().iter().map(Turn::role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(payload.user_turn().content(), "How are you?");
    }

    #[test]
    fn user_id_displays_raw_value() {
        assert_eq!(UserId(42).to_string(), "42");
        assert_eq!(ChatId(-100).to_string(), "-100");
    }
}
