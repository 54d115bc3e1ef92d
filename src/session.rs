//! Per-login session state.
//!
//! The original UI kept the current user, the conversation transcript, and
//! the displayed property set in page-level globals. Here they live in one
//! explicitly owned object: created at login, conversation re-seeded whenever
//! the copilot overlay opens, dropped at logout.

use crate::models::{ConversationTurn, DisplayedProperty, UserAccount};

/// System prompt seeded into every fresh copilot conversation.
pub const SYSTEM_PROMPT: &str = "You are PropBot, a helpful Boston real estate assistant.";

/// How many trailing transcript turns are replayed to the answer service.
pub const CONTEXT_WINDOW: usize = 5;

/// All state carried for one logged-in user.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: UserAccount,
    transcript: Vec<ConversationTurn>,
    /// Current listing/map contents, replaced wholesale on refresh.
    pub properties: Vec<DisplayedProperty>,
}

impl SessionState {
    /// Session for a freshly authenticated user.
    pub fn new(user: UserAccount) -> Self {
        Self {
            user,
            transcript: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Start a fresh copilot conversation: the transcript is cleared and
    /// seeded with the system turn. Displayed properties survive.
    pub fn open_copilot(&mut self) {
        self.transcript.clear();
        self.transcript.push(ConversationTurn::system(SYSTEM_PROMPT));
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(ConversationTurn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(ConversationTurn::assistant(content));
    }

    /// Read-only view of the transcript. Turns are append-only; nothing
    /// rewrites history.
    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    /// The last `n` turns serialized as `role: content` lines, oldest first.
    pub fn recent_context(&self, n: usize) -> String {
        let start = self.transcript.len().saturating_sub(n);
        self.transcript[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn session() -> SessionState {
        SessionState::new(UserAccount::guest(1, None, "tok".to_string()))
    }

    #[test]
    fn new_session_starts_empty() {
        let session = session();
        assert!(session.transcript().is_empty());
        assert!(session.properties.is_empty());
    }

    #[test]
    fn open_copilot_seeds_exactly_the_system_turn() {
        let mut session = session();
        session.push_user("left over from somewhere");
        session.open_copilot();

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, Role::System);
        assert_eq!(transcript[0].content, SYSTEM_PROMPT);
    }

    #[test]
    fn turns_append_in_order() {
        let mut session = session();
        session.open_copilot();
        session.push_user("hi");
        session.push_assistant("hello");

        let roles: Vec<Role> = session.transcript().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn recent_context_formats_role_prefixed_lines() {
        let mut session = session();
        session.open_copilot();
        session.push_user("any condos in Fenway?");

        let context = session.recent_context(CONTEXT_WINDOW);
        assert_eq!(
            context,
            format!("system: {SYSTEM_PROMPT}\nuser: any condos in Fenway?")
        );
    }

    #[test]
    fn recent_context_keeps_only_the_last_n_turns() {
        let mut session = session();
        session.open_copilot();
        for i in 0..4 {
            session.push_user(format!("question {i}"));
            session.push_assistant(format!("answer {i}"));
        }

        let context = session.recent_context(CONTEXT_WINDOW);
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines.len(), CONTEXT_WINDOW);
        assert_eq!(lines[0], "assistant: answer 1");
        assert_eq!(lines[4], "assistant: answer 3");
        assert!(!context.contains("system:"));
    }
}
