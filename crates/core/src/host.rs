//! Capabilities the plugin consumes from the chat-bot host.

use serde::{Deserialize, Serialize};

/// Sender role as decided by the host's permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    /// Whether a sender with this role may run something requiring `required`
    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }
}

/// An incoming chat event, as seen by command and tool handlers.
pub trait MessageEvent: Send + Sync {
    /// Identifier of the user who sent the message
    fn sender_id(&self) -> &str;

    fn role(&self) -> Role {
        Role::Member
    }
}

/// Outbound request whose instruction text can be extended before dispatch.
pub trait InstructionPayload {
    fn append_instruction(&mut self, text: &str);
}

/// Minimal event carrying just the sender and their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleEvent {
    pub sender_id: String,
    pub role: Role,
}

impl SimpleEvent {
    pub fn member(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            role: Role::Member,
        }
    }

    pub fn admin(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            role: Role::Admin,
        }
    }
}

impl MessageEvent for SimpleEvent {
    fn sender_id(&self) -> &str {
        &self.sender_id
    }

    fn role(&self) -> Role {
        self.role
    }
}

/// A model request before it is sent to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub prompt: String,
    #[serde(default)]
    pub system_prompt: String,
}

impl ProviderRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: String::new(),
        }
    }
}

impl InstructionPayload for ProviderRequest {
    fn append_instruction(&mut self, text: &str) {
        if !self.system_prompt.is_empty() && !self.system_prompt.ends_with('\n') {
            self.system_prompt.push('\n');
        }
        self.system_prompt.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin.satisfies(Role::Member));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Member.satisfies(Role::Member));
        assert!(!Role::Member.satisfies(Role::Admin));
    }

    #[test]
    fn test_append_instruction_separates_lines() {
        let mut request = ProviderRequest::new("hi");
        request.append_instruction("first");
        assert_eq!(request.system_prompt, "first");

        request.append_instruction("second");
        assert_eq!(request.system_prompt, "first\nsecond");
        assert_eq!(request.prompt, "hi");
    }
}
