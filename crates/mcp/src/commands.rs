// Chat commands for viewing and setting favorability

use anyhow::{Context, Result};
use favor_core::{format_fraction, FavorStore, MessageEvent, Role};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A chat command the host routes to this plugin.
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;

    fn usage(&self) -> &'static str;

    /// Role the host must have granted the sender
    fn required_role(&self) -> Role {
        Role::Member
    }

    /// Run with already tokenised arguments and return the reply text
    async fn run(&self, event: &dyn MessageEvent, args: &[String]) -> Result<String>;
}

/// `favorability [user_id]`
pub struct CheckCommand {
    store: Arc<dyn FavorStore>,
}

impl CheckCommand {
    pub fn new(store: Arc<dyn FavorStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Command for CheckCommand {
    fn name(&self) -> &'static str {
        "favorability"
    }

    fn usage(&self) -> &'static str {
        "favorability [user_id]"
    }

    async fn run(&self, event: &dyn MessageEvent, args: &[String]) -> Result<String> {
        let user_id = args
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| event.sender_id());

        let score = self
            .store
            .get(user_id)
            .await
            .with_context(|| format!("Failed to read favorability of user {}", user_id))?;

        Ok(format!(
            "User {} favorability: {}",
            user_id,
            format_fraction(score, self.store.config().max_value)
        ))
    }
}

/// `set_favorability <user_id> <value>`, stores the value without clamping
pub struct SetCommand {
    store: Arc<dyn FavorStore>,
}

impl SetCommand {
    pub fn new(store: Arc<dyn FavorStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Command for SetCommand {
    fn name(&self) -> &'static str {
        "set_favorability"
    }

    fn usage(&self) -> &'static str {
        "set_favorability <user_id> <value>"
    }

    fn required_role(&self) -> Role {
        Role::Admin
    }

    async fn run(&self, _event: &dyn MessageEvent, args: &[String]) -> Result<String> {
        let (user_id, raw_value) = match args {
            [user_id, value] => (user_id, value),
            _ => return Ok(format!("Usage: {}", self.usage())),
        };

        let value: i64 = match raw_value.parse() {
            Ok(value) => value,
            Err(_) => return Ok(format!("Invalid favorability value: {}", raw_value)),
        };

        self.store
            .set(user_id, value)
            .await
            .with_context(|| format!("Failed to set favorability of user {}", user_id))?;

        tracing::info!(user_id = %user_id, value, "Favorability set by admin");

        Ok(format!(
            "User {} favorability set to: {}",
            user_id,
            format_fraction(value, self.store.config().max_value)
        ))
    }
}

/// Command table, filled once at startup
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, command: Arc<dyn Command>) {
        tracing::debug!(command = command.name(), "Registered command");
        self.commands.insert(command.name(), command);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    /// Run a command if it is registered.
    ///
    /// Returns `Ok(None)` for names this registry does not own. A sender
    /// whose role falls short gets a refusal reply instead of running it.
    pub async fn dispatch(
        &self,
        event: &dyn MessageEvent,
        name: &str,
        args: &[String],
    ) -> Result<Option<String>> {
        let Some(command) = self.get(name) else {
            return Ok(None);
        };

        if !event.role().satisfies(command.required_role()) {
            tracing::warn!(
                command = name,
                sender = event.sender_id(),
                "Rejected command from sender without permission"
            );
            return Ok(Some(format!(
                "Permission denied: {} requires admin",
                command.name()
            )));
        }

        command.run(event, args).await.map(Some)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
