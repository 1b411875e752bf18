// Plugin entry point: owns the store and the static command and tool tables

use crate::commands::{CheckCommand, CommandRegistry, SetCommand};
use crate::protocol::CallToolResult;
use crate::tools::{ChangeFavorabilityTool, GetFavorabilityTool, ToolRegistry};
use anyhow::{Context, Result};
use favor_core::{directive, FavorConfig, FavorStore, InstructionPayload, JsonFileStore, MessageEvent};
use std::path::Path;
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "favorability";

pub struct FavorPlugin {
    store: Arc<dyn FavorStore>,
    commands: CommandRegistry,
    tools: ToolRegistry,
}

impl FavorPlugin {
    /// Open the data file under the host data directory and register
    /// commands and tools.
    pub async fn initialize(config: FavorConfig, data_dir: &Path) -> Result<Self> {
        let store = JsonFileStore::open(config, data_dir)
            .await
            .context("Failed to open favorability store")?;
        tracing::info!(path = %store.path().display(), "Favorability store ready");
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn FavorStore>) -> Self {
        let mut commands = CommandRegistry::new();
        commands.register(Arc::new(CheckCommand::new(store.clone())));
        commands.register(Arc::new(SetCommand::new(store.clone())));

        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(ChangeFavorabilityTool::new(store.clone())));
        tools.register(Arc::new(GetFavorabilityTool::new(store.clone())));

        tracing::info!(
            commands = commands.names().len(),
            tools = tools.len(),
            "Registered {} plugin handlers",
            PLUGIN_NAME
        );

        Self {
            store,
            commands,
            tools,
        }
    }

    pub fn store(&self) -> &Arc<dyn FavorStore> {
        &self.store
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Reply text for a chat command, or `None` if the command is not ours
    pub async fn handle_command(
        &self,
        event: &dyn MessageEvent,
        name: &str,
        args: &[String],
    ) -> Result<Option<String>> {
        self.commands.dispatch(event, name, args).await
    }

    pub async fn call_tool(
        &self,
        event: &dyn MessageEvent,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult> {
        let tool = self
            .tools
            .get(name)
            .with_context(|| format!("Unknown tool: {}", name))?;
        tool.execute(event, arguments).await
    }

    /// Append the sender's favorability tier to a request before dispatch
    pub async fn on_llm_request(
        &self,
        event: &dyn MessageEvent,
        request: &mut (dyn InstructionPayload + Send),
    ) -> Result<()> {
        let user_id = event.sender_id();
        let score = self
            .store
            .get(user_id)
            .await
            .with_context(|| format!("Failed to read favorability of user {}", user_id))?;

        request.append_instruction(&directive(user_id, score, self.store.config().max_value));
        Ok(())
    }

    pub fn terminate(&self) {
        tracing::info!("{} plugin stopped", PLUGIN_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use favor_core::{ProviderRequest, SimpleEvent};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_initialize_creates_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let plugin = FavorPlugin::initialize(FavorConfig::default(), temp_dir.path())
            .await
            .unwrap();

        assert!(temp_dir.path().join("favorability/data.json").exists());
        assert_eq!(plugin.commands().names().len(), 2);
        assert!(plugin.tools().contains("change_favorability"));
        assert!(plugin.tools().contains("get_favorability"));
    }

    #[tokio::test]
    async fn test_prompt_injection_uses_sender_tier() {
        let temp_dir = TempDir::new().unwrap();
        let plugin = FavorPlugin::initialize(FavorConfig::default(), temp_dir.path())
            .await
            .unwrap();
        plugin.store().set("u1", 80).await.unwrap();

        let mut request = ProviderRequest::new("hello");
        request.system_prompt = "You are a helpful bot.".to_string();
        plugin
            .on_llm_request(&SimpleEvent::member("u1"), &mut request)
            .await
            .unwrap();

        assert!(request.system_prompt.starts_with("You are a helpful bot.\n"));
        assert!(request.system_prompt.contains("80/100"));
        assert!(request.system_prompt.contains("very favorable"));
        assert_eq!(request.prompt, "hello");
    }

    #[tokio::test]
    async fn test_prompt_injection_for_new_user() {
        let temp_dir = TempDir::new().unwrap();
        let plugin = FavorPlugin::initialize(FavorConfig::default(), temp_dir.path())
            .await
            .unwrap();

        let mut request = ProviderRequest::new("hi");
        plugin
            .on_llm_request(&SimpleEvent::member("stranger"), &mut request)
            .await
            .unwrap();

        // init_value 50 of 100
        assert!(request.system_prompt.contains("50/100 (neutral)"));
        assert!(plugin.store().snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let temp_dir = TempDir::new().unwrap();
        let plugin = FavorPlugin::initialize(FavorConfig::default(), temp_dir.path())
            .await
            .unwrap();

        let result = plugin
            .call_tool(&SimpleEvent::member("u1"), "launch_rockets", serde_json::json!({}))
            .await;
        assert!(result.is_err());
    }
}
