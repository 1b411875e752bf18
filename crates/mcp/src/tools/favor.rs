// Favorability tools the model can call about the user it is talking to

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_number, json_schema_object, Tool};
use anyhow::{Context, Result};
use favor_core::{format_fraction, FavorStore, MessageEvent};
use serde::Deserialize;
use std::sync::Arc;

/// Tool to change the model's favorability toward the sender
pub struct ChangeFavorabilityTool {
    store: Arc<dyn FavorStore>,
}

impl ChangeFavorabilityTool {
    pub fn new(store: Arc<dyn FavorStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
struct ChangeFavorabilityArgs {
    value: f64,
}

#[async_trait::async_trait]
impl Tool for ChangeFavorabilityTool {
    fn schema(&self) -> ToolSchema {
        let max_change = self.store.config().max_change;
        ToolSchema {
            name: "change_favorability".to_string(),
            description: format!(
                "Change your favorability toward the user you are talking to. \
                 A single change is limited to {} in either direction.",
                max_change
            ),
            input_schema: json_schema_object(
                serde_json::json!({
                    "value": json_schema_number(
                        "Amount to change by: positive raises favorability, negative lowers it"
                    )
                }),
                vec!["value"],
            ),
        }
    }

    async fn execute(
        &self,
        event: &dyn MessageEvent,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult> {
        let args: ChangeFavorabilityArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for change_favorability")?;

        // `as` saturates at the i64 range
        let delta = args.value.round() as i64;
        let user_id = event.sender_id();
        let adjustment = self
            .store
            .adjust_detailed(user_id, delta)
            .await
            .with_context(|| format!("Failed to change favorability of user {}", user_id))?;

        let max_value = self.store.config().max_value;
        let mut text = format!(
            "Your favorability toward user {} changed by {:+} (from {} to {}), now {}.",
            user_id,
            adjustment.change(),
            adjustment.previous,
            adjustment.current,
            format_fraction(adjustment.current, max_value)
        );
        if adjustment.step != adjustment.requested {
            text.push_str(&format!(
                " The requested change of {} was limited to {}.",
                adjustment.requested, adjustment.step
            ));
        }

        Ok(CallToolResult::text(text))
    }
}

/// Tool to read the model's favorability toward the sender
pub struct GetFavorabilityTool {
    store: Arc<dyn FavorStore>,
}

impl GetFavorabilityTool {
    pub fn new(store: Arc<dyn FavorStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for GetFavorabilityTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_favorability".to_string(),
            description: "Get your favorability toward the user you are talking to".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(
        &self,
        event: &dyn MessageEvent,
        _arguments: serde_json::Value,
    ) -> Result<CallToolResult> {
        let user_id = event.sender_id();
        let score = self
            .store
            .get(user_id)
            .await
            .with_context(|| format!("Failed to read favorability of user {}", user_id))?;

        Ok(CallToolResult::text(format!(
            "Your favorability toward user {} is {}.",
            user_id,
            format_fraction(score, self.store.config().max_value)
        )))
    }
}
