// MCP server: JSON-RPC 2.0, one message per line

use crate::plugin::FavorPlugin;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolsCapability, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use anyhow::{Context, Result};
use favor_core::SimpleEvent;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

pub struct McpServer {
    plugin: Arc<FavorPlugin>,
    /// Caller identity when a tool call carries no `_meta.sender_id`
    default_sender: String,
}

impl McpServer {
    pub fn new(plugin: Arc<FavorPlugin>, default_sender: impl Into<String>) -> Self {
        Self {
            plugin,
            default_sender: default_sender.into(),
        }
    }

    /// Serve on stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        tracing::info!("MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new());
        let mut out = FramedWrite::new(writer, LinesCodec::new());

        while let Some(line) = lines.next().await {
            let line = line.context("Failed to read request line")?;
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_line(&line).await {
                let json =
                    serde_json::to_string(&response).context("Failed to serialize response")?;
                out.send(json).await.context("Failed to write response")?;
            }
        }

        tracing::info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw message; `None` for notifications
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message");
                return Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(
                request.id.unwrap_or(serde_json::Value::Null),
                JsonRpcError::invalid_request(),
            ));
        }

        if request.is_notification() {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone().unwrap_or(serde_json::Value::Null);
        Some(self.handle_request(id, request).await)
    }

    async fn handle_request(&self, id: serde_json::Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => {
                if let Some(params) = request
                    .params
                    .and_then(|p| serde_json::from_value::<InitializeParams>(p).ok())
                {
                    tracing::info!(
                        client = %params.client_info.name,
                        version = %params.client_info.version,
                        protocol = %params.protocol_version,
                        "Client connected"
                    );
                }
                JsonRpcResponse::success(
                    id,
                    InitializeResult {
                        protocol_version: PROTOCOL_VERSION.to_string(),
                        capabilities: ServerCapabilities {
                            tools: Some(ToolsCapability {
                                list_changed: false,
                            }),
                        },
                        server_info: ServerInfo {
                            name: "favor-mcp".to_string(),
                            version: env!("CARGO_PKG_VERSION").to_string(),
                        },
                    },
                )
            }
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.plugin.tools().list_schemas(),
                },
            ),
            "tools/call" => {
                let params: CallToolParams = match request
                    .params
                    .map(serde_json::from_value::<CallToolParams>)
                    .transpose()
                {
                    Ok(Some(params)) => params,
                    Ok(None) => {
                        return JsonRpcResponse::error(
                            id,
                            JsonRpcError::invalid_params("Missing params for tools/call"),
                        )
                    }
                    Err(e) => {
                        return JsonRpcResponse::error(
                            id,
                            JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                        )
                    }
                };
                self.call_tool(id, params).await
            }
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, id: serde_json::Value, params: CallToolParams) -> JsonRpcResponse {
        if !self.plugin.tools().contains(&params.name) {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)),
            );
        }

        let sender = params
            .meta
            .and_then(|m| m.sender_id)
            .unwrap_or_else(|| self.default_sender.clone());
        let event = SimpleEvent::member(sender);

        let result = match self
            .plugin
            .call_tool(&event, &params.name, params.arguments)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(tool = %params.name, error = %message, "Tool call failed");
                CallToolResult::error(message)
            }
        };

        JsonRpcResponse::success(id, result)
    }
}
