// MCP server: newline-delimited JSON-RPC 2.0 over stdio

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolsCapability, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use crate::codec::{RequestFrame, RequestLineCodec, MAX_LINE_LENGTH};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};

pub const SERVER_NAME: &str = "datetool-mcp";

pub struct McpServer {
    registry: ToolRegistry,
    max_line_length: usize,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            max_line_length: MAX_LINE_LENGTH,
        }
    }

    /// Reject request lines longer than `max_line_length` bytes
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Serve on the process's stdin and stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        tracing::info!("MCP server started on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await?;
        tracing::info!("stdin closed, MCP server exiting");
        Ok(())
    }

    /// Read one request per line from `reader` and write responses to `writer`
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = FramedRead::new(
            reader,
            RequestLineCodec::with_max_length(self.max_line_length),
        );
        let mut sink = FramedWrite::new(writer, LinesCodec::new());

        // Only an I/O failure ends the loop; bad lines get an error response
        while let Some(frame) = lines.next().await {
            let response = match frame.context("Failed to read request line")? {
                RequestFrame::Line(line) if line.trim().is_empty() => continue,
                RequestFrame::Line(line) => self.handle_line(&line).await,
                RequestFrame::Malformed => {
                    tracing::warn!("Request line is not valid UTF-8");
                    Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
                }
                RequestFrame::Oversized => {
                    tracing::warn!("Request line exceeds {} bytes", self.max_line_length);
                    Some(JsonRpcResponse::error(
                        Value::Null,
                        JsonRpcError::request_too_large(self.max_line_length),
                    ))
                }
            };

            if let Some(response) = response {
                let json = serde_json::to_string(&response)
                    .context("Failed to serialize response")?;
                sink.send(json).await.context("Failed to write response")?;
            }
        }

        Ok(())
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(_) => return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request())),
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()));
        }

        let Some(id) = request.id else {
            tracing::debug!("Notification: {}", request.method);
            return None;
        };

        Some(self.handle_request(id, &request.method, request.params).await)
    }

    async fn handle_request(&self, id: Value, method: &str, params: Option<Value>) -> JsonRpcResponse {
        tracing::debug!("Request {}: {}", id, method);

        match method {
            "initialize" => self.initialize(id, params),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::from_serializable(
                id,
                &ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => self.call_tool(id, params).await,
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params = match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params(format!("Invalid params for initialize: {}", e)),
                )
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Missing params for initialize"),
                )
            }
        };

        tracing::info!(
            "Client connected: {} {} (protocol {})",
            params.client_info.name,
            params.client_info.version,
            params.protocol_version
        );

        JsonRpcResponse::from_serializable(
            id,
            &InitializeResult {
                protocol_version: PROTOCOL_VERSION.to_string(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {
                        list_changed: false,
                    }),
                },
                server_info: ServerInfo {
                    name: SERVER_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
        )
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params = match params.map(serde_json::from_value::<CallToolParams>) {
            Some(Ok(params)) => params,
            _ => {
                return JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_params("Invalid params for tools/call"),
                )
            }
        };

        let result = match self.registry.get(&params.name) {
            Some(tool) => match tool.execute(params.arguments).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Tool {} failed: {:#}", params.name, e);
                    CallToolResult::error(format!("{:#}", e))
                }
            },
            None => CallToolResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::from_serializable(id, &result)
    }
}
