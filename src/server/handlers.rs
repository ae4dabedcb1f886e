//! MCP tool handlers for the contact dispatch server.
//!
//! This module exposes the caller-facing dispatch API as MCP tools using the
//! rmcp SDK's tool_router pattern.

use crate::dispatch::ContactDispatcher;
use crate::metrics::Metrics;
use crate::models::{
    ContactRequestOptions, DispatchResult, OpenWhatsAppOptions, SendEmailOptions, SendSmsOptions,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server that exposes contact dispatch tools.
#[derive(Clone)]
pub struct ContactMcpServer {
    dispatcher: Arc<ContactDispatcher>,
    metrics: Metrics,
    whatsapp_use_web: bool,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for ContactMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "housing-contact".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("Contact dispatch for a student-housing marketplace - send email and SMS through the backend, open WhatsApp chats and place calls to landlords and students.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SendEmailToolParams {
    to: String,
    #[serde(default)]
    subject: String,
    message: String,
    #[serde(default)]
    from: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SendSmsToolParams {
    to: String,
    message: String,
    #[serde(default)]
    from: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct OpenWhatsAppToolParams {
    phone_number: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    use_web: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MakePhoneCallToolParams {
    phone_number: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SendContactRequestToolParams {
    recipient_email: String,
    recipient_phone: String,
    sender_name: String,
    sender_email: String,
    #[serde(default)]
    sender_phone: Option<String>,
    listing_title: String,
    message: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

#[tool_router]
impl ContactMcpServer {
    /// Create a new contact MCP server.
    ///
    /// `whatsapp_use_web` is the default for `open_whatsapp` calls that
    /// don't say which link they want.
    pub fn new(
        dispatcher: Arc<ContactDispatcher>,
        metrics: Metrics,
        whatsapp_use_web: bool,
    ) -> Self {
        Self {
            dispatcher,
            metrics,
            whatsapp_use_web,
            tool_router: Self::tool_router(),
        }
    }

    /// Pair a dispatch result with the state it left behind.
    fn respond(&self, result: &DispatchResult) -> Result<CallToolResult, McpError> {
        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "result": result,
            "state": self.dispatcher.state(),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    #[tool(description = "Send an email through the backend. Retries transient failures; the recipient must be non-empty.")]
    async fn send_email(
        &self,
        params: Parameters<SendEmailToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: send_email called");

        let result = self
            .dispatcher
            .send_email(SendEmailOptions {
                to: params.to,
                subject: params.subject,
                message: params.message,
                from: params.from,
            })
            .await;

        self.respond(&result)
    }

    #[tool(description = "Send an SMS through the backend. Retries transient failures; the recipient must be non-empty.")]
    async fn send_sms(
        &self,
        params: Parameters<SendSmsToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: send_sms called");

        let result = self
            .dispatcher
            .send_sms(SendSmsOptions {
                to: params.to,
                message: params.message,
                from: params.from,
            })
            .await;

        self.respond(&result)
    }

    #[tool(description = "Build a WhatsApp click-to-chat link for a phone number with a prefilled message. Returns the link; opening it is not confirmed.")]
    async fn open_whatsapp(
        &self,
        params: Parameters<OpenWhatsAppToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: open_whatsapp called");

        let result = self
            .dispatcher
            .open_whatsapp(OpenWhatsAppOptions {
                phone_number: params.phone_number,
                message: params.message,
                use_web: params.use_web.unwrap_or(self.whatsapp_use_web),
            })
            .await;

        self.respond(&result)
    }

    #[tool(description = "Place a call: returns a tel: link on mobile devices, or the cleaned number for manual dialing elsewhere.")]
    async fn make_phone_call(
        &self,
        params: Parameters<MakePhoneCallToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: make_phone_call called");

        let result = self.dispatcher.make_phone_call(&params.phone_number).await;

        self.respond(&result)
    }

    #[tool(description = "Send a listing inquiry to a landlord: an email with the full message plus an SMS notification. Reports both legs; succeeds only if both were delivered.")]
    async fn send_contact_request(
        &self,
        params: Parameters<SendContactRequestToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: send_contact_request called");

        let outcome = self
            .dispatcher
            .send_contact_request(ContactRequestOptions {
                recipient_email: params.recipient_email,
                recipient_phone: params.recipient_phone,
                sender_name: params.sender_name,
                sender_email: params.sender_email,
                sender_phone: params.sender_phone,
                listing_title: params.listing_title,
                message: params.message,
            })
            .await;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "success": outcome.is_success(),
            "partial": outcome.is_partial(),
            "legs": outcome,
            "state": self.dispatcher.state(),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    #[tool(description = "Get the current dispatch state: loading flag, last error and last success message.")]
    async fn get_dispatch_state(&self) -> Result<CallToolResult, McpError> {
        let json_response =
            serde_json::to_string_pretty(&self.dispatcher.state()).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    #[tool(description = "Clear the last error and success messages.")]
    async fn clear_messages(&self) -> Result<CallToolResult, McpError> {
        self.dispatcher.clear_messages();

        let json_response =
            serde_json::to_string_pretty(&self.dispatcher.state()).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    #[tool(description = "Get backend transport metrics: attempts, failures, retries and durations.")]
    async fn get_transport_metrics(&self) -> Result<CallToolResult, McpError> {
        let json_response =
            serde_json::to_string_pretty(&self.metrics.summary()).map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CallAdapter, DeviceKind, Launcher, TracingLauncher, WhatsAppAdapter};
    use crate::models::ContactRequest;
    use async_trait::async_trait;
    use serde_json::Value;

    struct UnreachableAdapter;

    #[async_trait]
    impl crate::adapters::ChannelAdapter for UnreachableAdapter {
        async fn deliver(&self, _request: &ContactRequest) -> DispatchResult {
            DispatchResult::failure("backend unreachable")
        }

        fn success_message(&self, _data: &Value) -> String {
            String::new()
        }
    }

    fn server(whatsapp_use_web: bool) -> ContactMcpServer {
        let launcher: Arc<dyn Launcher> = Arc::new(TracingLauncher);
        let dispatcher = ContactDispatcher::new(
            Arc::new(UnreachableAdapter),
            Arc::new(UnreachableAdapter),
            Arc::new(WhatsAppAdapter::new(launcher.clone())),
            Arc::new(CallAdapter::new(launcher, DeviceKind::Desktop)),
        );
        ContactMcpServer::new(Arc::new(dispatcher), Metrics::new(), whatsapp_use_web)
    }

    fn body(result: &CallToolResult) -> Value {
        let text = &result.content[0].as_text().unwrap().text;
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_registers_every_tool() {
        let mut names: Vec<String> = ContactMcpServer::tool_router()
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "clear_messages",
                "get_dispatch_state",
                "get_transport_metrics",
                "make_phone_call",
                "open_whatsapp",
                "send_contact_request",
                "send_email",
                "send_sms",
            ]
        );
    }

    #[tokio::test]
    async fn test_open_whatsapp_uses_configured_default() {
        let server = server(true);

        let result = server
            .open_whatsapp(Parameters(OpenWhatsAppToolParams {
                phone_number: "+1 555 123 4567".to_string(),
                message: "Hi".to_string(),
                use_web: None,
            }))
            .await
            .unwrap();

        let json = body(&result);
        assert_eq!(json["result"]["success"], true);
        assert_eq!(
            json["result"]["data"]["url"],
            "https://web.whatsapp.com/send?phone=15551234567&text=Hi"
        );
        assert_eq!(json["state"]["success"], "Opening WhatsApp...");
    }

    #[tokio::test]
    async fn test_failed_email_then_clear() {
        let server = server(false);

        let result = server
            .send_email(Parameters(SendEmailToolParams {
                to: "landlord@example.com".to_string(),
                subject: "Room".to_string(),
                message: "Hello".to_string(),
                from: None,
            }))
            .await
            .unwrap();

        let json = body(&result);
        assert_eq!(json["result"]["success"], false);
        assert_eq!(json["state"]["error"], "backend unreachable");

        let cleared = body(&server.clear_messages().await.unwrap());
        assert_eq!(
            cleared,
            serde_json::json!({"loading": false, "error": null, "success": null})
        );
    }
}
