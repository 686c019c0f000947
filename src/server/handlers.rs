//! MCP tool handlers for the agenda server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router
//! pattern. The handlers are thin: they hop onto a blocking thread, run the
//! synchronous service operation, and collapse the typed outcome into the
//! single string the wire contract promises. That collapse happens nowhere
//! else.

use crate::db::Database;
use crate::services::{
    ContactService, CreateOutcome, DeleteOutcome, EventCreateOutcome, EventDeleteOutcome,
    EventService, SearchOutcome, UpdateOutcome,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tokio::task;
use tracing::debug;

/// The agenda MCP server, exposing contact and event tools over stdio.
#[derive(Clone)]
pub struct AgendaMcpServer {
    contacts: ContactService,
    events: EventService,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for AgendaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "agenda-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "MCP server for a personal contacts-and-calendar store - create, list, \
                 find, update, and delete contacts and events, and link contacts to events."
                    .into(),
            ),
        }
    }
}

// Tool parameter structs. Wire argument names keep their camelCase
// spellings through serde renames.

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactCreateParams {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactListParams {
    #[serde(default, rename = "orderBy")]
    pub order_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactFindParams {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ContactUpdateParams {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EventCreateParams {
    pub heading: String,
    #[serde(rename = "startTime")]
    pub start_time: i64,
    #[serde(rename = "endTime")]
    pub end_time: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "contactIds")]
    pub contact_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EventFindParams {
    #[serde(rename = "startTime")]
    pub start_time: i64,
    #[serde(rename = "endTime")]
    pub end_time: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EventUpdateParams {
    pub id: i64,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default, rename = "startTime")]
    pub start_time: Option<i64>,
    #[serde(default, rename = "endTime")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

/// JSON-encode a result set, or the fixed empty sentence when there are no
/// rows.
fn render_records<T: Serialize>(rows: &[T], empty_sentence: &str) -> Result<String, McpError> {
    if rows.is_empty() {
        Ok(empty_sentence.to_string())
    } else {
        serde_json::to_string(rows).map_err(to_mcp_error)
    }
}

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

// Tool router implementation
#[tool_router]
impl AgendaMcpServer {
    /// Create a new agenda MCP server on the shared database handle.
    pub fn new(db: Database) -> Self {
        Self {
            contacts: ContactService::new(db.clone()),
            events: EventService::new(db),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(name = "contacts-create", description = "Creates a new contact.")]
    async fn contacts_create(
        &self,
        params: Parameters<ContactCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.create_contact(params.0).await?))
    }

    #[tool(
        name = "contacts-list",
        description = "Lists all contacts, with optional sorting."
    )]
    async fn contacts_list(
        &self,
        params: Parameters<ContactListParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.list_contacts(params.0).await?))
    }

    #[tool(
        name = "contacts-find",
        description = "Finds contacts by a specific field (id, name, email, or phone)."
    )]
    async fn contacts_find(
        &self,
        params: Parameters<ContactFindParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.find_contacts(params.0).await?))
    }

    #[tool(
        name = "contacts-update",
        description = "Updates an existing contact's details."
    )]
    async fn contacts_update(
        &self,
        params: Parameters<ContactUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.update_contact(params.0).await?))
    }

    #[tool(name = "contacts-delete", description = "Deletes a contact.")]
    async fn contacts_delete(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.delete_contact(params.0).await?))
    }

    #[tool(
        name = "events-create",
        description = "Creates a new event and optionally links it to a list of contact IDs."
    )]
    async fn events_create(
        &self,
        params: Parameters<EventCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.create_event(params.0).await?))
    }

    #[tool(
        name = "events-list",
        description = "Lists all events, ordered by start time. It is recommended to use the \
                       events-find tool instead as you can limit the number of results."
    )]
    async fn events_list(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.list_events().await?))
    }

    #[tool(
        name = "events-find",
        description = "Finds events that overlap with a given time range."
    )]
    async fn events_find(
        &self,
        params: Parameters<EventFindParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.find_events(params.0).await?))
    }

    #[tool(
        name = "events-update",
        description = "Updates an existing event's details."
    )]
    async fn events_update(
        &self,
        params: Parameters<EventUpdateParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.update_event(params.0).await?))
    }

    #[tool(
        name = "events-delete",
        description = "Deletes an event and its associations."
    )]
    async fn events_delete(
        &self,
        params: Parameters<IdParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.delete_event(params.0).await?))
    }
}

// String-level handlers. These produce the exact contract text; the tool
// methods above only wrap it in a content block. Public so tests can drive
// the full collapse without a transport.
impl AgendaMcpServer {
    /// Handle `contacts-create`.
    pub async fn create_contact(&self, p: ContactCreateParams) -> Result<String, McpError> {
        debug!(name = %p.name, "contacts-create called");

        // The confirmation echoes the stored (trimmed) name.
        let display_name = p.name.trim().to_string();
        let service = self.contacts.clone();
        let outcome = task::spawn_blocking(move || {
            service.create(&p.name, p.email, p.phone, p.notes)
        })
        .await
        .map_err(to_mcp_error)?
        .map_err(to_mcp_error)?;

        Ok(match outcome {
            CreateOutcome::Created(id) => {
                format!("Successfully created contact '{display_name}' with ID {id}.")
            }
            CreateOutcome::Invalid(e) => format!("Error: {e}"),
        })
    }

    /// Handle `contacts-list`.
    pub async fn list_contacts(&self, p: ContactListParams) -> Result<String, McpError> {
        let service = self.contacts.clone();
        let rows = task::spawn_blocking(move || {
            service.list(
                p.order_by.as_deref().unwrap_or("name"),
                p.order.as_deref().unwrap_or("ASC"),
            )
        })
        .await
        .map_err(to_mcp_error)?
        .map_err(to_mcp_error)?;

        render_records(&rows, "No contacts found.")
    }

    /// Handle `contacts-find`.
    pub async fn find_contacts(&self, p: ContactFindParams) -> Result<String, McpError> {
        let service = self.contacts.clone();
        let outcome = task::spawn_blocking(move || service.find(&p.field, &p.value))
            .await
            .map_err(to_mcp_error)?
            .map_err(to_mcp_error)?;

        match outcome {
            SearchOutcome::Rows(rows) => {
                render_records(&rows, "No contacts found matching that term.")
            }
            SearchOutcome::Invalid(e) => Ok(format!("Error: {e}")),
        }
    }

    /// Handle `contacts-update`.
    pub async fn update_contact(&self, p: ContactUpdateParams) -> Result<String, McpError> {
        debug!(id = p.id, "contacts-update called");

        let id = p.id;
        let service = self.contacts.clone();
        let outcome = task::spawn_blocking(move || {
            service.update(p.id, p.name, p.email, p.phone, p.notes)
        })
        .await
        .map_err(to_mcp_error)?
        .map_err(to_mcp_error)?;

        Ok(match outcome {
            UpdateOutcome::Updated => format!("Successfully updated contact ID {id}."),
            UpdateOutcome::NotFound => {
                format!("Error: Contact with ID {id} not found or no changes made.")
            }
            UpdateOutcome::Invalid(e) => format!("Error: {e}"),
        })
    }

    /// Handle `contacts-delete`.
    pub async fn delete_contact(&self, p: IdParams) -> Result<String, McpError> {
        debug!(id = p.id, "contacts-delete called");

        let id = p.id;
        let service = self.contacts.clone();
        let outcome = task::spawn_blocking(move || service.delete(p.id))
            .await
            .map_err(to_mcp_error)?
            .map_err(to_mcp_error)?;

        Ok(match outcome {
            DeleteOutcome::Deleted => format!("Successfully deleted contact ID {id}."),
            DeleteOutcome::NotFound => format!("Error: Contact with ID {id} not found."),
        })
    }

    /// Handle `events-create`.
    pub async fn create_event(&self, p: EventCreateParams) -> Result<String, McpError> {
        debug!(heading = %p.heading, "events-create called");

        let service = self.events.clone();
        let outcome = task::spawn_blocking(move || {
            service.create(
                &p.heading,
                p.start_time,
                p.end_time,
                p.description,
                &p.contact_ids.unwrap_or_default(),
            )
        })
        .await
        .map_err(to_mcp_error)?;

        Ok(match outcome {
            EventCreateOutcome::Created(id) => {
                format!("Successfully created event with ID {id}.")
            }
            EventCreateOutcome::Invalid(e) => format!("Error: {e}"),
            EventCreateOutcome::DatabaseFailed => {
                "Error: Could not create event due to a database error.".to_string()
            }
        })
    }

    /// Handle `events-list`.
    pub async fn list_events(&self) -> Result<String, McpError> {
        let service = self.events.clone();
        let rows = task::spawn_blocking(move || service.list())
            .await
            .map_err(to_mcp_error)?
            .map_err(to_mcp_error)?;

        render_records(&rows, "No events found.")
    }

    /// Handle `events-find`.
    pub async fn find_events(&self, p: EventFindParams) -> Result<String, McpError> {
        let service = self.events.clone();
        let rows = task::spawn_blocking(move || service.find(p.start_time, p.end_time))
            .await
            .map_err(to_mcp_error)?
            .map_err(to_mcp_error)?;

        render_records(&rows, "No events found in that time range.")
    }

    /// Handle `events-update`.
    pub async fn update_event(&self, p: EventUpdateParams) -> Result<String, McpError> {
        debug!(id = p.id, "events-update called");

        let id = p.id;
        let service = self.events.clone();
        let outcome = task::spawn_blocking(move || {
            service.update(p.id, p.heading, p.start_time, p.end_time, p.description)
        })
        .await
        .map_err(to_mcp_error)?
        .map_err(to_mcp_error)?;

        Ok(match outcome {
            UpdateOutcome::Updated => format!("Successfully updated event ID {id}."),
            UpdateOutcome::NotFound => {
                format!("Error: Event with ID {id} not found or no changes made.")
            }
            UpdateOutcome::Invalid(e) => format!("Error: {e}"),
        })
    }

    /// Handle `events-delete`.
    pub async fn delete_event(&self, p: IdParams) -> Result<String, McpError> {
        debug!(id = p.id, "events-delete called");

        let id = p.id;
        let service = self.events.clone();
        let outcome = task::spawn_blocking(move || service.delete(p.id))
            .await
            .map_err(to_mcp_error)?;

        Ok(match outcome {
            EventDeleteOutcome::Deleted => format!("Successfully deleted event ID {id}."),
            EventDeleteOutcome::NotFound => format!("Error: Event with ID {id} not found."),
            EventDeleteOutcome::DatabaseFailed => {
                "Error: Could not delete event due to a database error.".to_string()
            }
        })
    }
}
