//! MCP server for CSV cleaning using the rmcp SDK
//!
//! Tools are registered through the `#[tool_router]` macro; resources and
//! prompts are served by the `ServerHandler` methods below.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::prompts;
use crate::resources::{self, GUIDE_URI};
use crate::tools::{
    self, CsvToolkit, FillMissingParams, FilterParams, GreetParams, InspectParams,
    NumberPairParams, RemoveDuplicatesParams, RemoveNullRowsParams, StandardizeParams,
};

const INSTRUCTIONS: &str = "CSV cleaning server. Start with inspect_csv to understand a file, \
then use remove_null_rows, fill_missing_values, remove_duplicates, standardize_columns and \
filter_rows. Pass output_path to write results; without it tools return a preview. \
csv_path accepts a file path or raw CSV text.";

/// Turn a tool body's outcome into an MCP tool result
fn tool_result(action: &str, outcome: crate::error::Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            warn!("Tool failed while {}: {}", action, e);
            CallToolResult::error(vec![Content::text(format!("Error {action}: {e}"))])
        }
    }
}

#[derive(Clone)]
pub struct CsvCleaningServer {
    toolkit: Arc<CsvToolkit>,
    config: Arc<ServerConfig>,
    tool_router: ToolRouter<Self>,
}

impl Default for CsvCleaningServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[tool_router]
impl CsvCleaningServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            toolkit: Arc::new(CsvToolkit::new(&config)),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Definitions of every registered tool
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Run a tool body on the blocking pool
    async fn run_blocking<F>(&self, action: &'static str, work: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&CsvToolkit) -> crate::error::Result<String> + Send + 'static,
    {
        let toolkit = Arc::clone(&self.toolkit);
        let outcome = tokio::task::spawn_blocking(move || work(&toolkit))
            .await
            .map_err(|e| McpError::internal_error(format!("Tool task failed: {e}"), None))?;
        Ok(tool_result(action, outcome))
    }

    #[tool(
        description = "Inspect a CSV file and return its shape, column types, missing values, duplicate count and sample rows"
    )]
    pub async fn inspect_csv(
        &self,
        Parameters(params): Parameters<InspectParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking("inspecting CSV", move |toolkit| toolkit.inspect_csv(&params))
            .await
    }

    #[tool(description = "Remove rows that contain null values in the given columns")]
    pub async fn remove_null_rows(
        &self,
        Parameters(params): Parameters<RemoveNullRowsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking("removing null rows", move |toolkit| {
            toolkit.remove_null_rows(&params)
        })
        .await
    }

    #[tool(
        description = "Fill missing values using a strategy: mean, median, mode, forward, backward or constant"
    )]
    pub async fn fill_missing_values(
        &self,
        Parameters(params): Parameters<FillMissingParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking("filling missing values", move |toolkit| {
            toolkit.fill_missing_values(&params)
        })
        .await
    }

    #[tool(description = "Remove duplicate rows, optionally comparing only some columns")]
    pub async fn remove_duplicates(
        &self,
        Parameters(params): Parameters<RemoveDuplicatesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking("removing duplicates", move |toolkit| {
            toolkit.remove_duplicates(&params)
        })
        .await
    }

    #[tool(description = "Standardize text columns: lower, upper, trim or title case")]
    pub async fn standardize_columns(
        &self,
        Parameters(params): Parameters<StandardizeParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking("standardizing columns", move |toolkit| {
            toolkit.standardize_columns(&params)
        })
        .await
    }

    #[tool(
        description = "Keep rows where a column matches a condition: equals, not_equals, greater, less, contains, not_contains"
    )]
    pub async fn filter_rows(
        &self,
        Parameters(params): Parameters<FilterParams>,
    ) -> Result<CallToolResult, McpError> {
        self.run_blocking("filtering rows", move |toolkit| toolkit.filter_rows(&params))
            .await
    }

    #[tool(description = "Greet someone by name")]
    pub async fn greet(
        &self,
        Parameters(params): Parameters<GreetParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(tools::greet(
            &params,
        ))]))
    }

    #[tool(description = "Add two integers")]
    pub async fn add_numbers(
        &self,
        Parameters(params): Parameters<NumberPairParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            "adding numbers",
            tools::add_numbers(&params).map(|n| n.to_string()),
        ))
    }

    #[tool(description = "Subtract the second integer from the first")]
    pub async fn subtract_numbers(
        &self,
        Parameters(params): Parameters<NumberPairParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(tool_result(
            "subtracting numbers",
            tools::subtract_numbers(&params).map(|n| n.to_string()),
        ))
    }
}

impl CsvCleaningServer {
    /// The operations guide followed by every dataset in the search directories
    pub async fn resource_list(&self) -> Result<Vec<Resource>, McpError> {
        let search_dirs = self.toolkit.loader().search_dirs().to_vec();
        let datasets =
            tokio::task::spawn_blocking(move || resources::discover_datasets(&search_dirs))
                .await
                .map_err(|e| McpError::internal_error(format!("Listing datasets failed: {e}"), None))?;
        debug!("Found {} datasets", datasets.len());

        let mut guide = RawResource::new(GUIDE_URI, "CSV cleaning operations guide");
        guide.description = Some("Reference for every cleaning tool and its options".into());
        guide.mime_type = Some("text/markdown".into());

        let mut listed = vec![guide.no_annotation()];
        listed.extend(datasets.into_iter().map(|entry| {
            let mut raw = RawResource::new(entry.uri.clone(), entry.file_name.clone());
            raw.description = Some(entry.description());
            raw.mime_type = Some("text/csv".into());
            raw.size = u32::try_from(entry.size).ok();
            raw.no_annotation()
        }));
        Ok(listed)
    }

    pub async fn resource_contents(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        if uri == GUIDE_URI {
            return Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(resources::operations_guide(), uri)],
            });
        }

        let toolkit = Arc::clone(&self.toolkit);
        let requested = uri.to_string();
        let content =
            tokio::task::spawn_blocking(move || resources::read_dataset(toolkit.loader(), &requested))
                .await
                .map_err(|e| McpError::internal_error(format!("Reading resource failed: {e}"), None))?
                .map_err(|e| McpError::internal_error(e.to_string(), Some(json!({ "uri": uri }))))?;

        match content {
            Some(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri)],
            }),
            None => Err(McpError::resource_not_found(
                format!("Resource not found: {uri}"),
                Some(json!({ "uri": uri })),
            )),
        }
    }

    pub fn prompt_list(&self) -> Vec<Prompt> {
        prompts::PROMPTS
            .iter()
            .map(|template| {
                let arguments = template
                    .arguments
                    .iter()
                    .map(|arg| PromptArgument {
                        name: arg.name.to_string(),
                        title: None,
                        description: Some(arg.description.to_string()),
                        required: Some(arg.required),
                    })
                    .collect();
                Prompt::new(template.name, Some(template.description), Some(arguments))
            })
            .collect()
    }

    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        let rendered = prompts::render_prompt(name, arguments)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        Ok(GetPromptResult {
            description: Some(rendered.description),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, rendered.text)],
        })
    }
}

#[tool_handler]
impl ServerHandler for CsvCleaningServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "csv-clean-mcp".to_string(),
                version: crate::VERSION.to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(
            self.resource_list().await?,
        ))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource {}", uri);
        self.resource_contents(&uri).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(self.prompt_list()))
    }

    async fn get_prompt(
        &self,
        GetPromptRequestParam { name, arguments }: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt(&name, arguments.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_registers_all_tools() {
        let server = CsvCleaningServer::default();
        let mut names: Vec<String> = server.tools().iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "add_numbers",
                "fill_missing_values",
                "filter_rows",
                "greet",
                "inspect_csv",
                "remove_duplicates",
                "remove_null_rows",
                "standardize_columns",
                "subtract_numbers",
            ]
        );
    }

    #[test]
    fn test_server_info() {
        let info = CsvCleaningServer::default().get_info();
        assert_eq!(info.server_info.name, "csv-clean-mcp");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
    }

    #[tokio::test]
    async fn test_tool_error_is_reported_in_result() {
        let server = CsvCleaningServer::default();
        let result = server
            .fill_missing_values(Parameters(FillMissingParams {
                csv_path: "a,b\n1,\n".to_string(),
                strategy: "guess".to_string(),
                columns: None,
                fill_value: None,
                output_path: None,
            }))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Error filling missing values: Unknown strategy 'guess'"
        );
    }

    #[tokio::test]
    async fn test_arithmetic_tools() {
        let server = CsvCleaningServer::default();
        let sum = server
            .add_numbers(Parameters(NumberPairParams { a: 2, b: 40 }))
            .await
            .unwrap();
        assert_eq!(text_of(&sum), "42");

        let overflow = server
            .subtract_numbers(Parameters(NumberPairParams { a: i64::MIN, b: 1 }))
            .await
            .unwrap();
        assert_eq!(overflow.is_error, Some(true));
        assert!(text_of(&overflow).starts_with("Error subtracting numbers:"));
    }

    #[tokio::test]
    async fn test_guide_resource() {
        let server = CsvCleaningServer::default();
        let listed = server.resource_list().await.unwrap();
        assert_eq!(listed[0].raw.uri, GUIDE_URI);

        let read = server.resource_contents(GUIDE_URI).await.unwrap();
        assert_eq!(read.contents.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let server = CsvCleaningServer::default();
        let err = server
            .resource_contents("csv://datasets/no-such-file.csv")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[test]
    fn test_prompt_errors_are_invalid_params() {
        let server = CsvCleaningServer::default();
        let err = server.prompt("clean_csv", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let prompts = server.prompt_list();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].name, "clean_csv");
    }

    #[test]
    fn test_prompt_list_describes_arguments() {
        let prompts = CsvCleaningServer::default().prompt_list();
        let arguments = prompts[0].arguments.as_deref().unwrap();
        assert_eq!(arguments.len(), 2);
        assert_eq!(arguments[0].name, "csv_path");
        assert_eq!(arguments[0].required, Some(true));
        assert_eq!(arguments[1].name, "goal");
        assert_eq!(arguments[1].required, Some(false));
        assert_eq!(
            arguments[1].description.as_deref(),
            Some("What the cleaned data will be used for")
        );

        let report = prompts[1].arguments.as_deref().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].name, "csv_path");
    }
}
