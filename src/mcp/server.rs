//! Nomad Spoon MCP Server Implementation
//!
//! Implements the MCP server with the BMI and catalog tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::bmi::request::{DEFAULT_EXERCISE_INDEX, DEFAULT_GENDER, DEFAULT_UNIT};
use crate::bmi::{BmiRequest, EvaluateError};
use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{bmi, products};

/// Nomad Spoon MCP Service
#[derive(Clone)]
pub struct NomadService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<NomadService>,
}

impl NomadService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBmiParams {
    /// Age in years (must be > 0)
    pub age: Option<i64>,
    /// Height: centimeters for Metric, inches for US (must be > 0)
    pub height: Option<f64>,
    /// Weight: kilograms for Metric, pounds for US (must be > 0)
    pub weight: Option<f64>,
    /// Free-text gender label (default "Unknown")
    pub gender: Option<String>,
    /// "Metric" (default) or "US"
    pub unit: Option<String>,
    /// Activity level 0-4 (default 2)
    #[serde(rename = "exerciseIndex", alias = "exercise_index")]
    pub exercise_index: Option<i64>,
}

impl From<CalculateBmiParams> for BmiRequest {
    fn from(p: CalculateBmiParams) -> Self {
        Self {
            age: p.age.unwrap_or(0),
            height: p.height.unwrap_or(0.0),
            weight: p.weight.unwrap_or(0.0),
            gender: p.gender.unwrap_or_else(|| DEFAULT_GENDER.to_string()),
            unit: p.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            exercise_index: p.exercise_index.unwrap_or(DEFAULT_EXERCISE_INDEX),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProductPageParams {
    /// Product slug (defaults to the featured product)
    pub slug: Option<String>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn evaluate_error(e: EvaluateError) -> McpError {
    if e.is_client_error() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        McpError::internal_error(e.to_string(), None)
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NomadService {
    #[tool(description = "Get the current status of the service including build info, database status, catalog size and process information")]
    async fn service_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get instructions for the BMI calculator: required inputs, units, and how to read the result. Call this before the first calculate_bmi.")]
    fn bmi_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::BMI_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(BMI_INSTRUCTIONS)]))
    }

    #[tool(description = "Calculate BMI, classify it (Under Weight / Normal / Over Weight / Obese), record the calculation and suggest up to 6 matching products")]
    fn calculate_bmi(&self, Parameters(p): Parameters<CalculateBmiParams>) -> Result<CallToolResult, McpError> {
        let request = BmiRequest::from(p);
        let result = bmi::calculate_bmi(&self.database, &request).map_err(evaluate_error)?;
        to_json(&result)
    }

    #[tool(description = "Get a product page: the product, similar products, recent reviews and same-category suggestions")]
    fn get_product_page(&self, Parameters(p): Parameters<GetProductPageParams>) -> Result<CallToolResult, McpError> {
        let result = products::get_product_page(&self.database, p.slug.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(page) => to_json(&page),
            None => Err(McpError::resource_not_found(products::EMPTY_CATALOG_MESSAGE, None)),
        }
    }

    #[tool(description = "List every product in the catalog")]
    fn list_products(&self) -> Result<CallToolResult, McpError> {
        let result = products::list_products(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NomadService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nomad-spoon".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nomad Spoon".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nomad Spoon - BMI calculator and nutrition product catalog. \
                 Call bmi_instructions before calculate_bmi. \
                 BMI: calculate_bmi (stores every calculation, returns product suggestions). \
                 Catalog: get_product_page, list_products. \
                 Status: service_status."
                    .into(),
            ),
        }
    }
}
