use rmcp::{
    handler::server::router::tool::ToolRouter,
    model::*,
    tool, tool_handler,
    transport::stdio,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct RankResumesParams {
    #[schemars(description = "Job description text the resumes are compared against")]
    job_description: String,
    #[schemars(description = "Resume files (PDF, TXT, MD) or directories containing them")]
    paths: Vec<String>,
    #[schemars(description = "Maximum number of ranked resumes to return")]
    #[serde(default)]
    limit: Option<usize>,
    #[schemars(description = "Drop resumes scoring below this similarity (0 to 1)")]
    #[serde(default)]
    min_score: Option<f32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ExtractTextParams {
    #[schemars(description = "Absolute path to a resume file")]
    path: String,
    #[schemars(description = "Maximum number of characters of text to return")]
    #[serde(default = "resume_rank::handlers::extract::default_max_chars")]
    max_chars: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting Resume Rank MCP Server");

    let config = resume_rank::Config::from_env()?;
    tracing::info!(
        "Configuration loaded (extensions: {}, parallel extraction: {})",
        config.extraction.supported_extensions.join(", "),
        config.extraction.parallel
    );

    let handlers = resume_rank::handlers::RankingHandlers::new(config);
    let server = ResumeRankServer::new(Arc::new(handlers));

    tracing::info!("Server initialized, starting stdio transport");

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

struct ResumeRankServer {
    handlers: Arc<resume_rank::handlers::RankingHandlers>,
    tool_router: ToolRouter<Self>,
}

impl ResumeRankServer {
    fn new(handlers: Arc<resume_rank::handlers::RankingHandlers>) -> Self {
        Self {
            handlers,
            tool_router: Self::tool_router(),
        }
    }
}

#[rmcp::tool_router]
impl ResumeRankServer {
    #[tool(
        name = "rank_resumes",
        description = "Rank resumes against a job description by TF-IDF cosine similarity. Returns resumes sorted from best to worst match with a score between 0 and 1."
    )]
    async fn rank_resumes(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<RankResumesParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let args = resume_rank::handlers::RankResumesArgs {
            job_description: params.job_description,
            paths: params.paths,
            limit: params.limit,
            min_score: params.min_score,
        };

        match self.handlers.handle_rank_resumes(args).await {
            Ok(json_response) => Ok(CallToolResult::success(vec![Content::text(json_response)])),
            Err(e) => Ok(CallToolResult::success(vec![Content::text(
                serde_json::json!({"error": format!("Ranking failed: {}", e)}).to_string()
            )])),
        }
    }

    #[tool(
        name = "extract_text",
        description = "Show the plain text extracted from a single resume, as the ranker sees it. Useful for spotting scanned PDFs with no text."
    )]
    async fn extract_text(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<ExtractTextParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let args = resume_rank::handlers::ExtractTextArgs {
            path: params.path,
            max_chars: params.max_chars,
        };

        match self.handlers.handle_extract_text(args).await {
            Ok(json_response) => Ok(CallToolResult::success(vec![Content::text(json_response)])),
            Err(e) => Ok(CallToolResult::success(vec![Content::text(
                serde_json::json!({"error": format!("Extraction failed: {}", e)}).to_string()
            )])),
        }
    }
}

#[tool_handler]
impl rmcp::ServerHandler for ResumeRankServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Resume screening server. Use rank_resumes with a job description and resume \
                 paths to get a ranked list; use extract_text to inspect a single resume.".to_string()
            ),
        }
    }
}
