use crate::context::McpContext;
use crate::handlers::engines::{self, SearchEnginesArgs};
use crate::handlers::search::{self, CodeSearchArgs};
use codesearch_engines::SearchService;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};

const INSTRUCTIONS: &str = "Live code search over the workspace. Use 'code_search' with a text \
request ({\"type\":\"text\",\"query\":...}) or a structural request ({\"type\":\"ast\",\"pattern\":...}); \
use 'search_engines' to see which engines are installed.";

/// MCP server for codesearch
#[derive(Clone)]
pub struct CodesearchServer {
    pub context: McpContext,
    pub tool_router: ToolRouter<Self>,
}

impl CodesearchServer {
    pub fn new(context: McpContext) -> Self {
        Self {
            context,
            tool_router: Self::tool_router(),
        }
    }

    /// Serve on stdin/stdout until the client disconnects
    pub async fn run_stdio_server(service: SearchService) -> anyhow::Result<()> {
        tracing::info!(root = %service.root().display(), "starting MCP stdio server");
        let server = Self::new(McpContext::new(service));
        let running = server.serve(rmcp::transport::stdio()).await?;
        running.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl CodesearchServer {
    #[tool(
        description = "Search workspace code. Text requests pick the best installed engine (ripgrep, git grep, grep); ast requests use ast-grep. Results are capped and secrets/vendor paths are never searched."
    )]
    pub async fn code_search(
        &self,
        Parameters(args): Parameters<CodeSearchArgs>,
    ) -> Result<CallToolResult, McpError> {
        search::code_search(&self.context, args).await
    }

    #[tool(description = "Report which search engines are available and which one text search would use.")]
    pub async fn search_engines(
        &self,
        Parameters(args): Parameters<SearchEnginesArgs>,
    ) -> Result<CallToolResult, McpError> {
        engines::search_engines(&self.context, args).await
    }
}

#[tool_handler]
impl ServerHandler for CodesearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
