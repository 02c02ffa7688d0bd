//! Pokedex Arena MCP Server
//!
//! A Model Context Protocol server (rmcp, stdio transport) that lets an LLM
//! client run battles between the teams in the bundled data file.

use std::borrow::Cow;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use pokedex_arena::mcp_interface::*;
use pokedex_arena::session::MatchStore;
use pokedex_arena::teams::{load_teams, Team};
use pokedex_arena::Intent;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The server hosts a single match at a time
const MATCH_ID: &str = "mcp_battle";

#[derive(Debug, Clone)]
pub struct ArenaService {
    tool_router: ToolRouter<ArenaService>,
    teams: Arc<Vec<Team>>,
    matches: Arc<Mutex<MatchStore>>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartBattleRequest {
    #[schemars(description = "Name of the team on side A")]
    pub team_a: String,
    #[schemars(description = "Name of the team on side B")]
    pub team_b: String,
    #[schemars(description = "Battle mode: 'ai' (side B is computer controlled) or 'pvp'")]
    pub mode: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AttackRequest {
    #[schemars(description = "Side that attacks: 'a' or 'b'")]
    pub side: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SwitchRequest {
    #[schemars(description = "Side that switches: 'a' or 'b'")]
    pub side: String,
    #[schemars(description = "Roster slot to send out (0-4)")]
    pub slot: i64,
}

fn internal_error(message: String) -> McpError {
    McpError {
        code: ErrorCode(-32603),
        message: Cow::from(message),
        data: None,
    }
}

#[tool_router]
impl ArenaService {
    pub fn new(teams: Vec<Team>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            teams: Arc::new(teams),
            matches: Arc::new(Mutex::new(MatchStore::new())),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, MatchStore>, McpError> {
        self.matches
            .lock()
            .map_err(|_| internal_error("Match store lock poisoned".to_string()))
    }

    fn submit(&self, side: &str, intent: Intent) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        let text = if store.contains(MATCH_ID) {
            submit_player_intent(&mut store, MATCH_ID, side, intent).unwrap_or_else(|e| e)
        } else {
            "No battle is currently active. Use 'start_battle' to begin.".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List all teams that can be used in a battle")]
    async fn list_teams(&self) -> Result<CallToolResult, McpError> {
        let text = available_teams_display(&self.teams);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Start a new battle between two teams, replacing any current battle")]
    async fn start_battle(
        &self,
        Parameters(request): Parameters<StartBattleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut store = self.store()?;
        match create_demo_match(
            &mut store,
            MATCH_ID,
            &self.teams,
            &request.team_a,
            &request.team_b,
            &request.mode,
        ) {
            Ok(intro_text) => Ok(CallToolResult::success(vec![Content::text(intro_text)])),
            Err(e) => Err(internal_error(format!("Error starting battle: {}", e))),
        }
    }

    #[tool(description = "Get the current battle state and status")]
    async fn get_battle_state(&self) -> Result<CallToolResult, McpError> {
        let store = self.store()?;
        let text = if store.contains(MATCH_ID) {
            battle_status_summary(&store, MATCH_ID).unwrap_or_else(|e| e)
        } else {
            "No battle is currently active. Use 'start_battle' to begin.".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Attack with the active creature of the given side")]
    async fn attack(
        &self,
        Parameters(request): Parameters<AttackRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.submit(&request.side, Intent::Attack)
    }

    #[tool(description = "Switch the given side's active creature to another roster slot")]
    async fn switch(
        &self,
        Parameters(request): Parameters<SwitchRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.submit(&request.side, Intent::Switch { index: request.slot })
    }
}

#[tool_handler]
impl ServerHandler for ArenaService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let teams_path =
        std::env::var("POKEDEX_ARENA_TEAMS").unwrap_or_else(|_| DEFAULT_TEAMS_PATH.to_string());
    let teams = load_teams(Path::new(&teams_path))?;
    info!(count = teams.len(), path = %teams_path, "Pokedex Arena MCP Server starting");

    let service = ArenaService::new(teams);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    info!("Server running, waiting for shutdown");
    let quit_reason = server.waiting().await?;

    info!(reason = ?quit_reason, "Pokedex Arena MCP Server exiting");
    Ok(())
}
