//! Text-oriented helpers shared by the MCP server and the demo CLI.
//!
//! Every function here returns plain strings so the callers only need to
//! forward them to a terminal or a tool response.

use crate::battle::state::TurnRng;
use crate::errors::BattleEngineError;
use crate::session::{MatchStore, SubmitOutcome};
use crate::teams::{find_team, Team};
use schema::{BattleMode, Intent, Side};
use std::str::FromStr;

/// Where the bundled team data lives, relative to the working directory
pub const DEFAULT_TEAMS_PATH: &str = "data/teams.ron";

/// Returns formatted text listing the teams that can take part in a battle
pub fn available_teams_display(teams: &[Team]) -> String {
    let mut output = String::from("Available Teams:\n");

    for (i, team) in teams.iter().enumerate() {
        let members: Vec<String> = team
            .members
            .iter()
            .map(|c| format!("{} (Lv. {})", c.display_name(), c.level))
            .collect();
        let readiness = if team.is_battle_ready() {
            ""
        } else {
            " [not battle ready]"
        };
        output.push_str(&format!(
            "  {}. {} ({}){}: {}\n",
            i + 1,
            team.name,
            team.owner,
            readiness,
            members.join(", ")
        ));
    }
    output
}

/// Creates a match between two named teams and returns the opening text
pub fn create_demo_match(
    store: &mut MatchStore,
    match_id: &str,
    teams: &[Team],
    team_a: &str,
    team_b: &str,
    mode: &str,
) -> Result<String, String> {
    let mode = BattleMode::from_str(mode)
        .map_err(|_| format!("Unknown battle mode '{}'. Use 'ai' or 'pvp'.", mode))?;
    let first = find_team(teams, team_a).ok_or_else(|| format!("No team named '{}'.", team_a))?;
    let second = find_team(teams, team_b).ok_or_else(|| format!("No team named '{}'.", team_b))?;

    if store.contains(match_id) {
        store.discard(match_id).map_err(describe_error)?;
    }
    let view = store
        .create_match(match_id, first, second, mode)
        .map_err(describe_error)?;

    let lead_a = &view.side_a.participants[view.side_a.active_index];
    let lead_b = &view.side_b.participants[view.side_b.active_index];
    let opponent = match mode {
        BattleMode::Ai => "The opponent".to_string(),
        BattleMode::Pvp => view.side_b.owner_label.clone(),
    };

    Ok(format!(
        "{} vs {} ({} mode)\n{} sends out {}!\n{} sends out {}!",
        view.side_a.display_name,
        view.side_b.display_name,
        mode,
        view.side_a.owner_label,
        lead_a.nickname,
        opponent,
        lead_b.nickname
    ))
}

/// Submits one side's intent with fresh randomness and returns the turn text
pub fn submit_player_intent(
    store: &mut MatchStore,
    match_id: &str,
    side: &str,
    intent: Intent,
) -> Result<String, String> {
    let side = parse_side(side)?;
    let outcome = store
        .submit_intent(match_id, side, intent, TurnRng::new_random())
        .map_err(describe_error)?;

    let mut output = match outcome {
        SubmitOutcome::Pending => {
            return Ok(format!(
                "{} will {}. Waiting for {}.",
                side,
                intent,
                side.opponent()
            ))
        }
        SubmitOutcome::Resolved { events } if events.is_empty() => {
            "The battle is already over.\n".to_string()
        }
        SubmitOutcome::Resolved { events } => {
            let mut text = events.join("\n");
            text.push('\n');
            text
        }
    };

    let view = store.view(match_id).map_err(describe_error)?;
    if let Some(winner) = view.winner {
        output.push_str(&format!("\nBattle over: {} won.\n", view.side(winner).display_name));
    } else {
        for side in [Side::A, Side::B] {
            let roster = view.side(side);
            if roster.participants[roster.active_index].fainted {
                output.push_str(&format!(
                    "\n{}'s active creature is KO'd and must be switched out.\n",
                    roster.display_name
                ));
            }
        }
    }

    Ok(output)
}

/// Gets the current battle status as a formatted string
pub fn battle_status_summary(store: &MatchStore, match_id: &str) -> Result<String, String> {
    let state = store.load(match_id).map_err(describe_error)?;

    let mut output = match state.winner {
        Some(winner) => format!("Battle Over - {} won!\n", state.side(winner).display_name),
        None => "Battle in Progress\n".to_string(),
    };
    if let Some(intent) = store.pending_intent(match_id).map_err(describe_error)? {
        output.push_str(&format!("Side A is waiting to {}.\n", intent));
    }
    output.push_str(&state.to_string());
    Ok(output)
}

/// Parses a typed command such as `attack`, `switch 3` or a JSON intent.
/// Slot numbers in `switch` are zero-based, matching the roster listing.
pub fn parse_intent_command(input: &str) -> Result<Intent, String> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        return crate::battle::engine::parse_intent(trimmed).map_err(describe_error);
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts.as_slice() {
        [cmd] if cmd.eq_ignore_ascii_case("attack") => Ok(Intent::Attack),
        [cmd, slot] if cmd.eq_ignore_ascii_case("switch") => slot
            .parse::<i64>()
            .map(|index| Intent::Switch { index })
            .map_err(|_| format!("Invalid slot '{}'. Please use a number.", slot)),
        [cmd] if cmd.eq_ignore_ascii_case("switch") => {
            Err("Which slot do you want to switch to? (e.g., 'switch 2')".to_string())
        }
        _ => Err(format!(
            "Unknown command '{}'. Use 'attack' or 'switch <slot>'.",
            trimmed
        )),
    }
}

/// Parses `a`, `b`, `side-a` or `side-b`
pub fn parse_side(input: &str) -> Result<Side, String> {
    Side::from_str(input.trim())
        .map_err(|_| format!("Unknown side '{}'. Use 'a' or 'b'.", input.trim()))
}

fn describe_error(err: BattleEngineError) -> String {
    format!("Error: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestTeamBuilder;
    use pretty_assertions::assert_eq;

    fn demo_teams() -> Vec<Team> {
        vec![
            TestTeamBuilder::new("u1", "Team 1").build(),
            TestTeamBuilder::new("u2", "Team 2").build(),
        ]
    }

    #[test]
    fn test_parse_intent_command_forms() {
        assert_eq!(parse_intent_command("attack"), Ok(Intent::Attack));
        assert_eq!(parse_intent_command("  ATTACK "), Ok(Intent::Attack));
        assert_eq!(
            parse_intent_command("switch 3"),
            Ok(Intent::Switch { index: 3 })
        );
        assert_eq!(
            parse_intent_command(r#"{"kind":"switch","index":1}"#),
            Ok(Intent::Switch { index: 1 })
        );
        assert_eq!(
            parse_intent_command("switch -1"),
            Ok(Intent::Switch { index: -1 })
        );
        assert!(parse_intent_command("switch").is_err());
        assert!(parse_intent_command("switch two").is_err());
        assert!(parse_intent_command("flee").is_err());
        assert!(parse_intent_command(r#"{"kind":"flee"}"#).is_err());
    }

    #[test]
    fn test_create_demo_match_intro() {
        let mut store = MatchStore::new();
        let text = create_demo_match(&mut store, "m1", &demo_teams(), "team 1", "Team 2", "ai")
            .unwrap();

        assert_eq!(
            text,
            "Team 1 vs Team 2 (ai mode)\nu1 sends out P1-0!\nThe opponent sends out P2-0!"
        );
        assert!(store.contains("m1"));
    }

    #[test]
    fn test_create_demo_match_rejects_unknown_inputs() {
        let mut store = MatchStore::new();
        let teams = demo_teams();

        assert!(create_demo_match(&mut store, "m1", &teams, "Team 9", "Team 2", "ai").is_err());
        assert!(create_demo_match(&mut store, "m1", &teams, "Team 1", "Team 2", "coop").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_pvp_flow_through_helpers() {
        let mut store = MatchStore::new();
        create_demo_match(&mut store, "m1", &demo_teams(), "Team 1", "Team 2", "pvp").unwrap();

        let waiting = submit_player_intent(&mut store, "m1", "a", Intent::Attack).unwrap();
        assert_eq!(waiting, "side-a will attack. Waiting for side-b.");
        assert!(battle_status_summary(&store, "m1")
            .unwrap()
            .contains("Side A is waiting to attack."));

        let resolved =
            submit_player_intent(&mut store, "m1", "b", Intent::Switch { index: 1 }).unwrap();
        assert!(resolved.starts_with("--- Turn 1 ---\nu2 sends out P2-1!\n"));
        assert!(resolved.contains("damage to P2-1."));
    }

    #[test]
    fn test_status_summary_for_unknown_match() {
        let store = MatchStore::new();
        let err = battle_status_summary(&store, "missing").unwrap_err();
        assert!(err.contains("missing"));
    }

    #[test]
    fn test_available_teams_display_lists_members() {
        let text = available_teams_display(&demo_teams());
        assert!(text.starts_with("Available Teams:\n  1. Team 1 (u1): P1-0 (Lv. 10)"));
        assert!(text.contains("  2. Team 2 (u2): "));
    }
}
