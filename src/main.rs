use clap::Parser;
use pokedex_arena::battle::ai::{Behavior, FirstAvailableAI};
use pokedex_arena::mcp_interface::{available_teams_display, DEFAULT_TEAMS_PATH};
use pokedex_arena::teams::find_team;
use pokedex_arena::{
    gain_experience, load_teams, resolve_turn, start_battle, BattleMode, InMemoryCreatureStore,
    Side, TurnRng,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Auto-play a battle between two teams and print the battle log
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// RON file holding the team data
    #[arg(long, default_value = DEFAULT_TEAMS_PATH)]
    teams: PathBuf,

    /// Battle mode: "ai" or "pvp"
    #[arg(long, default_value = "ai")]
    mode: String,

    /// Stop after this many turns even if nobody has won
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Name of the team on side A (defaults to the first team in the file)
    #[arg(long)]
    team_a: Option<String>,

    /// Name of the team on side B (defaults to the second team in the file)
    #[arg(long)]
    team_b: Option<String>,

    /// Experience granted to every member of the winning team
    #[arg(long, default_value_t = 0)]
    reward_xp: u32,

    /// List the available teams and exit
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let teams = load_teams(&args.teams)?;
    info!(count = teams.len(), path = %args.teams.display(), "Loaded teams");

    if args.list {
        print!("{}", available_teams_display(&teams));
        return Ok(());
    }

    let mode = BattleMode::from_str(&args.mode)
        .map_err(|_| format!("Unknown battle mode '{}'. Use 'ai' or 'pvp'.", args.mode))?;

    let pick = |requested: &Option<String>, fallback: usize| match requested {
        Some(name) => find_team(&teams, name).ok_or_else(|| format!("No team named '{}'", name)),
        None => teams
            .get(fallback)
            .ok_or_else(|| format!("The team file needs at least {} teams", fallback + 1)),
    };
    let team_a = pick(&args.team_a, 0)?;
    let team_b = pick(&args.team_b, 1)?;

    let mut battle_state = start_battle(team_a, team_b, mode)?;
    println!("{} vs {} ({} mode)", team_a.name, team_b.name, mode);

    let ai = FirstAvailableAI::new();
    while !battle_state.is_over() && battle_state.turn < args.max_turns {
        let intent_a = ai.decide_intent(&battle_state.side_a);
        let intent_b = match mode {
            BattleMode::Ai => None,
            BattleMode::Pvp => Some(ai.decide_intent(&battle_state.side_b)),
        };

        let bus = resolve_turn(&mut battle_state, intent_a, intent_b, TurnRng::new_random())?;
        let printed = battle_state.log.len() - bus.len();
        for line in &battle_state.log[printed..] {
            println!("{}", line);
        }
    }

    println!();
    print!("{}", battle_state);

    let Some(winner) = battle_state.winner else {
        warn!(turns = battle_state.turn, "Battle stopped without a winner");
        println!("No winner after {} turns.", battle_state.turn);
        return Ok(());
    };

    if args.reward_xp > 0 {
        let winners = match winner {
            Side::A => team_a,
            Side::B => team_b,
        };
        let mut store = InMemoryCreatureStore::new();
        for member in &winners.members {
            let mut creature = member.clone();
            if gain_experience(&mut store, &mut creature, args.reward_xp)? {
                println!("{} grew to level {}!", creature.display_name(), creature.level);
            }
        }
    }

    Ok(())
}
