use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use duel_arena::arena::Arena;
use duel_arena::config::ArenaConfig;
use duel_arena::output;
use duel_arena::play::run_play;
use duel_arena::storage::Storage;
use duel_core::{PairStrategy, VoteOutcome, STATE_KEY};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duel-arena")]
#[command(about = "Rank a catalog by voting on pairs")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = ArenaConfig::config_path())]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Vote interactively on pairs
    Play {
        /// Pairing strategy (overrides the config file)
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },
    /// Record a single vote
    Vote {
        /// Id of the winning item
        winner: i64,
        /// Id of the losing item
        loser: i64,
    },
    /// Move from elimination to the finals
    Advance,
    /// Show the ranking
    Ranking {
        /// Show only the top N rows
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the current finalists
    Finalists {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show progress towards the finals
    Status,
    /// Discard saved state and start over from the catalog
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Uniform,
    LeastPlayed,
}

impl From<Strategy> for PairStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Uniform => PairStrategy::Uniform,
            Strategy::LeastPlayed => PairStrategy::LeastPlayed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ArenaConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(dir) = config.database_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    let storage = Storage::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    tracing::debug!("Database: {:?}", config.database_path);

    let mut arena = Arena::open(config, storage)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Play { strategy } => {
            let strategy = strategy
                .map(PairStrategy::from)
                .unwrap_or(arena.config().strategy);
            let mut rng = rand::thread_rng();
            let summary = run_play(&mut arena, strategy, &mut rng, io::stdin().lock(), &mut out)?;
            writeln!(
                out,
                "\n{} votes, {} undone. Progress is saved.",
                summary.votes, summary.undos
            )?;
        }
        Commands::Vote { winner, loser } => match arena.vote(winner, loser)? {
            VoteOutcome::Recorded {
                winner,
                loser,
                advance_ready,
            } => {
                writeln!(
                    out,
                    "#{} now {:.0} ({} games), #{} now {:.0} ({} games)",
                    winner.id,
                    winner.rating,
                    winner.games_played,
                    loser.id,
                    loser.rating,
                    loser.games_played
                )?;
                if advance_ready {
                    writeln!(out, "Elimination complete. Run `duel-arena advance`.")?;
                }
            }
            VoteOutcome::UnknownItem(id) => {
                anyhow::bail!("item {} is not in the active pool", id)
            }
            VoteOutcome::SameItem(id) => anyhow::bail!("item {} cannot beat itself", id),
        },
        Commands::Advance => {
            arena.advance_phase()?;
            output::write_items(&mut out, "Finalists", &arena.session().finalists())?;
        }
        Commands::Ranking { limit, json } => {
            if json {
                writeln!(out, "{}", output::ranking_json(arena.session(), limit)?)?;
            } else {
                output::write_ranking(&mut out, arena.session(), limit)?;
            }
        }
        Commands::Finalists { json } => {
            let finalists = arena.session().finalists();
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&finalists)?)?;
            } else {
                output::write_items(&mut out, "Finalists", &finalists)?;
            }
        }
        Commands::Status => {
            let last_saved = arena.store().updated_at(STATE_KEY)?;
            output::write_status(&mut out, arena.session(), last_saved.as_deref())?;
        }
        Commands::Reset => {
            arena.reset()?;
            writeln!(
                out,
                "Session reset: {} items back at their catalog ratings.",
                arena.session().items().len()
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_vote_command() {
        let cli = Cli::try_parse_from(["duel-arena", "vote", "3", "7"]);
        assert!(cli.is_ok());

        let cli = cli.unwrap();
        assert_eq!(cli.config, PathBuf::from("arena.toml"));
        match cli.command {
            Commands::Vote { winner, loser } => {
                assert_eq!(winner, 3);
                assert_eq!(loser, 7);
            }
            _ => panic!("expected vote command"),
        }
    }

    #[test]
    fn test_cli_parses_play_strategy() {
        let cli =
            Cli::try_parse_from(["duel-arena", "play", "--strategy", "least-played"]).unwrap();
        match cli.command {
            Commands::Play { strategy } => {
                assert_eq!(strategy, Some(Strategy::LeastPlayed));
                assert_eq!(
                    PairStrategy::from(Strategy::LeastPlayed),
                    PairStrategy::LeastPlayed
                );
            }
            _ => panic!("expected play command"),
        }

        let cli = Cli::try_parse_from(["duel-arena", "play", "-s", "uniform"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Play {
                strategy: Some(Strategy::Uniform)
            }
        ));
    }

    #[test]
    fn test_cli_play_without_strategy_uses_config() {
        let cli = Cli::try_parse_from(["duel-arena", "play"]).unwrap();
        assert!(matches!(cli.command, Commands::Play { strategy: None }));
    }

    #[test]
    fn test_cli_rejects_unknown_strategy() {
        let cli = Cli::try_parse_from(["duel-arena", "play", "--strategy", "swiss"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parses_ranking_options() {
        let cli = Cli::try_parse_from([
            "duel-arena",
            "--config",
            "other.toml",
            "ranking",
            "--limit",
            "10",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("other.toml"));
        match cli.command {
            Commands::Ranking { limit, json } => {
                assert_eq!(limit, Some(10));
                assert!(json);
            }
            _ => panic!("expected ranking command"),
        }
    }

    #[test]
    fn test_cli_vote_requires_two_ids() {
        assert!(Cli::try_parse_from(["duel-arena", "vote", "3"]).is_err());
        assert!(Cli::try_parse_from(["duel-arena", "vote", "a", "b"]).is_err());
    }

    #[test]
    fn test_cli_help_lists_subcommands() {
        let mut cmd = Cli::command();
        let help = cmd.render_help().to_string();

        for name in ["play", "vote", "advance", "ranking", "finalists", "status", "reset"] {
            assert!(help.contains(name), "help should mention {}", name);
        }
    }
}
