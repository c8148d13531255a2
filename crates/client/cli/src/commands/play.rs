use anyhow::{Context, Result, bail};
use clap::Args;
use console::style;
use jelly_core::{CardinalDirection, LevelDefinition, TurnEngine, TurnPhase, TurnReport};
use serde_json::json;
use tracing::{info, warn};

use super::{LevelSource, OutputFormat};
use crate::config::CliConfig;
use crate::render;
use crate::sink::TracingSink;

/// Play a level by feeding it a sequence of player moves.
#[derive(Args, Debug)]
pub struct PlayCommand {
    #[command(flatten)]
    source: LevelSource,

    /// Player moves, one letter per round: U/D/L/R or N/S/E/W (case-insensitive)
    #[arg(short, long, value_name = "MOVES", default_value = "")]
    moves: String,

    /// Continue with the next numbered level after a win
    #[arg(long)]
    advance: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

/// What happened on one level during this run.
struct LevelRun {
    level: LevelDefinition,
    reports: Vec<TurnReport>,
    phase: TurnPhase,
    turn: u32,
    board: Vec<String>,
    roster: Vec<String>,
    digest: String,
}

impl PlayCommand {
    pub fn execute(self, cli: &CliConfig) -> Result<()> {
        let runs = self.run(cli)?;
        match self.format {
            OutputFormat::Json => print_json(&runs)?,
            OutputFormat::Summary => print_summary(&runs),
        }
        Ok(())
    }

    /// Plays the move script and snapshots every level it touched.
    fn run(&self, cli: &CliConfig) -> Result<Vec<LevelRun>> {
        let directions = parse_moves(&self.moves)?;
        if self.advance && self.source.level_file.is_some() {
            bail!("--advance needs a numbered level from a data directory");
        }
        let content = self.source.load(cli)?;
        let mut progression = content.progression;

        let mut engine = TurnEngine::new(content.config).with_event_sink(Box::new(TracingSink));
        let mut level = content.level;
        engine.init_level(&level)?;

        let mut runs = Vec::new();
        let mut reports = Vec::new();
        let mut remaining = directions.into_iter();

        for direction in remaining.by_ref() {
            let report = engine.play_round(direction)?;
            let finished = report.is_finished();
            reports.push(report);
            if !finished {
                continue;
            }

            let next = match (&mut progression, engine.phase()) {
                (Some(progression), TurnPhase::Won) if self.advance => progression.advance()?,
                _ => None,
            };
            let Some(next) = next else {
                break;
            };
            runs.push(snapshot(&engine, level, std::mem::take(&mut reports))?);
            engine.init_level(&next)?;
            level = next;
        }

        let ignored = remaining.count();
        if ignored > 0 {
            warn!(ignored, "level finished before all moves were played");
        }
        runs.push(snapshot(&engine, level, reports)?);
        info!(levels = runs.len(), "run complete");
        Ok(runs)
    }
}

/// Parses a move string, ignoring whitespace and commas.
fn parse_moves(moves: &str) -> Result<Vec<CardinalDirection>> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .enumerate()
        .map(|(index, symbol)| {
            CardinalDirection::try_from(symbol)
                .with_context(|| format!("Invalid move {} in --moves", index + 1))
        })
        .collect()
}

fn snapshot(
    engine: &TurnEngine,
    level: LevelDefinition,
    reports: Vec<TurnReport>,
) -> Result<LevelRun> {
    let grid = engine.grid()?;
    let registry = engine.registry()?;
    Ok(LevelRun {
        level,
        reports,
        phase: engine.phase(),
        turn: engine.turn_number(),
        board: render::board_lines(grid, registry),
        roster: render::roster_lines(registry),
        digest: hex::encode(engine.state_digest()?),
    })
}

fn print_json(runs: &[LevelRun]) -> Result<()> {
    let levels: Vec<_> = runs
        .iter()
        .map(|run| {
            json!({
                "level": run.level.id,
                "name": run.level.name,
                "phase": run.phase,
                "turn": run.turn,
                "rounds": run.reports,
                "board": run.board,
                "digest": run.digest,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&levels)?);
    Ok(())
}

fn print_summary(runs: &[LevelRun]) {
    for run in runs {
        let phase = match run.phase {
            TurnPhase::Won => style(run.phase.to_string()).green().bold(),
            TurnPhase::Lost => style(run.phase.to_string()).red().bold(),
            _ => style(run.phase.to_string()).yellow(),
        };
        println!(
            "{} Level {} {} ({} round(s), phase {})",
            style("→").cyan(),
            run.level.id,
            style(&run.level.name).bold(),
            run.reports.len(),
            phase
        );
        for line in &run.board {
            println!("  {line}");
        }
        for line in &run.roster {
            println!("  {line}");
        }
        let kills: usize = run.reports.iter().map(|report| report.kills().len()).sum();
        println!("  turns {}  kills {}", run.turn, kills);
        println!("  digest {}", style(&run.digest).dim());
    }
}
