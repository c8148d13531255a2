use anyhow::Result;
use clap::Args;
use console::style;
use jelly_core::{CellType, compute_state_digest};
use serde_json::json;
use strum::IntoEnumIterator;

use super::{LevelSource, OutputFormat};
use crate::config::CliConfig;
use crate::render;

/// Show a level's board, spawns and initial state digest without playing it.
#[derive(Args, Debug)]
pub struct InspectCommand {
    #[command(flatten)]
    source: LevelSource,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,
}

impl InspectCommand {
    pub fn execute(self, cli: &CliConfig) -> Result<()> {
        let content = self.source.load(cli)?;
        let level = &content.level;
        let (grid, registry) = level.build(&content.config)?;
        let digest = hex::encode(compute_state_digest(&grid, &registry));
        let board = render::board_lines(&grid, &registry);

        match self.format {
            OutputFormat::Json => {
                let cells: serde_json::Map<_, _> = CellType::iter()
                    .map(|cell| (cell.to_string(), json!(grid.count(cell))))
                    .collect();
                let report = json!({
                    "level": level.id,
                    "name": level.name,
                    "width": grid.width(),
                    "height": grid.height(),
                    "cells": cells,
                    "entities": registry.iter().collect::<Vec<_>>(),
                    "board": board,
                    "digest": digest,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Summary => {
                println!(
                    "{} Level {} {}",
                    style("→").cyan(),
                    level.id,
                    style(&level.name).bold()
                );
                println!("  size   {}x{}", grid.width(), grid.height());
                for cell in CellType::iter().filter(|cell| *cell != CellType::Empty) {
                    println!("  {:<14} {}", cell.to_string(), grid.count(cell));
                }
                println!();
                for line in board {
                    println!("  {line}");
                }
                println!();
                for line in render::roster_lines(&registry) {
                    println!("  {line}");
                }
                println!("  digest {}", style(digest).dim());
            }
        }
        Ok(())
    }
}
