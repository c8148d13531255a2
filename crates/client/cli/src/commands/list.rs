use anyhow::Result;
use clap::Args;
use console::style;
use jelly_content::ContentFactory;
use jelly_core::GameConfig;

use crate::config::CliConfig;

/// List the numbered levels in a data directory.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Content directory. Falls back to JELLY_DATA_DIR, then ./data
    #[arg(short, long, value_name = "DIR")]
    data: Option<std::path::PathBuf>,
}

impl ListCommand {
    pub fn execute(self, cli: &CliConfig) -> Result<()> {
        let factory = ContentFactory::new(cli.resolve_data_dir(self.data));
        let config = factory.load_config_or_default()?;
        let count = factory.level_count();

        println!(
            "{} {} level(s) in {}",
            style("→").cyan(),
            count,
            factory.data_dir().display()
        );
        for number in 1..=count {
            println!("  {}", describe(&factory, number, &config));
        }
        Ok(())
    }
}

fn describe(factory: &ContentFactory, number: u32, config: &GameConfig) -> String {
    match factory.load_level(number, config) {
        Ok(level) => format!(
            "{:>3}  {}x{}  {}",
            number, level.width, level.height, level.name
        ),
        Err(err) => format!("{:>3}  {} {:#}", number, style("invalid:").red(), err),
    }
}
