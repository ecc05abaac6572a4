use std::path::Path;

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use factstore::config::{Config, default_config_paths};

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    #[clap(about = "Show the effective configuration")]
    Show,

    #[clap(about = "Show which config file locations are searched")]
    Path,
}

impl ConfigCommand {
    pub fn execute(
        &self,
        config_path: Option<&Path>,
        config: &Config,
        format: OutputFormat,
    ) -> CliResult<()> {
        match &self.command {
            ConfigSubcommand::Show => Self::show(config_path, config, format),
            ConfigSubcommand::Path => Self::path(config_path, format),
        }
    }

    fn show(config_path: Option<&Path>, config: &Config, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Table => {
                match config_path {
                    Some(path) => println!("Configuration from: {}", path.display()),
                    None => println!("Configuration: (effective)"),
                }
                println!("==============================\n");

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Setting", "Value"]);

                table.add_row([
                    "storage.backend",
                    &format!("{:?}", config.storage.backend).to_lowercase(),
                ]);
                table.add_row([
                    "storage.data_dir",
                    &config.storage.data_dir.display().to_string(),
                ]);
                table.add_row([
                    "search.default_limit",
                    &config.search.default_limit.to_string(),
                ]);
                table.add_row([
                    "sessions.max_cached_locks",
                    &config.sessions.max_cached_locks.to_string(),
                ]);
                table.add_row(["extraction.label", &config.extraction.label]);

                println!("{table}\n");
                println!("As TOML:\n\n{}", toml::to_string(config)?);
            }
        }

        Ok(())
    }

    fn path(config_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
        let searched: Vec<String> = match config_path {
            Some(path) => vec![path.display().to_string()],
            None => default_config_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        };

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({ "searched": searched });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                for path in searched {
                    let marker = if Path::new(&path).exists() { "*" } else { " " };
                    println!("{marker} {path}");
                }
            }
        }

        Ok(())
    }
}
