use anyhow::Result;
use clap::{Args, ValueEnum};
use jellyplayer_config::ConfigLoad;
use serde_json::json;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long, value_enum, default_value = "toml")]
    pub format: OutputFormat,
}

pub fn run(args: ConfigArgs, load: &ConfigLoad) -> Result<()> {
    match args.format {
        OutputFormat::Toml => {
            println!("# source: {}", load.source);
            for warning in load.warnings.iter() {
                println!("# warning: {}", warning.message);
            }
            print!("{}", load.config.to_toml()?);
        }
        OutputFormat::Json => {
            let warnings: Vec<&str> = load
                .warnings
                .iter()
                .map(|warning| warning.message.as_str())
                .collect();
            let doc = json!({
                "source": load.source.to_string(),
                "warnings": warnings,
                "config": load.config,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}
