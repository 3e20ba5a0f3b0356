use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::paths;
use crate::ui;
use anyhow::Result;

pub fn run(_ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(),
        ConfigCommand::Dir => dir(),
    }
}

fn show() -> Result<()> {
    ui::header("Configuration");

    let file = paths::config_file()?;
    ui::kv("Config file", &file.display().to_string());
    if !file.exists() {
        ui::dim("Not found, using defaults");
    }

    let config = Config::load()?;
    ui::kv("Output directory", &config.output_dir().display().to_string());
    ui::kv(
        "API key",
        if config.api_key_from_env().is_some() {
            "set"
        } else {
            "not set (will be prompted)"
        },
    );
    ui::dim(&format!("read from ${}", config.api_key_env));

    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}

fn dir() -> Result<()> {
    println!("{}", paths::config_dir()?.display());
    Ok(())
}
