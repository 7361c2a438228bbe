use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::process::Command;

use gym_coach::config::Config;

use crate::context::load_config;

fn config_file(config_path: Option<&str>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(PathBuf::from(path)),
        None => Config::config_file(),
    }
}

fn mask(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let visible: String = token.chars().take(6).collect();
    format!("{}...", visible)
}

pub async fn show_config(config_path: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.auth.id_token = mask(&config.auth.id_token);
    config.auth.refresh_token = mask(&config.auth.refresh_token);
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    if let Some(path) = config.path() {
        println!("{}", path.display().to_string().dimmed());
    }
    println!();
    println!("{}", config_str);

    Ok(())
}

pub async fn edit_config(config_path: Option<&str>) -> Result<()> {
    let config_file = config_file(config_path)?;

    if !config_file.exists() {
        Config::load_from(&config_file)?.save()?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    Command::new(&editor)
        .arg(&config_file)
        .status()
        .with_context(|| format!("Failed to launch {}", editor))?;

    Config::load_from(&config_file).context("Edited configuration is invalid")?;
    println!("{} Configuration saved!", "✓".green());

    Ok(())
}

pub async fn init_config(config_path: Option<&str>, force: bool) -> Result<()> {
    let config_file = config_file(config_path)?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(&config_file)?;

    println!("{} Configuration initialized at: {}", "✓".green(), config_file.display());
    println!();
    println!("Set firebase.project_id and firebase.api_key with: gym-coach config edit");

    Ok(())
}
