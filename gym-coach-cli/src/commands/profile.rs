use anyhow::Result;
use colored::Colorize;

use gym_coach::router::Screen;
use gym_coach::screens::settings;
use gym_coach::screens::Alert;

use super::report;
use crate::context::{load_config, AppContext};

pub async fn show_profile(config_path: Option<&str>) -> Result<()> {
    let context = AppContext::connect(load_config(config_path)?)?;
    context.require(Screen::Settings).await?;

    let state = context.session().state();
    let Some(view) = settings::view(&state) else {
        anyhow::bail!("Profile not loaded");
    };

    println!("Profile");
    println!("────────────────────────────────");
    println!("  Name:   {}", view.name.bold());
    println!("  Email:  {}", view.email);
    println!("  Role:   {}", view.role);

    if let Some(profile) = state.profile() {
        if !profile.students.is_empty() {
            println!("  Students: {}", profile.students.len());
        }
    }

    Ok(())
}

pub async fn set_name(config_path: Option<&str>, name: &str) -> Result<()> {
    let context = AppContext::connect(load_config(config_path)?)?;
    context.require(Screen::Settings).await?;

    let state = context.session().state();
    let result = settings::update_display_name(
        context.store(),
        context.collections(),
        state.uid(),
        name,
    )
    .await;
    report(Alert::from_result("Profile", "Display name updated.", &result))
}
