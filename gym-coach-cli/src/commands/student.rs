use anyhow::Result;
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use gym_coach::models::BodyArea;
use gym_coach::progress::{area_series, total_series, MAX_WINDOW_WEEKS};
use gym_coach::router::{Route, Screen};
use gym_coach::screens::injuries::InjuriesScreen;
use gym_coach::screens::progress::ProgressScreen;
use gym_coach::screens::routines::RoutinesScreen;
use gym_coach::screens::{load, resolve_owner, ListState};

use crate::context::{load_config, AppContext};

/// Resolve whose records to show. Students see their own; trainers pass
/// `--student` from the routine and injury screens.
async fn owner(context: &AppContext, student: Option<&str>, own: Screen) -> Result<Option<String>> {
    let route = match student {
        Some(_) => {
            let route = context.route().await?;
            if !matches!(route, Route::Trainer { .. } | Route::Admin { .. }) {
                anyhow::bail!("Only trainers and administrators can view another student.");
            }
            route
        }
        None => context.require(own).await?,
    };

    tracing::debug!("Resolving owner in the {} tree", route);
    Ok(resolve_owner(&context.session().state(), student))
}

fn print_state<T>(state: &ListState<T>, mut print: impl FnMut(&T)) {
    match state {
        ListState::Loading => println!("Loading..."),
        ListState::Unauthenticated => println!("{}", "User not authenticated.".red()),
        ListState::Empty { message } => println!("{}", message.dimmed()),
        ListState::Populated(items) => items.iter().for_each(&mut print),
    }
}

#[derive(Args)]
pub struct RoutinesCommand {
    /// Student whose routines to show (trainers)
    #[arg(long)]
    student: Option<String>,
}

impl RoutinesCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let owner = owner(&context, self.student.as_deref(), Screen::Routines).await?;

        let screen = RoutinesScreen::new(context.config.ui.date_format.clone());
        let state = load(&screen, context.store(), context.collections(), owner.as_deref()).await;

        println!("Routines");
        println!("────────────────────────────────");
        print_state(&state, |routine| {
            println!();
            println!("{} (from {})", routine.name.bold(), routine.start_date);
            if routine.exercises.is_empty() {
                println!("  {}", "No exercises".dimmed());
            }
            for exercise in &routine.exercises {
                println!("  • {}", exercise.summary());
            }
        });

        Ok(())
    }
}

#[derive(Args)]
pub struct ProgressCommand {
    /// Reporting window in weeks (defaults to the configured window)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_WEEKS))
    )]
    weeks: Option<u32>,
}

impl ProgressCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let owner = owner(&context, None, Screen::Progress).await?;

        let weeks = self.weeks.unwrap_or(context.config.progress.window_weeks);
        let screen = ProgressScreen::new(Utc::now(), weeks);
        let state = load(&screen, context.store(), context.collections(), owner.as_deref()).await;

        println!("Progress (last {} weeks)", weeks);
        println!("────────────────────────────────");

        let buckets = state.items();
        if buckets.is_empty() {
            print_state(&state, |_| {});
            return Ok(());
        }

        println!("{:<10} {:>10} {:>10} {:>10} {:>10}", "", "Legs", "Cardio", "Strength", "Total");
        for bucket in buckets {
            println!(
                "{:<10} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
                bucket.label(),
                bucket.volume(&BodyArea::Legs),
                bucket.volume(&BodyArea::Cardio),
                bucket.volume(&BodyArea::Strength),
                bucket.total
            );
        }

        print_bars("Total", &total_series(buckets));
        for area in [BodyArea::Cardio, BodyArea::Strength] {
            print_bars(&area.to_string(), &area_series(buckets, &area));
        }

        Ok(())
    }
}

/// One bar per week, scaled to the largest value of the series
fn print_bars(title: &str, series: &[(String, f64)]) {
    let max = series.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return;
    }

    println!();
    println!("{}", title.bold());
    for (label, value) in series {
        let width = ((value / max) * 30.0).round() as usize;
        println!("{:<10} {}", label, "█".repeat(width).green());
    }
}

#[derive(Args)]
pub struct InjuriesCommand {
    /// Student whose injuries to show (trainers)
    #[arg(long)]
    student: Option<String>,
}

impl InjuriesCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let owner = owner(&context, self.student.as_deref(), Screen::Injuries).await?;

        let screen = InjuriesScreen::new(context.config.ui.date_format.clone());
        let state = load(&screen, context.store(), context.collections(), owner.as_deref()).await;

        println!("Injuries");
        println!("────────────────────────────────");
        print_state(&state, |injury| {
            println!();
            println!("{} [{}] {}", injury.date, injury.status.yellow(), injury.description.bold());
            println!("  Notes: {}", injury.notes);
            println!("  ID:    {}", injury.id.dimmed());
        });

        Ok(())
    }
}
