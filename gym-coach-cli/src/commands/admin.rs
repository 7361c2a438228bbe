use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use gym_coach::models::UserProfile;
use gym_coach::router::Screen;
use gym_coach::screens::admin::{self, overview};
use gym_coach::screens::auth::RegisterForm;
use gym_coach::screens::{Alert, ListState};

use super::report;
use crate::context::{load_config, AppContext};

fn print_profiles(title: &str, state: &ListState<UserProfile>) {
    println!();
    println!("{}", title.bold());
    match state {
        ListState::Populated(profiles) => {
            for profile in profiles {
                let extra = if profile.students.is_empty() {
                    String::new()
                } else {
                    format!(" ({} students)", profile.students.len())
                };
                println!("  {:<30} {}{}", profile.label(), profile.id.dimmed(), extra);
            }
        }
        ListState::Empty { message } => println!("  {}", message.dimmed()),
        ListState::Unauthenticated => println!("  {}", "User not authenticated.".red()),
        ListState::Loading => {}
    }
}

#[derive(Args)]
pub struct OverviewCommand {}

impl OverviewCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        context.require(Screen::AdminDashboard).await?;

        let overview = overview(context.store(), context.collections()).await;

        println!("Gym overview");
        println!("────────────────────────────────");
        print_profiles("Trainers", &overview.trainers);
        print_profiles("Students", &overview.students);

        let unassigned = overview.unassigned_students();
        if !unassigned.is_empty() {
            println!();
            println!("{}", "Unassigned students".yellow());
            for student in unassigned {
                println!("  {:<30} {}", student.label(), student.id.dimmed());
            }
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct RegisterTrainerCommand {}

impl RegisterTrainerCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        context.require(Screen::RegisterTrainer).await?;

        println!("Register a trainer");
        println!();

        let name: String = Input::new().with_prompt("Trainer name").interact_text()?;
        let email: String = Input::new().with_prompt("Trainer email").interact_text()?;
        let password = Password::new()
            .with_prompt("Initial password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?;

        let form = RegisterForm {
            name,
            email,
            password,
        };
        let result = admin::register_trainer(
            context.auth(),
            context.store(),
            context.collections(),
            &form,
        )
        .await;
        report(Alert::from_result("Register trainer", "Trainer registered.", &result))?;

        if let Ok(profile) = result {
            println!("  ID: {}", profile.id.dimmed());
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct AssignCommand {
    /// Trainer ID
    trainer: String,

    /// Student ID
    student: String,
}

impl AssignCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        context.require(Screen::AssignStudent).await?;

        let result = admin::assign_student(
            context.store(),
            context.collections(),
            &self.trainer,
            &self.student,
        )
        .await;
        let message = match &result {
            Ok(false) => "Student was already assigned to this trainer.",
            _ => "Student assigned.",
        };
        report(Alert::from_result("Assign student", message, &result))
    }
}
