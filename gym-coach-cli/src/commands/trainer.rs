use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use colored::Colorize;
use dialoguer::{Input, Select};

use gym_coach::models::InjuryStatus;
use gym_coach::router::Screen;
use gym_coach::screens::manage_routines::{self, parse_exercise, RoutineDraft};
use gym_coach::screens::record_injury::{self, InjuryForm};
use gym_coach::screens::trainer::{dashboard, load_students};
use gym_coach::screens::{Alert, ListState};
use gym_coach::AppError;

use super::report;
use crate::context::{load_config, AppContext};

/// Pick one of the trainer's students when `--student` was not given
async fn pick_student(
    context: &AppContext,
    trainer_id: Option<&str>,
    given: Option<String>,
) -> Result<Option<String>> {
    if given.is_some() {
        return Ok(given);
    }

    let students = match load_students(context.store(), context.collections(), trainer_id).await {
        Ok(students) => students,
        Err(e) => {
            report(Alert::failure("Students", &e))?;
            return Ok(None);
        }
    };
    if students.is_empty() {
        println!("{}", "No students assigned yet.".dimmed());
        return Ok(None);
    }

    let labels: Vec<&str> = students.iter().map(|s| s.label.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Student")
        .items(&labels)
        .default(0)
        .interact_opt()?;

    Ok(selection.map(|index| students[index].id.clone()))
}

#[derive(Args)]
pub struct StudentsCommand {}

impl StudentsCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let route = context.require(Screen::TrainerDashboard).await?;

        let state = dashboard(context.store(), context.collections(), route.user_id()).await;

        println!("Your students");
        println!("────────────────────────────────");
        match state {
            ListState::Populated(students) => {
                for student in students {
                    println!("  {:<30} {}", student.label, student.id.dimmed());
                }
            }
            ListState::Empty { message } => println!("{}", message.dimmed()),
            ListState::Unauthenticated => println!("{}", "User not authenticated.".red()),
            ListState::Loading => {}
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct RecordInjuryCommand {
    /// Student the injury belongs to (picked from your list when omitted)
    #[arg(long)]
    student: Option<String>,

    /// Injury description (prompted when omitted)
    #[arg(short, long)]
    description: Option<String>,

    /// Trainer notes
    #[arg(short, long)]
    notes: Option<String>,
}

impl RecordInjuryCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let route = context.require(Screen::RecordInjury).await?;

        let student = pick_student(&context, route.user_id(), self.student).await?;
        let description = match self.description {
            Some(description) => description,
            None => Input::new()
                .with_prompt("Injury description")
                .allow_empty(true)
                .interact_text()?,
        };
        let notes = match self.notes {
            Some(notes) => notes,
            None => Input::new()
                .with_prompt("Trainer notes")
                .allow_empty(true)
                .interact_text()?,
        };

        let mut form = InjuryForm::new(student.as_deref(), &description, &notes);
        let result = record_injury::submit(
            context.store(),
            context.collections(),
            &mut form,
            Utc::now(),
        )
        .await;
        report(Alert::from_result("Record injury", "Injury recorded.", &result))?;

        if let Ok(id) = result {
            println!("  ID: {}", id.dimmed());
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Active,
    Resolved,
}

impl From<StatusArg> for InjuryStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => InjuryStatus::Active,
            StatusArg::Resolved => InjuryStatus::Resolved,
        }
    }
}

#[derive(Args)]
pub struct InjuryStatusCommand {
    /// Student the injury belongs to
    student: String,

    /// Injury ID, as shown by 'gym-coach injuries --student'
    injury_id: String,

    /// New status
    #[arg(value_enum)]
    status: StatusArg,
}

impl InjuryStatusCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        context.require(Screen::RecordInjury).await?;

        let status = InjuryStatus::from(self.status);
        let result = record_injury::update_injury_status(
            context.store(),
            context.collections(),
            &self.student,
            &self.injury_id,
            &status,
        )
        .await;

        report(Alert::from_result(
            "Injury status",
            &format!("Injury marked as {}.", status),
            &result,
        ))
    }
}

#[derive(Args)]
pub struct CreateRoutineCommand {
    /// Student the routine is for (picked from your list when omitted)
    #[arg(long)]
    student: Option<String>,

    /// Routine name
    #[arg(short, long)]
    name: Option<String>,

    /// Exercise as name:sets:reps[:weight[:area]], repeatable
    #[arg(short, long = "exercise")]
    exercises: Vec<String>,
}

impl CreateRoutineCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let route = context.require(Screen::ManageRoutines).await?;

        let student_id = pick_student(&context, route.user_id(), self.student).await?;
        let name = match self.name {
            Some(name) => name,
            None => Input::new()
                .with_prompt("Routine name")
                .allow_empty(true)
                .interact_text()?,
        };

        let mut draft = RoutineDraft {
            student_id,
            name,
            ..RoutineDraft::default()
        };

        for raw in &self.exercises {
            match parse_exercise(raw) {
                Ok(exercise) => draft.add_exercise(exercise),
                Err(e) => return report(Alert::failure("Create routine", &AppError::from(e))),
            }
        }

        let result = manage_routines::create_routine(
            context.store(),
            context.collections(),
            &mut draft,
            Utc::now(),
        )
        .await;
        report(Alert::from_result("Create routine", "Routine created.", &result))?;

        if let Ok(id) = result {
            println!("  ID: {}", id.dimmed());
        }
        Ok(())
    }
}
