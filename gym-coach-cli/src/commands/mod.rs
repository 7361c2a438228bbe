mod admin;
mod app;
mod auth;
mod config_cmd;
mod profile;
mod student;
mod trainer;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use gym_coach::screens::{Alert, AlertKind};

pub use admin::{AssignCommand, OverviewCommand, RegisterTrainerCommand};
pub use app::AppCommand;
pub use auth::{LoginCommand, LogoutCommand, RegisterCommand, WhoamiCommand};
pub use student::{InjuriesCommand, ProgressCommand, RoutinesCommand};
pub use trainer::{CreateRoutineCommand, InjuryStatusCommand, RecordInjuryCommand, StudentsCommand};

#[derive(Parser)]
#[command(name = "gym-coach")]
#[command(
    about = "Terminal client for students, trainers and gym administrators",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "GYM_COACH_CONFIG")]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login(LoginCommand),

    /// Create a student account
    Register(RegisterCommand),

    /// Log out
    Logout(LogoutCommand),

    /// Show the signed-in user and their role
    Whoami(WhoamiCommand),

    /// Launch the interactive app for your role
    App(AppCommand),

    /// List assigned routines
    Routines(RoutinesCommand),

    /// Show weekly training volume
    Progress(ProgressCommand),

    /// List recorded injuries
    Injuries(InjuriesCommand),

    /// List your assigned students (trainers)
    Students(StudentsCommand),

    /// Record an injury for a student (trainers)
    RecordInjury(RecordInjuryCommand),

    /// Change the status of a recorded injury (trainers)
    InjuryStatus(InjuryStatusCommand),

    /// Create a routine for a student (trainers)
    CreateRoutine(CreateRoutineCommand),

    /// Show trainers and students (administrators)
    Overview(OverviewCommand),

    /// Register a trainer account (administrators)
    RegisterTrainer(RegisterTrainerCommand),

    /// Assign a student to a trainer (administrators)
    Assign(AssignCommand),

    /// Manage your profile
    #[command(subcommand)]
    Profile(ProfileSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ProfileSubcommands {
    /// Show your profile
    Show,

    /// Change your display name
    SetName {
        /// New display name
        name: String,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config = self.config.as_deref();

        match self.command {
            Commands::Login(cmd) => cmd.execute(config).await,
            Commands::Register(cmd) => cmd.execute(config).await,
            Commands::Logout(cmd) => cmd.execute(config).await,
            Commands::Whoami(cmd) => cmd.execute(config).await,
            Commands::App(cmd) => cmd.execute(config).await,
            Commands::Routines(cmd) => cmd.execute(config).await,
            Commands::Progress(cmd) => cmd.execute(config).await,
            Commands::Injuries(cmd) => cmd.execute(config).await,
            Commands::Students(cmd) => cmd.execute(config).await,
            Commands::RecordInjury(cmd) => cmd.execute(config).await,
            Commands::InjuryStatus(cmd) => cmd.execute(config).await,
            Commands::CreateRoutine(cmd) => cmd.execute(config).await,
            Commands::Overview(cmd) => cmd.execute(config).await,
            Commands::RegisterTrainer(cmd) => cmd.execute(config).await,
            Commands::Assign(cmd) => cmd.execute(config).await,
            Commands::Profile(subcmd) => match subcmd {
                ProfileSubcommands::Show => profile::show_profile(config).await,
                ProfileSubcommands::SetName { name } => profile::set_name(config, &name).await,
            },
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config).await,
                ConfigSubcommands::Edit => config_cmd::edit_config(config).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(config, force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Print a write screen's outcome; failures become the command's error
pub(crate) fn report(alert: Alert) -> Result<()> {
    match alert.kind {
        AlertKind::Success => {
            println!("{} {}", "✓".green(), alert.message);
            Ok(())
        }
        AlertKind::Warning => {
            println!("{} {}", "!".yellow(), alert.message);
            anyhow::bail!("{}", alert.title)
        }
        AlertKind::Error => {
            println!("{} {}", "✗".red(), alert.message);
            anyhow::bail!("{} failed", alert.title)
        }
    }
}
