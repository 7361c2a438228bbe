use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};

use gym_coach::router::{Route, Screen};
use gym_coach::screens::auth::{self, LoginForm, RegisterForm};
use gym_coach::screens::settings;
use gym_coach::screens::Alert;

use super::report;
use crate::context::{load_config, AppContext};

#[derive(Args)]
pub struct LoginCommand {
    /// Email address (prompted when omitted)
    #[arg(long)]
    email: Option<String>,
}

impl LoginCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        println!("Gym Coach - Login");
        println!();

        let context = AppContext::connect(load_config(config_path)?)?;
        context.require(Screen::Login).await.map_err(|_| {
            anyhow::anyhow!("Already logged in. Use 'gym-coach logout' to switch accounts.")
        })?;

        let email = match self.email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;

        println!();
        println!("Logging in as {}...", email);

        let form = LoginForm { email, password };
        let result = auth::login(context.auth(), &form).await;
        report(Alert::from_result("Login", "Login successful!", &result))?;

        let route = context.signed_in_route().await?;
        println!();
        match route.placeholder() {
            Some(message) => println!("{}", message.yellow()),
            None => println!("Signed in to the {} screens.", route),
        }

        Ok(())
    }
}

#[derive(Args)]
pub struct RegisterCommand {}

impl RegisterCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        println!("Gym Coach - Create account");
        println!();

        let context = AppContext::connect(load_config(config_path)?)?;
        context.require(Screen::Register).await?;

        let name: String = Input::new().with_prompt("Name").interact_text()?;
        let email: String = Input::new().with_prompt("Email").interact_text()?;
        let password = Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()?;

        let form = RegisterForm {
            name,
            email,
            password,
        };
        let result =
            auth::register(context.auth(), context.store(), context.collections(), &form).await;
        report(Alert::from_result("Registration", "Account created!", &result))?;

        println!();
        println!("You can now use the student commands, e.g. 'gym-coach routines'.");
        Ok(())
    }
}

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let config = load_config(config_path)?;

        if !config.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        let context = AppContext::connect(config)?;
        let result = settings::sign_out(context.auth()).await;
        report(Alert::from_result("Logout", "Logged out successfully!", &result))
    }
}

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let config = load_config(config_path)?;

        if !config.is_authenticated() {
            println!("You are not logged in.");
            println!();
            println!("Use 'gym-coach login' to authenticate.");
            return Ok(());
        }

        let context = AppContext::connect(config)?;
        let state = context.settled().await?;
        let route = gym_coach::router::route(&state);

        if let Route::ProfileError(message) = &route {
            println!("{} {}", "✗".red(), message);
            anyhow::bail!("Profile unavailable");
        }

        println!("{} Authenticated as:", "✓".green());
        println!();
        if let Some(view) = settings::view(&state) {
            println!("  Name:     {}", view.name);
            println!("  Email:    {}", view.email);
            println!("  Role:     {}", view.role);
        }
        if let Some(uid) = state.uid() {
            println!("  User ID:  {}", uid);
        }
        if let Some(message) = route.placeholder() {
            println!();
            println!("{}", message.yellow());
        }

        Ok(())
    }
}
