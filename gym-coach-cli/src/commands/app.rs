use anyhow::Result;
use clap::Args;

use gym_coach::screens::settings;

use crate::context::{load_config, AppContext};
use crate::ui::{App, Dashboard, Loader};

#[derive(Args)]
pub struct AppCommand {}

impl AppCommand {
    pub async fn execute(self, config_path: Option<&str>) -> Result<()> {
        let context = AppContext::connect(load_config(config_path)?)?;
        let state = context.settled().await?;
        let route = gym_coach::router::route(&state);
        tracing::info!("Launching the {} screens", route);

        let (loader, loads) = Loader::new(
            context.session().store().clone(),
            context.collections().clone(),
            context.config.ui.date_format.clone(),
            context.config.progress.window_weeks,
        );
        let app = App::new(route, settings::view(&state), loader);

        let mut dashboard = Dashboard::new(app, loads)?;
        let result = dashboard.run();
        dashboard.cleanup()?;

        result
    }
}
