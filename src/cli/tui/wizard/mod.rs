//! Interactive repository wizard

pub mod app;
pub mod events;
pub mod screens;
pub mod theme;

use crate::backend::Backends;
use crate::config::Config;
use crate::wizard::CreationResult;
use crate::Result;

pub use app::App;

/// Run the wizard in the terminal until the user quits
pub async fn run(backends: Backends, config: Config) -> Result<Option<CreationResult>> {
    let app = App::new(backends, &config);
    app.run().await
}
