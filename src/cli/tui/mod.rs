/// Terminal User Interface module for the interactive wizard
pub mod wizard;

use crate::backend::Backends;
use crate::config::Config;
use crate::wizard::CreationResult;
use crate::Result;

/// Run the interactive wizard; returns the last creation result, if any run reached one
pub async fn run_wizard(backends: Backends, config: Config) -> Result<Option<CreationResult>> {
    wizard::run(backends, config).await
}
