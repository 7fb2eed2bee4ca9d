pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{Config, ThemeName, CONFIG_TEMPLATE, MAX_RECENT_TEMPLATES, MAX_TIMEOUT_SECS};
