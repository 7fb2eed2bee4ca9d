pub mod paths;

pub use paths::WizardPaths;
