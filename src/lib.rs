pub mod block;
pub mod config;
pub mod diff;
pub mod error;
pub mod installer;
pub mod loader;
pub mod logging;
pub mod orchestrator;
pub mod repo;
pub mod script;
pub mod status;

pub use error::HookError;
pub use installer::{HookInstaller, HookState, InstallOutcome, UninstallOutcome};
pub use script::HookKind;
