pub mod config;
pub mod settings;
pub mod types;

pub use config::Config;
pub use settings::{PasswordChange, PasswordError, SettingsError, UserSettings};
pub use types::*;
