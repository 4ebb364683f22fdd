// src/config/mod.rs
//! Runtime configuration: credentials and paths from the environment, monitored
//! targets from a config file or the built-in seed lists.

pub mod settings;
pub mod targets;

pub use settings::{RedditCredentials, Settings, SmtpSettings};
pub use targets::{load_targets, load_targets_from, Targets};
