pub mod config;
pub mod db;
pub mod password;

pub use config::{AppConfig, RuntimeMode};
