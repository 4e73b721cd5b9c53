pub mod autosave;
pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod repo;
pub mod seed;
pub mod stats;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use models::{DaySummary, Goal, JournalEntry, LifeArea, Project, Task};
pub use seed::seed;
pub use utils::Profile;
