pub mod app;
pub mod community;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod state;
pub mod stats;
pub mod store;
pub mod templates;
pub mod ui;
pub mod webhook;

pub use app::router;
pub use config::Config;
pub use repository::HabitRepository;
pub use state::AppState;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
