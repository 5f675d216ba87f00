pub mod config;
pub mod error;
pub mod services;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::{AppError, Result};
pub use services::conversation::{
    ConversationService, CostSource, Summarizer, WELCOME_TEXT, welcome_reply,
};
pub use services::AppServices;
pub use state::AppState;
