pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, LogConfig, SchedulerConfig, load_dotenv};
pub use error::*;
pub use logging::init_tracing;
