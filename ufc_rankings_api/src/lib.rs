mod client;
mod errors;
pub mod user_agent;
pub use self::client::{Client, DEFAULT_BASE_URL, DEFAULT_RANKINGS_PATH, DEFAULT_TIMEOUT};
pub use self::errors::Error;
