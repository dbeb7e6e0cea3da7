pub mod config;
pub mod error;
pub mod feeds;
pub mod fetch;
pub mod logging;
pub mod notify;
pub mod ui;

pub use config::Config;
pub use error::{FeedError, FetchError};
pub use fetch::JsonClient;
