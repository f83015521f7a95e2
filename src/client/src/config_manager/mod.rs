mod config;

pub use config::{ConfigLoader, PublisherDefaults};
