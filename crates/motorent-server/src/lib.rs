pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod mq;
pub mod storage;

pub use config::MotorentConfig;
pub use error::{MotorentError, Result};
