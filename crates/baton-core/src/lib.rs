pub mod classifier;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod executor;
pub mod handler;
pub mod history;
pub mod io;
pub mod issues;
pub mod paths;
pub mod planner;
pub mod report;
pub mod request;
pub mod shell;
pub mod snapshot;
pub mod types;

pub use error::{BatonError, Result};
