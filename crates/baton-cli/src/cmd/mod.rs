pub mod classify;
pub mod config;
pub mod history;
pub mod init;
pub mod issue;
pub mod plan;
pub mod run;
pub mod status;
