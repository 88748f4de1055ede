pub mod config;
pub mod errors;
pub mod export;
pub mod flow;
pub mod logging;
pub mod phase;
pub mod sanitize;
pub mod submit;
pub mod ui;
