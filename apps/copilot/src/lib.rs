pub mod api_client;
pub mod config;
pub mod errors;
pub mod flows;
pub mod format;
pub mod models;
pub mod state;
pub mod storage;
