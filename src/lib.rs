pub mod auth;
pub mod config;
pub mod redirect;
pub mod report;
