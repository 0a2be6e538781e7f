pub mod agent;
pub mod auth;
pub mod config;
pub mod domain;
pub mod mail;
pub mod notify;
pub mod render;
pub mod session;
pub mod terminal;
