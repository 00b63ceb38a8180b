// Core modules
pub mod cli;
pub mod config;
pub mod core;
pub mod models;
pub mod storage;

// Service layers
pub mod api;
pub mod infrastructure;
pub mod review;
