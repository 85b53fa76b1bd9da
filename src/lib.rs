pub mod aggregate;
pub mod config;
pub mod deals;
pub mod infra;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod sink;
pub mod source;
