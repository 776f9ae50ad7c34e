//! Bootstrap module for wiring a CineWatch instance
//!
//! This module handles:
//! - Configuration loading
//! - Service initialization and dependency injection

pub mod config;
pub mod services;

pub use config::load_config;
pub use services::{init_services, Services};
