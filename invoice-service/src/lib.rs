pub mod config;
pub mod document;
pub mod error;
pub mod handlers;
pub mod invoice;
pub mod models;
pub mod services;
pub mod startup;
