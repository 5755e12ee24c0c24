//! Nutrition insights service: meal logging, user targets and windowed nutrition analysis.

pub mod analysis;
pub mod app;
pub mod auth;
pub mod config;
pub mod meals;
pub mod nutrition;
pub mod preferences;
pub mod state;
