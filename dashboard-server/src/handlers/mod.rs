//! HTTP handlers

pub mod health;
pub mod auth;
pub mod ml;
pub mod companies;
