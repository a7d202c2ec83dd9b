//! Core Vortex client library (session lifecycle, API clients, config).

pub mod api;
pub mod auth;
pub mod config;
pub mod theme;
