//! Core library for the role-based job board service.

pub mod board;
pub mod config;
pub mod error;
pub mod telemetry;
