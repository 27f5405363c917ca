//! # Bookings API Library
//!
//! This library provides the core functionality for the Bookings API
//! service: the scheduling engine, handlers, models, and server
//! configuration.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod repositories;
pub mod scheduling;
pub mod server;
pub mod telemetry;
pub use migration;
