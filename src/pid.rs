// src/pid.rs

//! # PID Control Module
//!
//! This module provides the controller configuration, the fixed-point
//! controller itself, and the telemetry sinks it reports through.

pub mod config;
pub use config::*;
pub mod controller;
pub use controller::*;
pub mod telemetry;
pub use telemetry::*;
