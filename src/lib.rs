//! Rig dashboard - live monitoring and control of the humidity rig
//!
//! This library exposes the core modules for testing and reuse.

pub mod backend;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod devices;
pub mod diagram;
pub mod error;
pub mod plot;
pub mod routes;
pub mod surface;
pub mod sync;
