//! Coastal Engine - Remote imagery processing port
//!
//! This crate defines the port for the remote geospatial processing
//! service (compositing, classification, rendering, export) along with
//! the HTTP adapter implementation.

pub mod client;
pub mod ports;

pub use client::EngineClient;
pub use ports::{ImageryEngine, MapLayer, RemoteTaskId};
