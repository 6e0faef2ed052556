//! Application layer: group registration and the scan service.

pub mod registry;
pub mod service;

pub use registry::GroupRegistry;
pub use service::Fusion;
