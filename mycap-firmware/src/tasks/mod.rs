//! Embassy async tasks

pub mod service;

pub use service::{service_task, ServiceResources};
