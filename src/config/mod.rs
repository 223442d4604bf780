pub mod audit;

pub use audit::{AuditConfig, CustomConfigBuilder};
