//! stigcheck - Cisco IOS 配置 STIG 合规检查

pub mod auditor;
pub mod baseline;
pub mod capture;
pub mod config;
pub mod error;
pub mod logger;
#[cfg(feature = "cli")]
pub mod cli;

// 导出全局错误类型
pub use self::error::{StigError, StigResult};

// 导出配置模块核心结构体与构建器
pub use crate::config::{AuditConfig, CustomConfigBuilder};

// 导出加载与审计接口
pub use crate::auditor::{AuditSummary, ComplianceAuditor};
pub use crate::baseline::load_golden;
pub use crate::capture::{load_capture_dir, load_device, load_transcript};
#[cfg(feature = "async-io")]
pub use crate::baseline::load_golden_async;
#[cfg(feature = "async-io")]
pub use crate::capture::{load_capture_dir_async, load_device_async};

// 内核常用类型
pub use stigcheck_engine::{
    ComplianceReport, DeviceOutput, DiffOutcome, GoldenBaseline, LineVerdict, RuleParams,
};
