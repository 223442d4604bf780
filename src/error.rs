//! 全局错误类型定义
use thiserror::Error;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use stigcheck_engine::CoreError;

#[derive(Error, Debug)]
pub enum StigError {
    // 金标准相关错误
    #[error("Golden baseline load failed: {0}")]
    BaselineLoadError(String),

    // 设备输出相关错误
    #[error("Device capture load failed: {0}")]
    CaptureLoadError(String),

    // 配置错误
    #[error("Invalid audit config: {0}")]
    ConfigError(String),

    // 内核错误（基线格式 / 规则编译 / 无效输入）
    #[error(transparent)]
    Core(#[from] CoreError),

    // 序列化/反序列化错误
    #[error("JSON error: {0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO error: {0}")]
    IoError(#[from] IoError),

    #[error("Async task failed: {0}")]
    AsyncTaskError(String),
}

// 全局Result类型
pub type StigResult<T> = Result<T, StigError>;
