//! stigcheck-engine 内核错误定义
//! 内核层只处理已读取的文本，不涉及设备连接/文件读写错误
use thiserror::Error;

use regex::Error as RegexError;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 基线相关错误 =====================
    /// 基线格式错误（JSON 无法解析 / 结构不符合 `{ "sections": {...} }`）
    #[error("Baseline format error: {0}")]
    BaselineFormatError(String),

    // ===================== 规则相关错误 =====================
    /// 规则正则编译失败（规则参数拼接后语法非法）
    #[error("Regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // ===================== 内核基础错误 =====================
    /// 无效输入参数
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
