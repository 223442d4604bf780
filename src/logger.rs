//! 日志初始化
//! 库内部只使用 `log` 门面，由调用方决定输出后端

/// CLI 使用的 env_logger 初始化（RUST_LOG 优先，否则使用默认级别）
#[cfg(feature = "cli")]
pub fn init_env_logger(default_filter: &str) {
    use env_logger::{Builder, Env, Target};

    let _ = Builder::from_env(Env::default().default_filter_or(default_filter))
        .target(Target::Stderr)
        .try_init();
}

/// 将 `log` 记录转发到 tracing（调用方自行安装 subscriber）
#[cfg(feature = "tracing")]
pub fn init_log_tracer() -> crate::error::StigResult<()> {
    tracing_log::LogTracer::init()
        .map_err(|e| crate::error::StigError::ConfigError(format!("log tracer init failed: {}", e)))?;
    tracing::debug!("log records forwarded to tracing");
    Ok(())
}
