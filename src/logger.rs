use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别，
/// 未设置时使用 `default_level`（通常来自 `HarnessConfig::log_level`）。
///
/// 重复调用是安全的：已经安装过订阅者时直接返回。
///
/// 示例:
/// - RUST_LOG=debug cargo test
/// - RUST_LOG=caseflow=trace cargo test
pub fn init_logger(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Logger initialized");
    }
}
