// 配置相关
pub const CONFIG_FILE_NAME: &str = "devinfo.toml";
pub const ENV_PREFIX: &str = "DEVINFO__"; // e.g. DEVINFO__TELEMETRY__LOG_LEVEL=debug

// 默认监听
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

// 关闭时等待在途请求完成的上限（秒）
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 10;

// 系统信息不可用时的占位值
pub const UNKNOWN_PLACEHOLDER: &str = "unknown";
