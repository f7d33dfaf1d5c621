//! 统一配置管理模块
//!
//! 配置在进程入口处加载一次，之后以值的形式传入各组件，不支持热更新。
//! 合并顺序：默认值 → TOML 文件 → `DEVINFO__` 前缀环境变量 → `HOST`/`PORT`/`DEBUG`。

pub mod loader;
pub mod sources;
pub mod traits;

pub use loader::ConfigLoader;
pub use sources::{ConfigLoadOptions, ConfigSource};
pub use traits::ComponentConfig;

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, ENV_PREFIX};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];

/// 服务配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DevinfoConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 只有大小写不敏感的 "true" 视为开启
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub debug: bool,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default)]
    pub log_no_ansi: bool,
}

impl Default for DevinfoConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            log_no_ansi: false,
        }
    }
}

impl DevinfoConfig {
    /// 从指定路径或当前目录中的 devinfo.toml 加载配置，并叠加环境变量
    pub fn load_config(path: Option<&Path>) -> Result<Self> {
        Self::loader(path).load()
    }

    /// 构建服务配置加载器；显式指定的文件不存在时报错
    pub fn loader(path: Option<&Path>) -> ConfigLoader {
        let (file, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Path::new(CONFIG_FILE_NAME).to_path_buf(), false),
        };

        ConfigLoader::new()
            .with_options(ConfigLoadOptions::default().with_fail_on_missing_file(explicit))
            .add_source(ConfigSource::Defaults)
            .add_source(ConfigSource::File(file))
            .add_source(ConfigSource::Env {
                prefix: ENV_PREFIX.to_string(),
            })
            .add_source(ConfigSource::RawEnv(vec!["HOST", "PORT", "DEBUG"]))
    }

    /// 叠加命令行参数，优先级高于所有配置源
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>, debug: bool) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if debug {
            self.debug = true;
        }
        self
    }

    /// 监听地址（IPv6 字面量自动加方括号）
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// 实际生效的日志级别：debug 模式强制为 debug
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.telemetry.log_level
        }
    }
}

impl ComponentConfig for DevinfoConfig {
    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(CoreError::config_error("host must not be empty"));
        }

        if self.port == 0 {
            return Err(CoreError::config_error("port must be greater than 0"));
        }

        let level = self.telemetry.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(CoreError::config_error(format!(
                "Invalid log level: {}",
                self.telemetry.log_level
            )));
        }

        let format = self.telemetry.log_format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(CoreError::config_error(format!(
                "Invalid log format: {}",
                self.telemetry.log_format
            )));
        }

        Ok(())
    }

    fn summary(&self) -> BTreeMap<String, String> {
        let mut summary = BTreeMap::new();
        summary.insert("bind_address".to_string(), self.bind_address());
        summary.insert("debug".to_string(), self.debug.to_string());
        summary.insert(
            "log_level".to_string(),
            self.effective_log_level().to_string(),
        );
        summary.insert("log_format".to_string(), self.telemetry.log_format.clone());
        summary
    }
}

/// 接受布尔值或字符串；其他取值一律视为关闭
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        Flag::Other(_) => false,
    })
}

// --- Default value functions ---

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_from_toml(content: &str) -> Result<DevinfoConfig> {
        ConfigLoader::new()
            .add_source(ConfigSource::Defaults)
            .add_source(ConfigSource::TomlString(content.to_string()))
            .load()
    }

    #[test]
    fn test_defaults() {
        let cfg = load_from_toml("").unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert!(!cfg.debug);
        assert_eq!(cfg.telemetry.log_level, "info");
        assert_eq!(cfg.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "host = \"127.0.0.1\"\nport = 8080\n\n[telemetry]\nlog_format = \"json\""
        )
        .unwrap();

        let cfg: DevinfoConfig = ConfigLoader::new()
            .add_source(ConfigSource::Defaults)
            .add_source(ConfigSource::File(file.path().to_path_buf()))
            .load()
            .unwrap();

        assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
        assert_eq!(cfg.telemetry.log_format, "json");
        assert_eq!(cfg.telemetry.log_level, "info");
    }

    #[test]
    fn test_debug_flag_accepts_strings() {
        assert!(load_from_toml("debug = \"True\"").unwrap().debug);
        assert!(load_from_toml("debug = \"true\"").unwrap().debug);
        assert!(load_from_toml("debug = true").unwrap().debug);
        assert!(!load_from_toml("debug = \"yes\"").unwrap().debug);
        assert!(!load_from_toml("debug = 1").unwrap().debug);
    }

    #[test]
    fn test_debug_forces_debug_log_level() {
        let cfg = load_from_toml("debug = true\n[telemetry]\nlog_level = \"warn\"").unwrap();
        assert_eq!(cfg.effective_log_level(), "debug");
        assert_eq!(cfg.summary().get("log_level").unwrap(), "debug");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for content in [
            "port = 0",
            "[telemetry]\nlog_level = \"loud\"",
            "port = \"abc\"",
            "unknown_key = 1",
        ] {
            let err = load_from_toml(content).unwrap_err();
            assert!(matches!(err, CoreError::Config { .. }), "{}: {}", content, err);
        }
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = DevinfoConfig::loader(Some(Path::new("/definitely/not/here.toml")))
            .load::<DevinfoConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_env_layers_override_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                CONFIG_FILE_NAME,
                "host = \"10.0.0.1\"\nport = 7000\n[telemetry]\nlog_level = \"warn\"",
            )?;
            jail.set_env("DEVINFO__PORT", "7100");
            jail.set_env("DEVINFO__TELEMETRY__LOG_LEVEL", "error");
            jail.set_env("PORT", "9000");
            jail.set_env("DEBUG", "True");

            let cfg = DevinfoConfig::load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.host, "10.0.0.1");
            assert_eq!(cfg.port, 9000);
            assert!(cfg.debug);
            assert_eq!(cfg.telemetry.log_level, "error");
            assert_eq!(cfg.effective_log_level(), "debug");
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(CONFIG_FILE_NAME, "port = 7000\ndebug = true")?;
            jail.set_env("DEVINFO__PORT", "7100");
            jail.set_env("DEVINFO__DEBUG", "false");

            let cfg = DevinfoConfig::load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.port, 7100);
            assert!(!cfg.debug);
            Ok(())
        });
    }

    #[test]
    fn test_plain_debug_env_requires_true() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DEBUG", "1");
            let cfg = DevinfoConfig::load_config(None).map_err(|e| e.to_string())?;
            assert!(!cfg.debug);

            jail.set_env("DEBUG", "TRUE");
            let cfg = DevinfoConfig::load_config(None).map_err(|e| e.to_string())?;
            assert!(cfg.debug);
            Ok(())
        });
    }

    #[test]
    fn test_command_line_overrides_everything() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(CONFIG_FILE_NAME, "host = \"10.0.0.1\"\nport = 7000")?;
            jail.set_env("PORT", "9000");
            jail.set_env("HOST", "192.168.1.1");

            let cfg = DevinfoConfig::load_config(None)
                .map_err(|e| e.to_string())?
                .with_overrides(Some("127.0.0.1".to_string()), Some(8081), true);
            assert_eq!(cfg.bind_address(), "127.0.0.1:8081");
            assert!(cfg.debug);

            let untouched = DevinfoConfig::load_config(None)
                .map_err(|e| e.to_string())?
                .with_overrides(None, None, false);
            assert_eq!(untouched.bind_address(), "192.168.1.1:9000");
            assert!(!untouched.debug);
            Ok(())
        });
    }

    #[test]
    fn test_env_text_keeps_numeric_looking_values() {
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Account {
            #[serde(default)]
            id: String,
            #[serde(default)]
            count: u32,
        }
        impl ComponentConfig for Account {}

        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ACCT__ID", "0042");
            jail.set_env("ACCT__COUNT", "3");

            let account: Account = ConfigLoader::new()
                .add_source(ConfigSource::Defaults)
                .add_source(ConfigSource::Env {
                    prefix: "ACCT__".to_string(),
                })
                .add_source(ConfigSource::EnvText {
                    prefix: "ACCT__".to_string(),
                    keys: vec!["id"],
                })
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(account.id, "0042");
            assert_eq!(account.count, 3);
            Ok(())
        });
    }

    #[test]
    fn test_ipv6_bind_address() {
        let cfg = DevinfoConfig {
            host: "::".to_string(),
            ..DevinfoConfig::default()
        };
        assert_eq!(cfg.bind_address(), "[::]:5000");
    }
}
