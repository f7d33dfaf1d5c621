//! 部署配置
//!
//! 合并顺序：默认值 → TOML 文件（默认 `infra.toml`）→ `DEVINFO_INFRA__` 前缀环境变量。

use devinfo_core::config::{ComponentConfig, ConfigLoadOptions, ConfigLoader, ConfigSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{InfraError, Result};

pub const INFRA_CONFIG_FILE: &str = "infra.toml";
pub const INFRA_ENV_PREFIX: &str = "DEVINFO_INFRA__";

/// 字符串键：环境变量中的 `0042`、`123456` 按原文保留
const TEXT_KEYS: [&str; 9] = [
    "yc_token",
    "yc_cloud_id",
    "yc_folder_id",
    "yc_zone",
    "resource_prefix",
    "vm_name",
    "vm_username",
    "ssh_public_key_path",
    "disk_type",
];

/// 敏感配置值：Debug 输出时隐藏
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// 云账号与虚拟机参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InfraConfig {
    #[serde(default)]
    pub yc_token: Secret,
    #[serde(default)]
    pub yc_cloud_id: String,
    #[serde(default)]
    pub yc_folder_id: String,
    #[serde(default = "default_zone")]
    pub yc_zone: String,

    /// 网络、子网、安全组与实例逻辑名的前缀
    #[serde(default = "default_prefix")]
    pub resource_prefix: String,
    #[serde(default = "default_prefix")]
    pub vm_name: String,
    #[serde(default = "default_prefix")]
    pub vm_username: String,
    #[serde(default = "default_ssh_public_key_path")]
    pub ssh_public_key_path: String,

    #[serde(default = "default_instance_cores")]
    pub instance_cores: u32,
    /// 保证的 vCPU 性能百分比
    #[serde(default = "default_core_fraction")]
    pub core_fraction: u32,
    /// GB
    #[serde(default = "default_instance_memory")]
    pub instance_memory: u32,
    /// GB
    #[serde(default = "default_disk_size")]
    pub disk_size: u32,
    #[serde(default = "default_disk_type")]
    pub disk_type: String,
}

impl Default for InfraConfig {
    fn default() -> Self {
        Self {
            yc_token: Secret::default(),
            yc_cloud_id: String::new(),
            yc_folder_id: String::new(),
            yc_zone: default_zone(),
            resource_prefix: default_prefix(),
            vm_name: default_prefix(),
            vm_username: default_prefix(),
            ssh_public_key_path: default_ssh_public_key_path(),
            instance_cores: default_instance_cores(),
            core_fraction: default_core_fraction(),
            instance_memory: default_instance_memory(),
            disk_size: default_disk_size(),
            disk_type: default_disk_type(),
        }
    }
}

impl InfraConfig {
    /// 加载并校验配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: InfraConfig = Self::loader(path).load()?;
        config.validate()?;
        Ok(config)
    }

    pub fn loader(path: Option<&Path>) -> ConfigLoader {
        let (file, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Path::new(INFRA_CONFIG_FILE).to_path_buf(), false),
        };

        ConfigLoader::new()
            .with_options(
                ConfigLoadOptions::default()
                    .with_validation(false)
                    .with_fail_on_missing_file(explicit),
            )
            .add_source(ConfigSource::Defaults)
            .add_source(ConfigSource::File(file))
            .add_source(ConfigSource::Env {
                prefix: INFRA_ENV_PREFIX.to_string(),
            })
            .add_source(ConfigSource::EnvText {
                prefix: INFRA_ENV_PREFIX.to_string(),
                keys: TEXT_KEYS.to_vec(),
            })
    }

    /// 必填项非空、数值为正、核心占比在 1..=100
    pub fn validate(&self) -> Result<()> {
        if self.yc_token.is_empty() {
            return Err(InfraError::MissingKey { key: "yc_token" });
        }

        let required = [
            ("yc_cloud_id", &self.yc_cloud_id),
            ("yc_folder_id", &self.yc_folder_id),
            ("yc_zone", &self.yc_zone),
            ("resource_prefix", &self.resource_prefix),
            ("vm_name", &self.vm_name),
            ("vm_username", &self.vm_username),
            ("ssh_public_key_path", &self.ssh_public_key_path),
            ("disk_type", &self.disk_type),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(InfraError::MissingKey { key });
            }
        }

        let positive = [
            ("instance_cores", self.instance_cores),
            ("instance_memory", self.instance_memory),
            ("disk_size", self.disk_size),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(InfraError::InvalidValue {
                    key,
                    reason: "must be greater than 0".to_string(),
                });
            }
        }

        if !(1..=100).contains(&self.core_fraction) {
            return Err(InfraError::InvalidValue {
                key: "core_fraction",
                reason: format!("{} is outside 1..=100", self.core_fraction),
            });
        }

        Ok(())
    }
}

impl ComponentConfig for InfraConfig {
    fn summary(&self) -> BTreeMap<String, String> {
        let mut summary = BTreeMap::new();
        summary.insert("yc_cloud_id".to_string(), self.yc_cloud_id.clone());
        summary.insert("yc_folder_id".to_string(), self.yc_folder_id.clone());
        summary.insert("yc_zone".to_string(), self.yc_zone.clone());
        summary.insert("vm_name".to_string(), self.vm_name.clone());
        summary.insert("vm_username".to_string(), self.vm_username.clone());
        summary
    }
}

// --- Default value functions ---

fn default_zone() -> String {
    "ru-central1-b".to_string()
}

fn default_prefix() -> String {
    "can4red".to_string()
}

fn default_ssh_public_key_path() -> String {
    "~/.ssh/id_ed25519.pub".to_string()
}

fn default_instance_cores() -> u32 {
    2
}

fn default_core_fraction() -> u32 {
    20
}

fn default_instance_memory() -> u32 {
    2
}

fn default_disk_size() -> u32 {
    20
}

fn default_disk_type() -> String {
    "network-hdd".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn load_from_toml(content: &str) -> Result<InfraConfig> {
        let config: InfraConfig = ConfigLoader::new()
            .with_options(ConfigLoadOptions::default().with_validation(false))
            .add_source(ConfigSource::Defaults)
            .add_source(ConfigSource::TomlString(content.to_string()))
            .load()?;
        config.validate()?;
        Ok(config)
    }

    const MINIMAL: &str = r#"
yc_token = "t0ken"
yc_cloud_id = "b1gcloud"
yc_folder_id = "b1gfolder"
"#;

    #[test]
    fn test_defaults_applied() {
        let cfg = load_from_toml(MINIMAL).unwrap();
        assert_eq!(cfg.yc_zone, "ru-central1-b");
        assert_eq!(cfg.vm_name, "can4red");
        assert_eq!(cfg.instance_cores, 2);
        assert_eq!(cfg.core_fraction, 20);
        assert_eq!(cfg.instance_memory, 2);
        assert_eq!(cfg.disk_size, 20);
        assert_eq!(cfg.disk_type, "network-hdd");
        assert_eq!(cfg.yc_token.expose(), "t0ken");
    }

    #[test]
    fn test_missing_token_rejected() {
        let err = load_from_toml("yc_cloud_id = \"c\"\nyc_folder_id = \"f\"").unwrap_err();
        assert!(matches!(err, InfraError::MissingKey { key: "yc_token" }));
    }

    #[test]
    fn test_missing_cloud_id_rejected() {
        let err = load_from_toml("yc_token = \"t\"\nyc_folder_id = \"f\"").unwrap_err();
        assert!(matches!(err, InfraError::MissingKey { key: "yc_cloud_id" }));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = load_from_toml(&format!("{}core_fraction = 150", MINIMAL)).unwrap_err();
        assert!(matches!(err, InfraError::InvalidValue { key: "core_fraction", .. }));

        let err = load_from_toml(&format!("{}disk_size = 0", MINIMAL)).unwrap_err();
        assert!(matches!(err, InfraError::InvalidValue { key: "disk_size", .. }));
    }

    #[test]
    fn test_numeric_looking_env_values_stay_text() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("DEVINFO_INFRA__YC_TOKEN", "123456");
            jail.set_env("DEVINFO_INFRA__YC_CLOUD_ID", "0042");
            jail.set_env("DEVINFO_INFRA__YC_FOLDER_ID", "7");
            jail.set_env("DEVINFO_INFRA__VM_NAME", "007");
            jail.set_env("DEVINFO_INFRA__INSTANCE_CORES", "4");

            let cfg = InfraConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.yc_token.expose(), "123456");
            assert_eq!(cfg.yc_cloud_id, "0042");
            assert_eq!(cfg.yc_folder_id, "7");
            assert_eq!(cfg.vm_name, "007");
            assert_eq!(cfg.instance_cores, 4);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                INFRA_CONFIG_FILE,
                "yc_token = \"file-token\"\nyc_cloud_id = \"c\"\nyc_folder_id = \"f\"\ndisk_size = 30",
            )?;
            jail.set_env("DEVINFO_INFRA__YC_ZONE", "ru-central1-a");
            jail.set_env("DEVINFO_INFRA__DISK_SIZE", "40");

            let cfg = InfraConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.yc_token.expose(), "file-token");
            assert_eq!(cfg.yc_zone, "ru-central1-a");
            assert_eq!(cfg.disk_size, 40);
            Ok(())
        });
    }

    #[test]
    fn test_secret_hidden_from_debug_and_summary() {
        let cfg = load_from_toml(MINIMAL).unwrap();
        assert!(!format!("{:?}", cfg).contains("t0ken"));
        assert!(!cfg.summary().values().any(|v| v.contains("t0ken")));
    }
}
