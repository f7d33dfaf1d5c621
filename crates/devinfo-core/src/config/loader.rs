use crate::config::{ComponentConfig, ConfigLoadOptions, ConfigSource};
use crate::error::{CoreError, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

/// 统一配置加载器
///
/// 按添加顺序合并配置源，后添加的覆盖先添加的。
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
    options: ConfigLoadOptions,
}

impl ConfigLoader {
    /// 创建新的配置加载器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置源
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// 设置加载选项
    pub fn with_options(mut self, options: ConfigLoadOptions) -> Self {
        self.options = options;
        self
    }

    /// 已注册的配置源描述，用于启动日志
    pub fn describe_sources(&self) -> Vec<String> {
        self.sources.iter().map(ConfigSource::description).collect()
    }

    /// 构建合并后的 Figment（不提取）
    pub fn figment<T: ComponentConfig>(&self) -> Result<Figment> {
        let mut figment = Figment::new();

        for source in &self.sources {
            match source {
                ConfigSource::Defaults => {
                    figment = figment.merge(Serialized::defaults(T::default()));
                }
                ConfigSource::File(path) => match std::fs::metadata(path) {
                    Ok(_) => {
                        figment = figment.merge(Toml::file(path));
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        if self.options.fail_on_missing_file {
                            return Err(CoreError::Config {
                                message: format!("Config file not found: {}", path.display()),
                            });
                        }
                    }
                    Err(e) => {
                        return Err(CoreError::from_io_with_path(e, path.display().to_string()));
                    }
                },
                ConfigSource::TomlString(content) => {
                    figment = figment.merge(Toml::string(content));
                }
                ConfigSource::Env { prefix } => {
                    figment = figment.merge(Env::prefixed(prefix).split("__"));
                }
                ConfigSource::EnvText { prefix, keys } => {
                    for (key, value) in Env::prefixed(prefix).split("__").only(keys).iter() {
                        figment = figment.merge(Serialized::default(key.as_str(), value));
                    }
                }
                ConfigSource::RawEnv(keys) => {
                    figment = figment.merge(Env::raw().only(keys));
                }
            }
        }

        Ok(figment)
    }

    /// 加载配置
    pub fn load<T: ComponentConfig>(&self) -> Result<T> {
        let config: T = self.figment::<T>()?.extract()?;

        if self.options.validate {
            config.validate()?;
        }

        Ok(config)
    }
}
