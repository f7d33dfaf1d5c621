use std::path::PathBuf;

/// 配置源类型
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// 默认值配置源
    Defaults,
    /// 文件配置源
    File(PathBuf),
    /// 内联 TOML（测试与嵌入场景）
    TomlString(String),
    /// 带前缀的环境变量，嵌套键使用 `__` 分隔
    Env { prefix: String },
    /// 带前缀的环境变量中按原文读取的字符串键，如 `0042` 不会被解析成数字
    EnvText {
        prefix: String,
        keys: Vec<&'static str>,
    },
    /// 不带前缀的环境变量白名单（大小写不敏感）
    RawEnv(Vec<&'static str>),
}

/// 配置加载选项
#[derive(Debug, Clone)]
pub struct ConfigLoadOptions {
    /// 是否验证配置
    pub validate: bool,
    /// 文件不存在时是否失败
    pub fail_on_missing_file: bool,
}

impl Default for ConfigLoadOptions {
    fn default() -> Self {
        Self {
            validate: true,
            fail_on_missing_file: false,
        }
    }
}

impl ConfigSource {
    /// 获取配置源的描述
    pub fn description(&self) -> String {
        match self {
            ConfigSource::Defaults => "defaults".to_string(),
            ConfigSource::File(path) => format!("file:{}", path.display()),
            ConfigSource::TomlString(_) => "inline-toml".to_string(),
            ConfigSource::Env { prefix } => format!("env:{}*", prefix),
            ConfigSource::EnvText { prefix, keys } => {
                format!("env-text:{}{{{}}}", prefix, keys.join(","))
            }
            ConfigSource::RawEnv(keys) => format!("env:{}", keys.join(",")),
        }
    }
}

impl ConfigLoadOptions {
    /// 设置验证选项
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// 设置文件不存在时的行为
    pub fn with_fail_on_missing_file(mut self, fail: bool) -> Self {
        self.fail_on_missing_file = fail;
        self
    }
}
