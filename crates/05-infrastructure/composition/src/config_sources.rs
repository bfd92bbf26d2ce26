//! 配置源
//!
//! 通过 `config` crate 合并配置文件、环境变量和显式覆盖项，
//! 结果展平为点分隔键的 [`ApplicationProperties`]

use config::{Config, Environment, File, FileFormat, Map, Value, ValueKind};
use mvc_common::{ApplicationProperties, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认的环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "MVC";

/// 配置源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSourceType {
    /// `key=value` 属性文件
    Properties,
    /// TOML 文件
    Toml,
    /// JSON 文件
    Json,
    /// YAML 文件
    Yaml,
}

impl ConfigSourceType {
    /// 根据扩展名判断配置源类型
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "properties" | "ini" => Some(Self::Properties),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn file_format(self) -> FileFormat {
        match self {
            Self::Properties => FileFormat::Ini,
            Self::Toml => FileFormat::Toml,
            Self::Json => FileFormat::Json,
            Self::Yaml => FileFormat::Yaml,
        }
    }
}

/// 配置源集合
///
/// 优先级从低到高：配置文件、环境变量、显式覆盖项
#[derive(Debug, Clone)]
pub struct ConfigSources {
    files: Vec<PathBuf>,
    env_prefix: Option<String>,
    overrides: ApplicationProperties,
}

impl ConfigSources {
    /// 创建新的配置源集合，默认读取 `MVC_` 前缀的环境变量
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            overrides: ApplicationProperties::new(),
        }
    }

    /// 添加配置文件
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 不读取环境变量
    pub fn without_environment(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// 添加显式覆盖项
    pub fn with_override(mut self, key: &str, value: impl Into<String>) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// 加载并合并全部配置源
    pub fn load(&self) -> ConfigResult<ApplicationProperties> {
        let mut builder = Config::builder();

        for path in &self.files {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            let source_type = ConfigSourceType::from_path(path).ok_or_else(|| {
                ConfigError::ParseError {
                    source: format!("不支持的配置文件格式: {}", path.display()).into(),
                }
            })?;
            info!("添加配置文件: {} ({:?})", path.display(), source_type);
            builder = builder.add_source(File::from(path.as_path()).format(source_type.file_format()));
        }

        if let Some(prefix) = &self.env_prefix {
            debug!("添加环境变量配置源: {}_*", prefix);
            builder = builder.add_source(Environment::with_prefix(prefix).prefix_separator("_"));
        }

        let settings = builder.build().map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        let table = settings
            .try_deserialize::<Map<String, Value>>()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        let mut properties = ApplicationProperties::new();
        for (key, value) in table {
            flatten(&key, value, &mut properties);
        }
        for (key, value) in self.overrides.iter() {
            properties.insert(key, value);
        }

        debug!("配置加载完成，共 {} 项", properties.len());
        Ok(properties)
    }
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self::new()
    }
}

fn flatten(key: &str, value: Value, properties: &mut ApplicationProperties) {
    match value.kind {
        ValueKind::Table(table) => {
            for (child, value) in table {
                flatten(&format!("{}.{}", key, child), value, properties);
            }
        }
        ValueKind::Array(items) => {
            let joined = items
                .into_iter()
                .filter_map(|item| item.into_string().ok())
                .collect::<Vec<_>>()
                .join(",");
            properties.insert(key, joined);
        }
        ValueKind::Nil => {}
        kind => {
            if let Ok(text) = Value::new(None, kind).into_string() {
                properties.insert(key, text);
            }
        }
    }
}
