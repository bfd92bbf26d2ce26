//! 应用构建器

use crate::bootstrapper::Bootstrapper;
use crate::config_sources::ConfigSources;
use crate::context::ApplicationContext;
use ioc_abstractions::ComponentScanner;
use mvc_common::{BootstrapError, BootstrapResult, ComponentCatalog};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 应用构建器
///
/// 使用建造者模式组合配置源、日志、组件目录和扫描器，最终执行启动
pub struct ApplicationBuilder {
    /// 配置源
    config_sources: ConfigSources,
    /// 组件目录
    catalog: Option<Arc<ComponentCatalog>>,
    /// 自定义扫描器
    scanner: Option<Box<dyn ComponentScanner>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            config_sources: ConfigSources::new(),
            catalog: None,
            scanner: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加配置文件（properties / toml / json / yaml）
    pub fn add_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_sources = self.config_sources.with_file(path);
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config_sources = self.config_sources.with_env_prefix(prefix);
        self
    }

    /// 不读取环境变量
    pub fn without_environment(mut self) -> Self {
        self.config_sources = self.config_sources.without_environment();
        self
    }

    /// 设置配置项，优先级高于配置文件和环境变量
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.config_sources = self.config_sources.with_override(key, value);
        self
    }

    /// 指定组件目录
    pub fn with_catalog(mut self, catalog: Arc<ComponentCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 指定扫描器
    pub fn with_scanner(mut self, scanner: Box<dyn ComponentScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// 启用日志并设置日志配置
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_enabled = true;
        self.logging_config = config;
        self
    }

    /// 构建应用上下文
    pub fn build(self) -> BootstrapResult<ApplicationContext> {
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        let properties = self.config_sources.load()?;
        info!("配置加载完成，共 {} 项", properties.len());

        let mut bootstrapper = Bootstrapper::new(properties);
        if let Some(catalog) = self.catalog {
            bootstrapper = bootstrapper.with_catalog(catalog);
        }
        if let Some(scanner) = self.scanner {
            bootstrapper = bootstrapper.with_scanner(scanner);
        }
        bootstrapper.bootstrap()
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> BootstrapResult<()> {
        init_logging(&self.logging_config)
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 按日志配置初始化全局订阅者
///
/// 设置了 `RUST_LOG` 时以其为准；重复初始化会返回错误
pub fn init_logging(config: &LoggingConfig) -> BootstrapResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string().to_lowercase()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| BootstrapError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 按名称设置日志级别（trace / debug / info / warn / error）
    pub fn with_level_name(mut self, level: &str) -> BootstrapResult<Self> {
        self.level = tracing::Level::from_str(level).map_err(|_| BootstrapError::BootstrapFailed {
            message: format!("无效的日志级别: {}", level),
        })?;
        Ok(self)
    }

    /// 设置是否使用 JSON 格式
    pub fn with_json_format(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }
}
