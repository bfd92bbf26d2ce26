//! # MVC 组合层
//!
//! 这个 crate 把扫描器、Bean 注册表、字段注入器和路由表组合成一个
//! 完整的、可分发请求的应用上下文。
//!
//! ## 主要功能
//!
//! - **应用构建器**: 使用构建者模式组合配置源、日志和组件目录
//! - **启动器**: 按 扫描 -> 注册 -> 注入 -> 路由构建 的顺序完成启动
//! - **路由表与分发器**: 精确匹配路由键并调用处理方法
//! - **配置源管理**: 合并配置文件、环境变量和显式覆盖项
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use mvc_composition::{ApplicationBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationBuilder::new()
//!         .add_config_file("application.properties")
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     let outcome = context.dispatch_uri("/user/list?page=1")?;
//!     println!("{}", serde_json::to_string(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod config_sources;
pub mod context;
pub mod dispatcher;
pub mod handler_mapping;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use bootstrapper::{BootstrapReport, Bootstrapper, FailedComponent};
pub use builder::{init_logging, ApplicationBuilder, LoggingConfig};
pub use config_sources::{ConfigSourceType, ConfigSources, DEFAULT_ENV_PREFIX};
pub use context::ApplicationContext;
pub use dispatcher::{DispatchOutcome, RequestDispatcher, ResolvedHandler};
pub use handler_mapping::{HandlerMapping, RouteEntry};

// 重新导出错误类型
pub use mvc_common::BootstrapError;
