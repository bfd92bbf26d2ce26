//! # IoC Abstractions
//!
//! IoC 容器抽象层，定义组件扫描、注册、查找和字段注入的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`BeanLookup`] - Bean 查找接口
//! - [`DependencyInjector`] - 依赖注入器接口

pub mod container;
pub mod injector;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use injector::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
