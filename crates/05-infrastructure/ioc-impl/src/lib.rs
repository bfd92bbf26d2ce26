//! # IoC 容器具体实现
//!
//! 提供目录扫描器、组件目录扫描器、Bean 注册表和字段注入器

pub mod injector;
pub mod registry;
pub mod scanner;

pub use injector::FieldInjector;
pub use registry::{BeanRegistry, RegistrationSummary};
pub use scanner::{CatalogScanner, ClasspathScanner};
