//! # MVC Common
//!
//! 这个 crate 提供了 IoC 容器与请求分发核心共享的类型和约定。
//!
//! ## 核心组件
//!
//! - [`ComponentDefinition`] - 组件定义（构造器、接口、注入点、处理方法）
//! - [`Bean`] / [`Autowired`] - 容器中的实例与可注入字段
//! - [`ComponentCatalog`] - 按全限定名称索引的组件目录
//! - [`NamingConventions`] / [`PathConventions`] - Bean 命名与路由路径约定
//! - [`Request`] / [`HandlerMethod`] - 请求描述与处理方法
//! - [`ApplicationProperties`] - 应用配置
//!
//! ## 设计原则
//!
//! - 组件在编译期声明，启动时通过目录查找代替反射
//! - 启动完成后容器只读，可跨线程共享
//! - 约定优于配置

pub mod catalog;
pub mod component;
pub mod configuration;
pub mod conventions;
pub mod errors;
pub mod handler;
pub mod metadata;

pub use catalog::*;
pub use component::*;
pub use configuration::*;
pub use conventions::*;
pub use errors::*;
pub use handler::*;
pub use metadata::*;

// 组件宏生成的处理器闭包通过此路径引用 anyhow
pub use anyhow;

use std::sync::Arc;

/// 全局组件定义表，由组件宏生成的初始化函数在进程启动时写入
static GLOBAL_COMPONENT_DEFINITIONS: once_cell::sync::Lazy<
    parking_lot::RwLock<Vec<Arc<ComponentDefinition>>>,
> = once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(Vec::new()));

/// 注册组件定义
pub fn register_component_definition(definition: ComponentDefinition) {
    GLOBAL_COMPONENT_DEFINITIONS
        .write()
        .push(Arc::new(definition));
}

/// 获取全部已注册的组件定义
pub fn registered_component_definitions() -> Vec<Arc<ComponentDefinition>> {
    GLOBAL_COMPONENT_DEFINITIONS.read().clone()
}
