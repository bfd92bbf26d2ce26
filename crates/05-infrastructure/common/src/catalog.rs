//! 组件目录
//!
//! 按全限定名称索引的组件定义集合，代替运行时的类型加载

use crate::component::ComponentDefinition;
use crate::metadata::{ComponentDescriptor, TypeName};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::warn;

/// 组件目录
#[derive(Debug, Clone, Default)]
pub struct ComponentCatalog {
    definitions: IndexMap<String, Arc<ComponentDefinition>>,
}

impl ComponentCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 由全局注册的组件定义构建目录
    pub fn global() -> Self {
        crate::registered_component_definitions()
            .into_iter()
            .fold(Self::new(), |mut catalog, definition| {
                catalog.register(definition);
                catalog
            })
    }

    /// 注册组件定义，同名定义以后注册者为准
    pub fn register(&mut self, definition: Arc<ComponentDefinition>) {
        let name = definition.qualified_name().to_string();
        if let Some(previous) = self.definitions.insert(name.clone(), definition) {
            warn!(
                "组件目录中存在重复的类型定义: {} (原种类: {})",
                name,
                previous.kind()
            );
        }
    }

    /// 链式注册
    pub fn with(mut self, definition: ComponentDefinition) -> Self {
        self.register(Arc::new(definition));
        self
    }

    /// 按全限定名称查找定义
    pub fn get(&self, qualified_name: &str) -> Option<&Arc<ComponentDefinition>> {
        self.definitions.get(qualified_name)
    }

    /// 将全限定名称分类为组件描述符，目录中不存在的类型视为未标注
    pub fn describe(&self, qualified_name: &str) -> ComponentDescriptor {
        self.get(qualified_name)
            .map(|definition| definition.descriptor())
            .unwrap_or_else(|| ComponentDescriptor::untagged(qualified_name))
    }

    /// 指定包（含子包）下的全部类型名称，按名称排序
    pub fn names_in_package(&self, package: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .definitions
            .keys()
            .filter(|name| TypeName::is_in_package(name, package))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
