//! 路由表构建
//!
//! 在依赖注入完成后，从注册表中的控制器收集处理方法，
//! 以 `类型级前缀 + 方法级后缀` 作为路由键

use indexmap::IndexMap;
use ioc_abstractions::{BeanLookup, OverwritePolicy, Overwrite};
use mvc_common::{
    BindingKind, ComponentError, ComponentResult, HandlerMethod, PathConventions,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// 路由表中的一条记录
///
/// 只保存控制器的 Bean 名称，实例在分发时从注册表中查找
#[derive(Debug, Clone)]
pub struct RouteEntry {
    path: String,
    bean_name: String,
    controller_type: String,
    method: HandlerMethod,
}

impl RouteEntry {
    /// 路由键
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 控制器的 Bean 名称
    pub fn bean_name(&self) -> &str {
        &self.bean_name
    }

    /// 控制器类型的全限定名称
    pub fn controller_type(&self) -> &str {
        &self.controller_type
    }

    /// 处理方法
    pub fn method(&self) -> &HandlerMethod {
        &self.method
    }

    /// `类型#方法` 形式的描述
    pub fn handler_name(&self) -> String {
        format!("{}#{}", self.controller_type, self.method.name())
    }
}

/// 路由表
#[derive(Debug, Clone, Default)]
pub struct HandlerMapping {
    routes: IndexMap<String, RouteEntry>,
    overwrites: Vec<Overwrite>,
}

impl HandlerMapping {
    /// 从注册表中的全部控制器构建路由表
    ///
    /// 宽松模式下重复的路由键以后者为准并输出警告；严格模式下先收集全部路由，
    /// 发现重复键直接失败
    pub fn build(beans: &dyn BeanLookup, policy: OverwritePolicy) -> ComponentResult<Self> {
        info!("开始构建路由表");

        let candidates = Self::collect(beans);
        if policy.is_strict() {
            Self::check_duplicates(&candidates)?;
        }

        let mut mapping = Self::default();
        for entry in candidates {
            mapping.insert(entry);
        }

        info!("路由表构建完成，共 {} 条路由", mapping.len());
        Ok(mapping)
    }

    fn collect(beans: &dyn BeanLookup) -> Vec<RouteEntry> {
        let mut seen: Vec<&mvc_common::Bean> = Vec::new();
        let mut candidates = Vec::new();

        for bean_name in beans.bean_names() {
            let Some(bean) = beans.bean(bean_name) else {
                continue;
            };
            if !bean.kind().is_controller() || seen.iter().any(|b| b.same_instance(bean)) {
                continue;
            }
            seen.push(bean);

            let definition = bean.definition();
            let prefix = definition.request_mapping().unwrap_or("");
            for method in definition.handler_methods() {
                let path = PathConventions::compose(prefix, method.path());
                debug!(
                    "发现路由: {} -> {}#{}",
                    path,
                    definition.qualified_name(),
                    method.name()
                );
                candidates.push(RouteEntry {
                    path,
                    bean_name: bean_name.to_string(),
                    controller_type: definition.qualified_name().to_string(),
                    method,
                });
            }
        }
        candidates
    }

    fn check_duplicates(candidates: &[RouteEntry]) -> ComponentResult<()> {
        let mut seen: HashMap<&str, &RouteEntry> = HashMap::new();
        for entry in candidates {
            if let Some(previous) = seen.insert(entry.path(), entry) {
                return Err(ComponentError::DuplicateBinding {
                    kind: BindingKind::Route,
                    key: entry.path.clone(),
                    previous: previous.handler_name(),
                    current: entry.handler_name(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, entry: RouteEntry) {
        let current = entry.handler_name();
        if let Some(previous) = self.routes.insert(entry.path.clone(), entry) {
            let overwrite = Overwrite {
                kind: BindingKind::Route,
                key: previous.path.clone(),
                previous: previous.handler_name(),
                current,
            };
            warn!("{}", overwrite);
            self.overwrites.push(overwrite);
        }
    }

    /// 精确匹配查找路由
    pub fn get(&self, path: &str) -> Option<&RouteEntry> {
        self.routes.get(path)
    }

    /// 全部路由键，按构建顺序
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// 全部路由
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.values()
    }

    /// 构建过程中被覆盖的路由
    pub fn overwrites(&self) -> &[Overwrite] {
        &self.overwrites
    }

    /// 路由数量
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
