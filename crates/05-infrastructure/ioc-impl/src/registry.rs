//! Bean 注册表实现

use indexmap::IndexMap;
use ioc_abstractions::{
    BeanLookup, ComponentRegistry, ContainerConfig, Overwrite, RegistrationOutcome,
};
use mvc_common::{
    Bean, BindingKind, ComponentCatalog, ComponentDescriptor, ComponentError, ComponentKind,
    ComponentResult, NamingConventions,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 批量注册的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// 扫描到的类型数量
    pub scanned: usize,
    /// 已注册的 Bean 名称
    pub registered: Vec<String>,
    /// 未标注而跳过的类型
    pub skipped: Vec<String>,
    /// 实例化失败的类型及原因
    pub failed: Vec<(String, String)>,
}

/// 暂存的单个组件：实例已创建但尚未写入注册表
struct Staged {
    outcome: RegistrationOutcome,
    bindings: Vec<(String, Bean)>,
}

/// Bean 注册表
///
/// 键为 Bean 名称或接口全限定名称，按首次写入顺序保存
pub struct BeanRegistry {
    catalog: Arc<ComponentCatalog>,
    config: ContainerConfig,
    beans: IndexMap<String, Bean>,
    overwrites: Vec<Overwrite>,
}

impl BeanRegistry {
    /// 创建新的注册表
    pub fn new(catalog: Arc<ComponentCatalog>) -> Self {
        Self {
            catalog,
            config: ContainerConfig::default(),
            beans: IndexMap::new(),
            overwrites: Vec::new(),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 注册扫描得到的全部类型
    ///
    /// 单个组件实例化失败只记录日志并继续；严格模式下先收集全部绑定，
    /// 存在重复键时整体失败，注册表保持不变
    pub fn register_all(&mut self, names: &[String]) -> ComponentResult<RegistrationSummary> {
        info!("开始注册组件，共 {} 个候选类型", names.len());

        let mut summary = RegistrationSummary {
            scanned: names.len(),
            ..RegistrationSummary::default()
        };
        let mut pending: Vec<(String, Bean)> = Vec::new();

        for name in names {
            let descriptor = self.catalog.describe(name);
            let staged = self.stage(&descriptor);
            match staged.outcome {
                RegistrationOutcome::Registered { bean_name, .. } => {
                    summary.registered.push(bean_name);
                }
                RegistrationOutcome::Skipped => summary.skipped.push(name.clone()),
                RegistrationOutcome::Failed { message } => {
                    summary.failed.push((name.clone(), message));
                }
            }
            pending.extend(staged.bindings);
        }

        if self.config.overwrite_policy.is_strict() {
            self.check_duplicates(&pending)?;
        }
        for (key, bean) in pending {
            self.insert(key, bean);
        }

        info!(
            "组件注册完成: 注册 {} 个，跳过 {} 个，失败 {} 个",
            summary.registered.len(),
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// 写入一个绑定，已存在的键会被覆盖并记录
    pub fn insert(&mut self, key: String, bean: Bean) {
        let current = bean.qualified_name().to_string();
        if let Some(previous) = self.beans.insert(key.clone(), bean) {
            let overwrite = Overwrite {
                kind: BindingKind::Bean,
                key,
                previous: previous.qualified_name().to_string(),
                current,
            };
            warn!("{}", overwrite);
            self.overwrites.push(overwrite);
        }
    }

    /// 全部绑定，按注册顺序
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bean)> {
        self.beans.iter().map(|(key, bean)| (key.as_str(), bean))
    }

    /// 绑定数量（含接口别名）
    pub fn len(&self) -> usize {
        self.beans.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    fn stage(&self, descriptor: &ComponentDescriptor) -> Staged {
        let skipped = Staged {
            outcome: RegistrationOutcome::Skipped,
            bindings: Vec::new(),
        };

        if descriptor.kind == ComponentKind::Untagged {
            debug!("跳过未标注的类型: {}", descriptor.qualified_name);
            return skipped;
        }
        let Some(definition) = self.catalog.get(&descriptor.qualified_name) else {
            debug!("组件目录中没有类型定义: {}", descriptor.qualified_name);
            return skipped;
        };

        let instance = match definition.instantiate() {
            Ok(instance) => instance,
            Err(e) => {
                error!("组件实例化失败，已跳过: {}", e);
                return Staged {
                    outcome: RegistrationOutcome::Failed {
                        message: e.to_string(),
                    },
                    bindings: Vec::new(),
                };
            }
        };

        let bean = Bean::new(instance, Arc::clone(definition));
        let bean_name = NamingConventions::bean_name(descriptor);
        let aliases: Vec<String> = if descriptor.kind.is_service() {
            definition.interface_names().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        debug!(
            "实例化组件: {} [{}] -> {} (别名: {:?})",
            descriptor.qualified_name, descriptor.kind, bean_name, aliases
        );

        let mut bindings = vec![(bean_name.clone(), bean.clone())];
        bindings.extend(aliases.iter().map(|alias| (alias.clone(), bean.clone())));

        Staged {
            outcome: RegistrationOutcome::Registered { bean_name, aliases },
            bindings,
        }
    }

    fn check_duplicates(&self, pending: &[(String, Bean)]) -> ComponentResult<()> {
        let mut seen: IndexMap<&str, &Bean> = self
            .beans
            .iter()
            .map(|(key, bean)| (key.as_str(), bean))
            .collect();
        for (key, bean) in pending {
            if let Some(previous) = seen.insert(key.as_str(), bean) {
                return Err(ComponentError::DuplicateBinding {
                    kind: BindingKind::Bean,
                    key: key.clone(),
                    previous: previous.qualified_name().to_string(),
                    current: bean.qualified_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl BeanLookup for BeanRegistry {
    fn bean(&self, key: &str) -> Option<&Bean> {
        self.beans.get(key)
    }

    fn bean_names(&self) -> Vec<&str> {
        self.beans.keys().map(String::as_str).collect()
    }
}

impl ComponentRegistry for BeanRegistry {
    fn register_descriptor(
        &mut self,
        descriptor: &ComponentDescriptor,
    ) -> ComponentResult<RegistrationOutcome> {
        let staged = self.stage(descriptor);
        if self.config.overwrite_policy.is_strict() {
            self.check_duplicates(&staged.bindings)?;
        }
        for (key, bean) in staged.bindings {
            self.insert(key, bean);
        }
        Ok(staged.outcome)
    }

    fn overwrites(&self) -> &[Overwrite] {
        &self.overwrites
    }
}

impl std::fmt::Debug for BeanRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanRegistry")
            .field("config", &self.config)
            .field("keys", &self.bean_names())
            .field("overwrites", &self.overwrites.len())
            .finish()
    }
}
