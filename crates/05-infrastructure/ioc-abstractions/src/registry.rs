//! 组件注册表抽象接口

use crate::resolver::BeanLookup;
use mvc_common::{BindingKind, ComponentDescriptor, ComponentResult};
use std::fmt;

/// 组件注册表 trait
///
/// 消费扫描得到的组件描述符，实例化并登记 Bean
pub trait ComponentRegistry: BeanLookup {
    /// 注册单个组件
    ///
    /// 实例化失败不会返回错误，而是体现在 [`RegistrationOutcome::Failed`] 中；
    /// 只有在严格模式下出现重复键时才返回错误
    fn register_descriptor(
        &mut self,
        descriptor: &ComponentDescriptor,
    ) -> ComponentResult<RegistrationOutcome>;

    /// 注册过程中发生的全部键覆盖
    fn overwrites(&self) -> &[Overwrite];
}

/// 单个组件的注册结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// 已注册，附带 Bean 名称和接口别名
    Registered {
        bean_name: String,
        aliases: Vec<String>,
    },
    /// 未标注，跳过
    Skipped,
    /// 实例化失败，跳过
    Failed { message: String },
}

/// 键覆盖记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overwrite {
    /// 键的种类
    pub kind: BindingKind,
    /// 被覆盖的键
    pub key: String,
    /// 原绑定目标
    pub previous: String,
    /// 新绑定目标
    pub current: String,
}

impl fmt::Display for Overwrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}键 {} 被覆盖: {} -> {}",
            self.kind, self.key, self.previous, self.current
        )
    }
}
