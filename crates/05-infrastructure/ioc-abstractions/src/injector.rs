//! 依赖注入器抽象接口

use crate::resolver::BeanLookup;
use mvc_common::InjectionError;

/// 依赖注入器 trait
///
/// 在全部 Bean 实例化之后运行，为每个实例的可注入字段绑定依赖
pub trait DependencyInjector: Send + Sync {
    /// 对查找表中的全部实例执行注入
    ///
    /// 找不到依赖不是错误，字段保持未绑定并记录在报告中
    fn inject_all(&self, beans: &dyn BeanLookup) -> InjectionReport;
}

/// 单个注入点的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionRecord {
    /// 所属 Bean 的类型名称
    pub owner: String,
    /// 字段名称
    pub field: String,
    /// 查找键
    pub key: String,
}

impl InjectionRecord {
    /// 创建注入记录
    pub fn new(owner: impl Into<String>, field: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            key: key.into(),
        }
    }
}

/// 注入报告
#[derive(Debug, Clone, Default)]
pub struct InjectionReport {
    /// 成功绑定的字段
    pub bound: Vec<InjectionRecord>,
    /// 查找键无匹配、保持未绑定的字段
    pub unresolved: Vec<InjectionRecord>,
    /// 找到了 Bean 但类型不兼容的字段
    pub rejected: Vec<(InjectionRecord, InjectionError)>,
}

impl InjectionReport {
    /// 是否全部字段都已绑定
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && self.rejected.is_empty()
    }

    /// 注入点总数
    pub fn total(&self) -> usize {
        self.bound.len() + self.unresolved.len() + self.rejected.len()
    }
}
