//! Bean 查找抽象接口

use mvc_common::{Bean, QualifiedName};
use std::sync::Arc;

/// Bean 查找 trait
///
/// 按名称或接口全限定名称查找已注册的实例
pub trait BeanLookup: Send + Sync {
    /// 按键查找 Bean
    fn bean(&self, key: &str) -> Option<&Bean>;

    /// 全部键，按注册顺序
    fn bean_names(&self) -> Vec<&str>;

    /// 检查键是否存在
    fn contains(&self, key: &str) -> bool {
        self.bean(key).is_some()
    }

    /// 去重后的全部实例，按首次注册顺序
    fn distinct_beans(&self) -> Vec<&Bean> {
        let mut distinct: Vec<&Bean> = Vec::new();
        for name in self.bean_names() {
            if let Some(bean) = self.bean(name) {
                if !distinct.iter().any(|seen| seen.same_instance(bean)) {
                    distinct.push(bean);
                }
            }
        }
        distinct
    }

    /// 按键查找并转换为指定类型
    fn resolve<X>(&self, key: &str) -> Option<Arc<X>>
    where
        X: ?Sized + QualifiedName + 'static,
        Self: Sized,
    {
        self.bean(key)?.resolve_as::<X>()
    }

    /// 以类型自身的全限定名称作为键查找
    fn resolve_by_type<X>(&self) -> Option<Arc<X>>
    where
        X: ?Sized + QualifiedName + 'static,
        Self: Sized,
    {
        self.resolve::<X>(&X::qualified_name())
    }
}
