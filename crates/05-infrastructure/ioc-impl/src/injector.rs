//! 字段注入器实现

use ioc_abstractions::{BeanLookup, DependencyInjector, InjectionRecord, InjectionReport};
use tracing::{debug, info, warn};

/// 字段注入器
///
/// 对每个实例的每个注入点：以显式键或声明类型的全限定名称查找 Bean，
/// 找到即绑定，找不到则保持未绑定并继续
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldInjector;

impl FieldInjector {
    /// 创建新的字段注入器
    pub fn new() -> Self {
        Self
    }
}

impl DependencyInjector for FieldInjector {
    fn inject_all(&self, beans: &dyn BeanLookup) -> InjectionReport {
        let mut report = InjectionReport::default();

        for owner in beans.distinct_beans() {
            for point in owner.definition().injection_points() {
                let record =
                    InjectionRecord::new(owner.qualified_name(), point.field(), point.lookup_key());

                let Some(dependency) = beans.bean(point.lookup_key()) else {
                    warn!(
                        "未找到依赖，字段保持未绑定: {}.{} (键: {})",
                        record.owner, record.field, record.key
                    );
                    report.unresolved.push(record);
                    continue;
                };

                match point.bind(owner, dependency) {
                    Ok(newly_bound) => {
                        debug!(
                            "注入字段: {}.{} <- {}{}",
                            record.owner,
                            record.field,
                            dependency.qualified_name(),
                            if newly_bound { "" } else { " (已绑定)" }
                        );
                        report.bound.push(record);
                    }
                    Err(e) => {
                        warn!("注入失败，字段保持未绑定: {}.{}: {}", record.owner, record.field, e);
                        report.rejected.push((record, e));
                    }
                }
            }
        }

        info!(
            "依赖注入完成: 绑定 {} 个字段，未解析 {} 个，类型不兼容 {} 个",
            report.bound.len(),
            report.unresolved.len(),
            report.rejected.len()
        );
        report
    }
}
