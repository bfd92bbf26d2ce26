//! 容器配置

use mvc_common::{ApplicationProperties, ConfigResult};

/// 重复键的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// 后写入者生效，每次覆盖输出警告
    #[default]
    LastWriteWins,
    /// 先收集全部绑定，发现重复键立即失败
    Strict,
}

impl OverwritePolicy {
    /// 是否为严格模式
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// 容器配置
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// 重复键处理策略
    pub overwrite_policy: OverwritePolicy,
}

impl ContainerConfig {
    /// 严格模式配置
    pub fn strict() -> Self {
        Self {
            overwrite_policy: OverwritePolicy::Strict,
        }
    }

    /// 从应用属性读取
    pub fn from_properties(properties: &ApplicationProperties) -> ConfigResult<Self> {
        let overwrite_policy = if properties.strict_mode()? {
            OverwritePolicy::Strict
        } else {
            OverwritePolicy::LastWriteWins
        };
        Ok(Self { overwrite_policy })
    }
}
