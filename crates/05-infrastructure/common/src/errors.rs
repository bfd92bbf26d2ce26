//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {key} = {value}, 原因: {message}")]
    TypeConversionError {
        key: String,
        value: String,
        message: String,
    },
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件扫描失败: {message}")]
    ScanError { message: String },

    #[error("组件实例化失败: {type_name}, 原因: {message}")]
    InstantiationFailed { type_name: String, message: String },

    #[error("重复的{kind}键: {key} ({previous} -> {current})")]
    DuplicateBinding {
        kind: BindingKind,
        key: String,
        previous: String,
        current: String,
    },
}

impl ComponentError {
    /// 创建扫描错误
    pub fn scan_error(message: impl Into<String>) -> Self {
        Self::ScanError {
            message: message.into(),
        }
    }

    /// 创建实例化错误
    pub fn instantiation_failed(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InstantiationFailed {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// 可能发生覆盖的绑定种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Bean 名称或接口别名
    Bean,
    /// 路由键
    Route,
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bean => f.write_str("Bean"),
            Self::Route => f.write_str("路由"),
        }
    }
}

/// 字段注入错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InjectionError {
    #[error("注入目标类型不匹配: 期望 {expected}, 实际 {actual}")]
    OwnerTypeMismatch { expected: String, actual: String },

    #[error("依赖类型不兼容: 字段 {field} 需要 {expected}, 键 {key} 对应 {actual}")]
    IncompatibleDependency {
        field: String,
        key: String,
        expected: String,
        actual: String,
    },

    #[error("字段尚未注入: {field} ({target})")]
    Unbound { field: String, target: String },
}

/// 请求分发错误类型
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("处理器执行失败: {path} -> {method}, 原因: {source}")]
    HandlerFailed {
        path: String,
        method: String,
        source: anyhow::Error,
    },

    #[error("处理器绑定的实例类型不匹配: {method} 期望 {expected}, 实际 {actual}")]
    HandlerTypeMismatch {
        method: String,
        expected: String,
        actual: String,
    },

    #[error("处理器返回值序列化失败: {method}, 原因: {source}")]
    SerializationFailed {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("路由绑定的控制器不存在: {bean_name}")]
    ControllerMissing { bean_name: String },
}

/// 启动错误类型
///
/// 启动阶段出现此类错误时必须终止进程，不得开始接收请求
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type DispatchResult<T> = Result<T, DispatchError>;
pub type BootstrapResult<T> = Result<T, BootstrapError>;
