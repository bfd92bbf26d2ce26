//! 元数据定义
//!
//! 提供组件类型名称、组件种类和组件描述符

use std::fmt;

/// 全限定类型名称工具
///
/// 全限定名称统一使用 `.` 分隔，例如 `demo.controller.UserController`，
/// Rust 模块路径中的 `::` 会被转换为 `.`
#[derive(Debug)]
pub struct TypeName;

impl TypeName {
    /// 由模块路径和类型名称构造全限定名称
    ///
    /// ```
    /// use mvc_common::TypeName;
    ///
    /// assert_eq!(
    ///     TypeName::qualify("demo::controller", "UserController"),
    ///     "demo.controller.UserController"
    /// );
    /// ```
    pub fn qualify(module_path: &str, simple_name: &str) -> String {
        let package = Self::package_from_module_path(module_path);
        if package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", package, simple_name)
        }
    }

    /// 将模块路径转换为包路径
    pub fn package_from_module_path(module_path: &str) -> String {
        module_path
            .split("::")
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// 获取简单类型名称（最后一段）
    pub fn simple_name(qualified_name: &str) -> &str {
        qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(qualified_name)
    }

    /// 获取包名称（去掉最后一段）
    pub fn package(qualified_name: &str) -> &str {
        qualified_name
            .rsplit_once('.')
            .map(|(package, _)| package)
            .unwrap_or("")
    }

    /// 判断全限定名称是否位于指定包之下（按段匹配）
    pub fn is_in_package(qualified_name: &str, package: &str) -> bool {
        if package.is_empty() {
            return true;
        }
        qualified_name
            .strip_prefix(package)
            .map_or(false, |rest| rest.starts_with('.'))
    }

    /// 检查包路径是否合法
    pub fn is_valid_package(package: &str) -> bool {
        !package.is_empty()
            && package
                .split('.')
                .all(|segment| !segment.is_empty() && !segment.chars().any(char::is_whitespace))
    }
}

/// 组件种类标签
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// 请求处理组件
    Controller,
    /// 业务组件，可带显式 Bean 名称
    Service { name: Option<String> },
    /// 未标注组件，注册阶段直接跳过
    Untagged,
}

impl ComponentKind {
    /// 无显式名称的业务组件
    pub fn service() -> Self {
        Self::Service { name: None }
    }

    /// 带显式名称的业务组件
    pub fn named_service(name: impl Into<String>) -> Self {
        Self::Service {
            name: Some(name.into()),
        }
    }

    /// 是否为控制器
    pub fn is_controller(&self) -> bool {
        matches!(self, Self::Controller)
    }

    /// 是否为业务组件
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }

    /// 标签名称
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Service { .. } => "service",
            Self::Untagged => "untagged",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service { name: Some(name) } => write!(f, "service(\"{}\")", name),
            other => f.write_str(other.tag()),
        }
    }
}

/// 组件描述符
///
/// 由扫描结果分类得到，只在注册阶段使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// 全限定类型名称
    pub qualified_name: String,
    /// 组件种类
    pub kind: ComponentKind,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符
    pub fn new(qualified_name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
        }
    }

    /// 未标注的组件描述符
    pub fn untagged(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, ComponentKind::Untagged)
    }

    /// 简单类型名称
    pub fn simple_name(&self) -> &str {
        TypeName::simple_name(&self.qualified_name)
    }
}
