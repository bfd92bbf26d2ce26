//! 约定规范定义
//!
//! Bean 命名约定与路由路径约定

use crate::metadata::{ComponentDescriptor, ComponentKind};

/// 命名约定规范
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 将简单类型名称首字母小写，作为默认 Bean 名称
    ///
    /// ```
    /// use mvc_common::NamingConventions;
    ///
    /// assert_eq!(NamingConventions::default_bean_name("UserController"), "userController");
    /// ```
    pub fn default_bean_name(simple_name: &str) -> String {
        let mut chars = simple_name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// 根据组件描述符确定 Bean 名称
    ///
    /// 业务组件的显式名称去除首尾空白后非空时优先使用，否则回退到默认名称
    pub fn bean_name(descriptor: &ComponentDescriptor) -> String {
        if let ComponentKind::Service { name: Some(name) } = &descriptor.kind {
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
        Self::default_bean_name(descriptor.simple_name())
    }
}

/// 路由路径约定规范
#[derive(Debug)]
pub struct PathConventions;

impl PathConventions {
    /// 规范化路径：保证以 `/` 开头，合并连续的 `/`
    pub fn normalize(path: &str) -> String {
        let mut normalized = String::with_capacity(path.len() + 1);
        normalized.push('/');
        for ch in path.chars() {
            if ch == '/' && normalized.ends_with('/') {
                continue;
            }
            normalized.push(ch);
        }
        normalized
    }

    /// 组合类型级前缀与方法级后缀，得到路由键
    ///
    /// ```
    /// use mvc_common::PathConventions;
    ///
    /// assert_eq!(PathConventions::compose("/user", "/list"), "/user/list");
    /// assert_eq!(PathConventions::compose("", "/list"), "/list");
    /// ```
    pub fn compose(prefix: &str, suffix: &str) -> String {
        Self::normalize(&format!("{}/{}", prefix, suffix))
    }

    /// 去除上下文路径前缀
    ///
    /// 只按段匹配，`/app` 不匹配 `/application/x`；路径不在上下文路径之下时返回 `None`
    pub fn strip_context_path<'a>(path: &'a str, context_path: &str) -> Option<&'a str> {
        let context_path = context_path.trim_end_matches('/');
        if context_path.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(context_path) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}
