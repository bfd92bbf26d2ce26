//! 应用配置定义

use crate::errors::{ConfigError, ConfigResult};
use std::collections::BTreeMap;

/// 应用属性
///
/// 键不区分大小写，统一以小写形式保存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationProperties {
    entries: BTreeMap<String, String>,
}

impl ApplicationProperties {
    /// 扫描根包（必填）
    pub const SCAN_PACKAGE: &'static str = "scanPackage";
    /// 文件系统扫描根目录
    pub const CLASSPATH: &'static str = "classpath";
    /// 严格模式：重复的 Bean 或路由键直接报错
    pub const STRICT_MODE: &'static str = "strictMode";
    /// 上下文路径
    pub const CONTEXT_PATH: &'static str = "contextPath";
    /// 文件系统扫描时只接受此扩展名
    pub const SCAN_EXTENSION: &'static str = "scanExtension";

    /// 创建空的属性集
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置属性
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// 插入属性，返回旧值
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        self.entries.insert(normalize_key(key), value.into())
    }

    /// 获取属性
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&normalize_key(key)).map(String::as_str)
    }

    /// 获取去除空白后非空的属性
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }

    /// 获取必填属性，缺失或为空白时报错
    pub fn require(&self, key: &str) -> ConfigResult<&str> {
        self.get_non_blank(key).ok_or_else(|| ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// 获取布尔属性
    pub fn get_bool(&self, key: &str, default: bool) -> ConfigResult<bool> {
        match self.get_non_blank(key) {
            None => Ok(default),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(true),
                "false" | "no" | "off" | "0" => Ok(false),
                _ => Err(ConfigError::TypeConversionError {
                    key: key.to_string(),
                    value: value.to_string(),
                    message: "期望布尔值".to_string(),
                }),
            },
        }
    }

    /// 扫描根包
    pub fn scan_package(&self) -> ConfigResult<&str> {
        self.require(Self::SCAN_PACKAGE)
    }

    /// 文件系统扫描根目录
    pub fn classpath(&self) -> Option<&str> {
        self.get_non_blank(Self::CLASSPATH)
    }

    /// 是否启用严格模式，默认关闭
    pub fn strict_mode(&self) -> ConfigResult<bool> {
        self.get_bool(Self::STRICT_MODE, false)
    }

    /// 上下文路径
    pub fn context_path(&self) -> Option<&str> {
        self.get_non_blank(Self::CONTEXT_PATH)
    }

    /// 文件扩展名过滤，前导的 `.` 会被去掉
    pub fn scan_extension(&self) -> Option<&str> {
        self.get_non_blank(Self::SCAN_EXTENSION)
            .map(|extension| extension.trim_start_matches('.'))
    }

    /// 全部属性
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// 属性数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ApplicationProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.insert(key.as_ref(), value);
        }
        properties
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}
