//! 组件扫描器抽象接口
//!
//! 提供从包根路径发现候选类型的能力

use mvc_common::ComponentResult;

/// 组件扫描器 trait
///
/// 给定点分隔的包路径，返回其下（含子包）全部类型的全限定名称。
/// 同一输入的多次扫描必须得到相同的结果和顺序。
pub trait ComponentScanner: Send + Sync {
    /// 扫描指定包中的类型
    fn scan(&self, package: &str) -> ComponentResult<Vec<String>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 检查是否支持指定的扫描目标
    fn supports(&self, package: &str) -> bool {
        mvc_common::TypeName::is_valid_package(package)
    }
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 是否递归扫描子包
    pub recursive: bool,
    /// 只接受此扩展名的文件，为空表示接受全部文件
    pub file_extension: Option<String>,
    /// 是否跳过隐藏文件和目录
    pub skip_hidden: bool,
}

impl ScanOptions {
    /// 设置扩展名过滤
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.');
        self.file_extension = (!extension.is_empty()).then(|| extension.to_string());
        self
    }

    /// 设置是否递归
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 检查扩展名是否满足过滤条件
    pub fn accepts_extension(&self, extension: Option<&str>) -> bool {
        match (&self.file_extension, extension) {
            (None, _) => true,
            (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            file_extension: None,
            skip_hidden: true,
        }
    }
}
