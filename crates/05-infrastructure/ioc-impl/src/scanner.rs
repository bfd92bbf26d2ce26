//! 组件扫描器实现

use ioc_abstractions::{ComponentScanner, ScanOptions};
use mvc_common::{ComponentCatalog, ComponentError, ComponentResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// 基于目录树的扫描器
///
/// 包路径 `a.b` 对应目录 `<root>/a/b`，其下每个文件贡献一个类型名称：
/// `<root>/a/b/c/Foo.class` 得到 `a.b.c.Foo`
#[derive(Debug, Clone)]
pub struct ClasspathScanner {
    root: PathBuf,
    options: ScanOptions,
}

impl ClasspathScanner {
    /// 创建新的目录扫描器
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: ScanOptions::default(),
        }
    }

    /// 设置扫描选项
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    fn package_dir(&self, package: &str) -> PathBuf {
        package
            .split('.')
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    fn qualified_name(package: &str, package_dir: &Path, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(package_dir).ok()?;
        let stem = relative.file_stem()?.to_string_lossy();
        let mut segments = vec![package.to_string()];
        if let Some(parent) = relative.parent() {
            segments.extend(
                parent
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy().into_owned()),
            );
        }
        segments.push(stem.into_owned());
        Some(segments.join("."))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |name| name.starts_with('.'))
}

impl ComponentScanner for ClasspathScanner {
    fn scan(&self, package: &str) -> ComponentResult<Vec<String>> {
        if !self.supports(package) {
            return Err(ComponentError::scan_error(format!("无效的包路径: '{}'", package)));
        }

        let package_dir = self.package_dir(package);
        if !package_dir.is_dir() {
            return Err(ComponentError::scan_error(format!(
                "无法解析扫描根路径: {} -> {}",
                package,
                package_dir.display()
            )));
        }

        info!("开始扫描目录: {}", package_dir.display());

        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let skip_hidden = self.options.skip_hidden;
        let walker = WalkDir::new(&package_dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && is_hidden(entry)));

        let mut names = Vec::new();
        for entry in walker {
            let entry = entry
                .map_err(|e| ComponentError::scan_error(format!("遍历目录失败: {}", e)))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let extension = entry.path().extension().and_then(|e| e.to_str());
            if !self.options.accepts_extension(extension) {
                debug!("跳过扩展名不匹配的文件: {}", entry.path().display());
                continue;
            }

            if let Some(name) = Self::qualified_name(package, &package_dir, entry.path()) {
                debug!("发现类型: {}", name);
                names.push(name);
            }
        }

        info!("目录扫描完成，发现 {} 个类型", names.len());
        Ok(names)
    }

    fn name(&self) -> &str {
        "ClasspathScanner"
    }
}

/// 基于组件目录的扫描器
///
/// 不访问文件系统，直接从编译期注册的组件目录中按包前缀筛选
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    catalog: Arc<ComponentCatalog>,
}

impl CatalogScanner {
    /// 创建新的目录扫描器
    pub fn new(catalog: Arc<ComponentCatalog>) -> Self {
        Self { catalog }
    }
}

impl ComponentScanner for CatalogScanner {
    fn scan(&self, package: &str) -> ComponentResult<Vec<String>> {
        if !self.supports(package) {
            return Err(ComponentError::scan_error(format!("无效的包路径: '{}'", package)));
        }

        let names = self.catalog.names_in_package(package);
        if names.is_empty() {
            return Err(ComponentError::scan_error(format!(
                "组件目录中不存在包: {}",
                package
            )));
        }

        info!("组件目录扫描完成: {} 下发现 {} 个类型", package, names.len());
        Ok(names)
    }

    fn name(&self) -> &str {
        "CatalogScanner"
    }
}
