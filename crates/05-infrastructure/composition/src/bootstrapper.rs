//! 启动器
//!
//! 按固定顺序执行四个阶段：扫描 -> 注册 -> 注入 -> 路由构建。
//! 任一阶段出现致命错误时整体失败，不会产生可用的上下文。

use crate::context::ApplicationContext;
use crate::handler_mapping::HandlerMapping;
use ioc_abstractions::{
    ComponentScanner, ContainerConfig, DependencyInjector, InjectionRecord, InjectionReport,
    Overwrite, ScanOptions,
};
use ioc_impl::{BeanRegistry, CatalogScanner, ClasspathScanner, FieldInjector};
use mvc_common::{ApplicationProperties, BootstrapResult, ComponentCatalog};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 启动报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapReport {
    /// 扫描根包
    pub scan_package: String,
    /// 使用的扫描器
    pub scanner: String,
    /// 扫描到的类型数量
    pub scanned: usize,
    /// 已注册的 Bean 名称
    pub registered: Vec<String>,
    /// 未标注而跳过的类型
    pub skipped: Vec<String>,
    /// 实例化失败的类型及原因
    pub failed: Vec<FailedComponent>,
    /// 已绑定的注入点
    pub injected: Vec<String>,
    /// 未解析的注入点
    pub unresolved: Vec<String>,
    /// 路由键
    pub routes: Vec<String>,
    /// Bean 与路由的键覆盖
    pub overwrites: Vec<String>,
}

/// 实例化失败的组件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedComponent {
    /// 类型名称
    pub type_name: String,
    /// 失败原因
    pub message: String,
}

impl BootstrapReport {
    fn record_injections(&mut self, report: &InjectionReport) {
        let describe =
            |record: &InjectionRecord| format!("{}.{} <- {}", record.owner, record.field, record.key);
        self.injected = report.bound.iter().map(describe).collect();
        self.unresolved = report
            .unresolved
            .iter()
            .map(describe)
            .chain(
                report
                    .rejected
                    .iter()
                    .map(|(record, error)| format!("{} ({})", describe(record), error)),
            )
            .collect();
    }

    fn record_overwrites<'a>(&mut self, overwrites: impl IntoIterator<Item = &'a Overwrite>) {
        self.overwrites
            .extend(overwrites.into_iter().map(Overwrite::to_string));
    }
}

impl fmt::Display for BootstrapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "扫描 {} 个类型 ({}), 注册 {} 个 Bean, 跳过 {} 个, 失败 {} 个, 注入 {} 个字段, 未解析 {} 个, 路由 {} 条, 覆盖 {} 次",
            self.scanned,
            self.scanner,
            self.registered.len(),
            self.skipped.len(),
            self.failed.len(),
            self.injected.len(),
            self.unresolved.len(),
            self.routes.len(),
            self.overwrites.len()
        )
    }
}

/// 启动器
pub struct Bootstrapper {
    properties: ApplicationProperties,
    catalog: Option<Arc<ComponentCatalog>>,
    scanner: Option<Box<dyn ComponentScanner>>,
    injector: Box<dyn DependencyInjector>,
}

impl Bootstrapper {
    /// 创建新的启动器
    pub fn new(properties: ApplicationProperties) -> Self {
        Self {
            properties,
            catalog: None,
            scanner: None,
            injector: Box::new(FieldInjector::new()),
        }
    }

    /// 指定组件目录，默认使用全局注册的组件定义
    pub fn with_catalog(mut self, catalog: Arc<ComponentCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 指定扫描器，默认根据 `classpath` 配置选择目录扫描或组件目录扫描
    pub fn with_scanner(mut self, scanner: Box<dyn ComponentScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// 执行启动
    pub fn bootstrap(self) -> BootstrapResult<ApplicationContext> {
        info!("开始启动应用上下文");

        let scan_package = self.properties.scan_package()?.to_string();
        let container_config = ContainerConfig::from_properties(&self.properties)?;
        debug!("容器配置: {:?}", container_config);

        let catalog = self
            .catalog
            .clone()
            .unwrap_or_else(|| Arc::new(ComponentCatalog::global()));
        let scanner = match self.scanner {
            Some(scanner) => scanner,
            None => default_scanner(&self.properties, &catalog),
        };

        let mut report = BootstrapReport {
            scan_package: scan_package.clone(),
            scanner: scanner.name().to_string(),
            ..BootstrapReport::default()
        };

        // 第一步：扫描
        info!("扫描组件: {} ({})", scan_package, scanner.name());
        let names = scanner.scan(&scan_package)?;
        report.scanned = names.len();

        // 第二步：实例化并注册
        let mut registry = BeanRegistry::new(catalog).with_config(container_config.clone());
        let summary = registry.register_all(&names)?;
        report.registered = summary.registered;
        report.skipped = summary.skipped;
        report.failed = summary
            .failed
            .into_iter()
            .map(|(type_name, message)| FailedComponent { type_name, message })
            .collect();

        // 第三步：字段注入，必须在全部实例创建之后
        let injections = self.injector.inject_all(&registry);
        report.record_injections(&injections);

        // 第四步：构建路由表
        let routes = HandlerMapping::build(&registry, container_config.overwrite_policy)?;
        report.routes = routes.paths().map(str::to_string).collect();

        report.record_overwrites(
            ioc_abstractions::ComponentRegistry::overwrites(&registry)
                .iter()
                .chain(routes.overwrites()),
        );

        info!("应用上下文启动完成: {}", report);
        Ok(ApplicationContext::new(self.properties, registry, routes, report))
    }
}

fn default_scanner(
    properties: &ApplicationProperties,
    catalog: &Arc<ComponentCatalog>,
) -> Box<dyn ComponentScanner> {
    match properties.classpath() {
        Some(classpath) => {
            let mut options = ScanOptions::default();
            if let Some(extension) = properties.scan_extension() {
                options = options.with_file_extension(extension);
            }
            Box::new(ClasspathScanner::new(classpath).with_options(options))
        }
        None => Box::new(CatalogScanner::new(Arc::clone(catalog))),
    }
}

impl fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("properties", &self.properties)
            .field("catalog", &self.catalog.as_ref().map(|c| c.len()))
            .field("scanner", &self.scanner.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}
