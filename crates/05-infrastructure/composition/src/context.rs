//! 应用上下文
//!
//! 启动完成后的容器与路由表，只读，可通过 `Arc` 在线程间共享

use crate::bootstrapper::BootstrapReport;
use crate::dispatcher::{DispatchOutcome, RequestDispatcher, ResolvedHandler};
use crate::handler_mapping::HandlerMapping;
use ioc_abstractions::BeanLookup;
use ioc_impl::BeanRegistry;
use mvc_common::{ApplicationProperties, Bean, DispatchResult, QualifiedName, Request};
use std::sync::Arc;

/// 应用上下文
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    properties: ApplicationProperties,
    registry: Arc<BeanRegistry>,
    dispatcher: RequestDispatcher,
    report: Arc<BootstrapReport>,
}

impl ApplicationContext {
    pub(crate) fn new(
        properties: ApplicationProperties,
        registry: BeanRegistry,
        routes: HandlerMapping,
        report: BootstrapReport,
    ) -> Self {
        let registry = Arc::new(registry);
        let beans: Arc<dyn BeanLookup> = registry.clone();
        let dispatcher = RequestDispatcher::new(Arc::new(routes), beans)
            .with_context_path(properties.context_path().map(str::to_string));
        Self {
            properties,
            registry,
            dispatcher,
            report: Arc::new(report),
        }
    }

    /// 按 Bean 名称或接口全限定名称查找
    pub fn bean(&self, name: &str) -> Option<&Bean> {
        self.registry.bean(name)
    }

    /// 查找并转换为指定类型
    pub fn bean_as<X>(&self, name: &str) -> Option<Arc<X>>
    where
        X: ?Sized + QualifiedName + 'static,
    {
        self.registry.resolve::<X>(name)
    }

    /// 以类型自身的全限定名称查找
    pub fn bean_of<X>(&self) -> Option<Arc<X>>
    where
        X: ?Sized + QualifiedName + 'static,
    {
        self.registry.resolve_by_type::<X>()
    }

    /// 全部 Bean 键，按注册顺序
    pub fn bean_names(&self) -> Vec<&str> {
        self.registry.bean_names()
    }

    /// 路由表
    pub fn routes(&self) -> &HandlerMapping {
        self.dispatcher.routes()
    }

    /// 按路由键查找处理器
    pub fn resolve(&self, path: &str) -> DispatchResult<Option<ResolvedHandler>> {
        self.dispatcher.resolve(path)
    }

    /// 分发请求
    pub fn dispatch(&self, request: &Request) -> DispatchResult<DispatchOutcome> {
        self.dispatcher.dispatch(request)
    }

    /// 解析原始 URI 并分发
    pub fn dispatch_uri(&self, raw_uri: &str) -> DispatchResult<DispatchOutcome> {
        self.dispatcher.dispatch_uri(raw_uri)
    }

    /// 请求分发器
    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// 启动时使用的配置
    pub fn properties(&self) -> &ApplicationProperties {
        &self.properties
    }

    /// 启动报告
    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }
}
