//! 请求分发

use crate::handler_mapping::{HandlerMapping, RouteEntry};
use ioc_abstractions::BeanLookup;
use mvc_common::{Bean, DispatchError, DispatchResult, HandlerMethod, Request};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// 分发结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// 命中路由，附带处理方法的返回值
    Handled { path: String, body: serde_json::Value },
    /// 没有匹配的路由
    NotFound { path: String },
}

impl DispatchOutcome {
    /// 是否命中路由
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    /// 处理方法的返回值
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Handled { body, .. } => Some(body),
            Self::NotFound { .. } => None,
        }
    }
}

/// 解析得到的处理器：控制器实例加处理方法
#[derive(Debug, Clone)]
pub struct ResolvedHandler {
    bean_name: String,
    controller: Bean,
    method: HandlerMethod,
}

impl ResolvedHandler {
    /// 控制器的 Bean 名称
    pub fn bean_name(&self) -> &str {
        &self.bean_name
    }

    /// 控制器实例
    pub fn controller(&self) -> &Bean {
        &self.controller
    }

    /// 处理方法
    pub fn method(&self) -> &HandlerMethod {
        &self.method
    }

    /// 调用处理方法
    pub fn invoke(&self, request: &Request) -> DispatchResult<serde_json::Value> {
        self.method.invoke(&self.controller, request)
    }
}

/// 请求分发器
///
/// 启动完成后只读，可在多个线程间共享
#[derive(Clone)]
pub struct RequestDispatcher {
    routes: Arc<HandlerMapping>,
    beans: Arc<dyn BeanLookup>,
    context_path: Option<String>,
}

impl RequestDispatcher {
    /// 创建新的分发器
    pub fn new(routes: Arc<HandlerMapping>, beans: Arc<dyn BeanLookup>) -> Self {
        Self {
            routes,
            beans,
            context_path: None,
        }
    }

    /// 设置上下文路径
    pub fn with_context_path(mut self, context_path: Option<String>) -> Self {
        self.context_path = context_path;
        self
    }

    /// 路由表
    pub fn routes(&self) -> &HandlerMapping {
        &self.routes
    }

    /// 按路径查找处理器，未命中返回 `Ok(None)`
    pub fn resolve(&self, path: &str) -> DispatchResult<Option<ResolvedHandler>> {
        match self.routes.get(path) {
            Some(entry) => self.bind(entry).map(Some),
            None => Ok(None),
        }
    }

    fn bind(&self, entry: &RouteEntry) -> DispatchResult<ResolvedHandler> {
        let controller = self.beans.bean(entry.bean_name()).cloned().ok_or_else(|| {
            DispatchError::ControllerMissing {
                bean_name: entry.bean_name().to_string(),
            }
        })?;
        Ok(ResolvedHandler {
            bean_name: entry.bean_name().to_string(),
            controller,
            method: entry.method().clone(),
        })
    }

    /// 将原始 URI 解析为请求，并去除上下文路径
    pub fn request(&self, raw_uri: &str) -> Request {
        let request = Request::parse(raw_uri);
        match &self.context_path {
            Some(context_path) => request.with_context_path(context_path),
            None => request,
        }
    }

    /// 分发请求
    ///
    /// 未命中路由是正常结果，以 [`DispatchOutcome::NotFound`] 返回
    pub fn dispatch(&self, request: &Request) -> DispatchResult<DispatchOutcome> {
        let path = request.path();
        if request.is_outside_context() {
            debug!("请求不在上下文路径之下: {}", path);
            return Ok(DispatchOutcome::NotFound {
                path: path.to_string(),
            });
        }
        match self.resolve(path)? {
            Some(handler) => {
                debug!("分发请求: {} -> {}", path, handler.method().name());
                let body = handler.invoke(request)?;
                Ok(DispatchOutcome::Handled {
                    path: path.to_string(),
                    body,
                })
            }
            None => {
                debug!("未找到路由: {}", path);
                Ok(DispatchOutcome::NotFound {
                    path: path.to_string(),
                })
            }
        }
    }

    /// 解析原始 URI 并分发
    pub fn dispatch_uri(&self, raw_uri: &str) -> DispatchResult<DispatchOutcome> {
        self.dispatch(&self.request(raw_uri))
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("routes", &self.routes.len())
            .field("context_path", &self.context_path)
            .finish()
    }
}
