//! 请求与处理方法定义

use crate::component::Bean;
use crate::conventions::PathConventions;
use crate::errors::DispatchError;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// 入站请求描述
///
/// 由外部传输层提供原始 URI，核心只关心路径和查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    uri: String,
    path: String,
    parameters: HashMap<String, Vec<String>>,
    outside_context: bool,
}

impl Request {
    /// 解析原始 URI
    ///
    /// 接受 origin-form（`/path?query`）与 absolute-form（`http://host/path?query`），
    /// 路径会做百分号解码
    ///
    /// ```
    /// use mvc_common::Request;
    ///
    /// let request = Request::parse("//user//list?name=tom&tag=a&tag=b");
    /// assert_eq!(request.path(), "/user/list");
    /// assert_eq!(request.param("name"), Some("tom"));
    /// assert_eq!(request.params("tag"), ["a", "b"]);
    ///
    /// let absolute = Request::parse("http://localhost:8080/user/%E5%BC%A0%E4%B8%89?id=1");
    /// assert_eq!(absolute.path(), "/user/张三");
    /// assert_eq!(absolute.param("id"), Some("1"));
    /// ```
    pub fn parse(raw_uri: &str) -> Self {
        let target = Self::origin_form(raw_uri);
        let without_fragment = target.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (without_fragment, None),
        };

        let mut parameters: HashMap<String, Vec<String>> = HashMap::new();
        if let Some(query) = query {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                parameters
                    .entry(name.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
        }

        let path = percent_decode_str(path).decode_utf8_lossy();
        Self {
            uri: raw_uri.to_string(),
            path: PathConventions::normalize(&path),
            parameters,
            outside_context: false,
        }
    }

    /// absolute-form 只保留路径与查询部分，其他形式原样返回
    fn origin_form(raw_uri: &str) -> Cow<'_, str> {
        match Url::parse(raw_uri) {
            Ok(url) if url.has_host() => match url.query() {
                Some(query) => Cow::Owned(format!("{}?{}", url.path(), query)),
                None => Cow::Owned(url.path().to_string()),
            },
            _ => Cow::Borrowed(raw_uri),
        }
    }

    /// 去除上下文路径
    ///
    /// 路径不在上下文路径之下时保持原样，并标记为上下文之外，分发时不会匹配任何路由
    pub fn with_context_path(mut self, context_path: &str) -> Self {
        let stripped = PathConventions::strip_context_path(&self.path, context_path)
            .map(PathConventions::normalize);
        match stripped {
            Some(path) => self.path = path,
            None => self.outside_context = true,
        }
        self
    }

    /// 是否位于应用上下文路径之外
    pub fn is_outside_context(&self) -> bool {
        self.outside_context
    }

    /// 追加请求参数
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// 原始 URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// 规范化后的请求路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 获取参数的第一个值
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// 获取参数的全部值
    pub fn params(&self, name: &str) -> &[String] {
        self.parameters.get(name).map_or(&[], Vec::as_slice)
    }

    /// 全部参数
    pub fn parameters(&self) -> &HashMap<String, Vec<String>> {
        &self.parameters
    }
}

type InvokeFn =
    Arc<dyn Fn(&Bean, &Request) -> Result<serde_json::Value, DispatchError> + Send + Sync>;

/// 请求处理方法
#[derive(Clone)]
pub struct HandlerMethod {
    name: &'static str,
    path: String,
    invoke: InvokeFn,
}

impl HandlerMethod {
    /// 创建处理方法
    ///
    /// `handler` 的返回值会被序列化为 JSON
    pub fn new<C, R, F>(name: &'static str, path: impl Into<String>, handler: F) -> Self
    where
        C: Any + Send + Sync,
        R: Serialize,
        F: Fn(&C, &Request) -> anyhow::Result<R> + Send + Sync + 'static,
    {
        let invoke: InvokeFn = Arc::new(move |bean: &Bean, request: &Request| {
            let controller =
                bean.downcast::<C>()
                    .ok_or_else(|| DispatchError::HandlerTypeMismatch {
                        method: name.to_string(),
                        expected: std::any::type_name::<C>().to_string(),
                        actual: bean.qualified_name().to_string(),
                    })?;
            let output =
                handler(&*controller, request).map_err(|source| DispatchError::HandlerFailed {
                    path: request.path().to_string(),
                    method: name.to_string(),
                    source,
                })?;
            serde_json::to_value(output).map_err(|source| DispatchError::SerializationFailed {
                method: name.to_string(),
                source,
            })
        });

        Self {
            name,
            path: path.into(),
            invoke,
        }
    }

    /// 方法名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 方法级路径后缀
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 在指定控制器实例上调用
    pub fn invoke(&self, controller: &Bean, request: &Request) -> Result<serde_json::Value, DispatchError> {
        (self.invoke)(controller, request)
    }
}

impl fmt::Debug for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// 控制器的请求处理方法表
///
/// 通常由 `#[routes]` 宏生成；没有处理方法的控制器可以写一个空实现
pub trait RequestMappings {
    /// 全部处理方法
    fn handler_methods() -> Vec<HandlerMethod> {
        Vec::new()
    }
}
