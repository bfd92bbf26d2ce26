//! # Component Macros
//!
//! 这个 crate 提供了声明控制器、业务组件、接口与处理方法的过程宏。
//! 生成的代码在进程启动时把组件定义写入 `mvc_common` 的全局组件表，
//! 使用方 crate 需要同时依赖 `mvc-common` 与 `ctor`。
//!
//! ## 核心宏
//!
//! - [`controller`] - 声明控制器
//! - [`service`] - 声明业务组件
//! - [`interface`] - 声明可注入的接口
//! - [`routes`] - 声明控制器的处理方法
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{controller, interface, routes, service};
//! use mvc_common::{Autowired, Request};
//!
//! #[interface]
//! pub trait UserService {
//!     fn list(&self) -> Vec<String>;
//! }
//!
//! #[service(implements(UserService))]
//! #[derive(Default)]
//! pub struct UserServiceImpl;
//!
//! impl UserService for UserServiceImpl {
//!     fn list(&self) -> Vec<String> {
//!         vec!["alice".to_string()]
//!     }
//! }
//!
//! #[controller]
//! #[request_mapping("/user")]
//! #[derive(Default)]
//! pub struct UserController {
//!     #[autowired]
//!     users: Autowired<dyn UserService>,
//! }
//!
//! #[routes]
//! impl UserController {
//!     #[request_mapping("/list")]
//!     fn list(&self, _request: &Request) -> anyhow::Result<Vec<String>> {
//!         Ok(self.users.require("users")?.list())
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod component;
mod interface;
mod routes;
mod utils;

use component::ComponentKind;

/// 声明控制器
///
/// 控制器的 Bean 名称总是由类型简单名称首字母小写得到。
///
/// # 参数
///
/// - `constructor = "path::to::fn"` - 使用可失败的零参构造函数（默认使用 `Default`）
///
/// # 辅助属性
///
/// - `#[request_mapping("/prefix")]` - 类型级路径前缀，必须写在 `#[controller]` 之后
/// - `#[autowired]` / `#[autowired("beanName")]` - 标记 `Autowired<T>` 字段
///
/// 没有使用 [`routes`] 的控制器需要提供空的 `impl RequestMappings for X {}`。
#[proc_macro_attribute]
pub fn controller(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(ComponentKind::Controller, args, input)
}

/// 声明业务组件
///
/// # 参数
///
/// - `"beanName"` 或 `name = "beanName"` - 显式 Bean 名称
/// - `implements(TraitA, path::TraitB)` - 以接口名称作为别名注册
/// - `constructor = "path::to::fn"` - 使用可失败的零参构造函数
///
/// # 示例
///
/// ```rust,ignore
/// #[service("auditLog", implements(AuditSink))]
/// #[derive(Default)]
/// pub struct FileAuditLog;
/// ```
#[proc_macro_attribute]
pub fn service(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(ComponentKind::Service, args, input)
}

/// 声明可注入的接口
///
/// 自动补充 `Send + Sync` 约束，并为 `dyn Trait` 生成全限定名称。
#[proc_macro_attribute]
pub fn interface(args: TokenStream, input: TokenStream) -> TokenStream {
    interface::interface_impl(args, input)
}

/// 声明控制器的处理方法
///
/// 用于控制器的固有 impl 块，带 `#[request_mapping("/path")]` 的方法成为处理方法。
/// 方法签名为 `fn(&self)` 或 `fn(&self, &Request)`，返回值需实现 `Serialize`，
/// 返回 `Result` 时错误会转换为处理器错误。
#[proc_macro_attribute]
pub fn routes(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::routes_impl(args, input)
}
