//! 组件基础接口定义
//!
//! 以显式注册表代替运行时反射：每个组件类型对应一个 [`ComponentDefinition`]，
//! 其中记录零参构造器、实现的接口、可注入字段以及请求处理方法。

use crate::errors::{ComponentError, InjectionError};
use crate::handler::HandlerMethod;
use crate::metadata::{ComponentDescriptor, ComponentKind, TypeName};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 具有全限定名称的类型
///
/// 组件结构体与 `dyn Trait` 接口类型都通过此 trait 提供查找键，
/// 名称格式见 [`TypeName::qualify`]
pub trait QualifiedName {
    /// 全限定名称
    fn qualified_name() -> String;
}

/// 类型擦除后的组件实例
#[derive(Clone)]
pub struct BeanRef {
    type_name: Arc<str>,
    address: usize,
    instance: Arc<dyn Any + Send + Sync>,
}

impl BeanRef {
    /// 包装组件实例
    pub fn new<T: Any + Send + Sync>(type_name: &str, instance: Arc<T>) -> Self {
        let address = Arc::as_ptr(&instance) as *const () as usize;
        Self {
            type_name: Arc::from(type_name),
            address,
            instance,
        }
    }

    /// 实例的全限定类型名称
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// 尝试还原为具体类型
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance).downcast::<T>().ok()
    }

    /// 是否为指定具体类型
    pub fn is<T: Any + Send + Sync>(&self) -> bool {
        self.instance.is::<T>()
    }

    /// 是否指向同一个实例
    pub fn same_instance(&self, other: &BeanRef) -> bool {
        self.address == other.address
    }
}

impl fmt::Debug for BeanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanRef")
            .field("type_name", &self.type_name)
            .field("address", &format_args!("{:#x}", self.address))
            .finish()
    }
}

/// 容器中的 Bean：实例加上其组件定义
#[derive(Clone)]
pub struct Bean {
    instance: BeanRef,
    definition: Arc<ComponentDefinition>,
}

impl Bean {
    /// 创建新的 Bean
    pub fn new(instance: BeanRef, definition: Arc<ComponentDefinition>) -> Self {
        Self {
            instance,
            definition,
        }
    }

    /// 类型擦除后的实例
    pub fn instance(&self) -> &BeanRef {
        &self.instance
    }

    /// 组件定义
    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    /// 全限定类型名称
    pub fn qualified_name(&self) -> &str {
        self.definition.qualified_name()
    }

    /// 组件种类
    pub fn kind(&self) -> &ComponentKind {
        self.definition.kind()
    }

    /// 还原为具体类型
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.instance.downcast::<T>()
    }

    /// 以具体类型或其实现的接口类型查看实例
    pub fn resolve_as<X: ?Sized + QualifiedName + 'static>(&self) -> Option<Arc<X>> {
        let view = self
            .definition
            .view(&X::qualified_name(), &self.instance)?;
        view.downcast::<Arc<X>>().ok().map(|boxed| *boxed)
    }

    /// 是否指向同一个实例
    pub fn same_instance(&self, other: &Bean) -> bool {
        self.instance.same_instance(&other.instance)
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("qualified_name", &self.qualified_name())
            .field("kind", self.kind())
            .field("instance", &self.instance)
            .finish()
    }
}

/// 可注入字段
///
/// 容器在所有组件实例化之后再进行绑定，因此字段使用一次性写入的内部槽位，
/// 循环依赖的两个组件都能完成绑定。未找到依赖时字段保持未绑定状态。
pub struct Autowired<T: ?Sized> {
    slot: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// 创建未绑定的字段
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// 获取已绑定的依赖
    pub fn get(&self) -> Option<&Arc<T>> {
        self.slot.get()
    }

    /// 获取已绑定依赖的克隆
    pub fn cloned(&self) -> Option<Arc<T>> {
        self.slot.get().cloned()
    }

    /// 获取已绑定的依赖，未绑定时返回错误
    pub fn require(&self, field: &str) -> Result<&Arc<T>, InjectionError> {
        self.slot.get().ok_or_else(|| InjectionError::Unbound {
            field: field.to_string(),
            target: std::any::type_name::<T>().to_string(),
        })
    }

    /// 是否已绑定
    pub fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }

    /// 绑定依赖，返回本次是否发生了绑定
    pub fn bind(&self, value: Arc<T>) -> bool {
        self.slot.set(value).is_ok()
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("target", &std::any::type_name::<T>())
            .field("bound", &self.is_bound())
            .finish()
    }
}

type FactoryFn = Arc<dyn Fn() -> Result<BeanRef, ComponentError> + Send + Sync>;
type ViewFn = Arc<dyn Fn(&BeanRef) -> Option<Box<dyn Any>> + Send + Sync>;
type BindFn = Arc<dyn Fn(&Bean, &Bean) -> Result<bool, InjectionError> + Send + Sync>;

/// 接口别名绑定
#[derive(Clone)]
pub struct InterfaceBinding {
    name: String,
    view: ViewFn,
}

impl InterfaceBinding {
    /// 接口全限定名称
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("name", &self.name)
            .finish()
    }
}

/// 注入点：组件上一个标记为可注入的字段
#[derive(Clone)]
pub struct InjectionPoint {
    field: &'static str,
    explicit_key: Option<String>,
    declared_type: String,
    bind: BindFn,
}

impl InjectionPoint {
    /// 字段名称
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// 显式指定的查找键（空白视为未指定）
    pub fn explicit_key(&self) -> Option<&str> {
        self.explicit_key.as_deref()
    }

    /// 字段声明类型的全限定名称
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// 查找键：显式键优先，否则为声明类型的全限定名称
    pub fn lookup_key(&self) -> &str {
        self.explicit_key.as_deref().unwrap_or(&self.declared_type)
    }

    /// 将依赖绑定到所属实例的字段上
    ///
    /// 返回 `Ok(false)` 表示字段此前已经绑定
    pub fn bind(&self, owner: &Bean, dependency: &Bean) -> Result<bool, InjectionError> {
        (self.bind)(owner, dependency)
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionPoint")
            .field("field", &self.field)
            .field("lookup_key", &self.lookup_key())
            .finish()
    }
}

/// 组件定义
///
/// 注册表中的一条记录，相当于运行时反射能得到的全部类型信息
pub struct ComponentDefinition {
    qualified_name: String,
    kind: ComponentKind,
    factory: FactoryFn,
    upcast: ViewFn,
    interfaces: Vec<InterfaceBinding>,
    injection_points: Vec<InjectionPoint>,
    request_mapping: Option<String>,
    handlers: fn() -> Vec<HandlerMethod>,
}

impl ComponentDefinition {
    /// 以类型自身的全限定名称创建构建器
    pub fn builder<T>() -> DefinitionBuilder<T>
    where
        T: QualifiedName + Any + Send + Sync,
    {
        DefinitionBuilder::new(T::qualified_name())
    }

    /// 以指定的全限定名称创建构建器
    pub fn builder_named<T>(qualified_name: impl Into<String>) -> DefinitionBuilder<T>
    where
        T: Any + Send + Sync,
    {
        DefinitionBuilder::new(qualified_name.into())
    }

    /// 全限定类型名称
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// 简单类型名称
    pub fn simple_name(&self) -> &str {
        TypeName::simple_name(&self.qualified_name)
    }

    /// 组件种类
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// 组件描述符
    pub fn descriptor(&self) -> ComponentDescriptor {
        ComponentDescriptor::new(self.qualified_name.clone(), self.kind.clone())
    }

    /// 类型级请求路径前缀
    pub fn request_mapping(&self) -> Option<&str> {
        self.request_mapping.as_deref()
    }

    /// 实现的接口名称
    pub fn interface_names(&self) -> impl Iterator<Item = &str> {
        self.interfaces.iter().map(InterfaceBinding::name)
    }

    /// 可注入字段
    pub fn injection_points(&self) -> &[InjectionPoint] {
        &self.injection_points
    }

    /// 请求处理方法
    pub fn handler_methods(&self) -> Vec<HandlerMethod> {
        (self.handlers)()
    }

    /// 调用零参构造器创建实例
    pub fn instantiate(&self) -> Result<BeanRef, ComponentError> {
        (self.factory)()
    }

    /// 以指定类型名称查看实例，名称可以是组件自身或其实现的接口
    pub fn view(&self, qualified_name: &str, instance: &BeanRef) -> Option<Box<dyn Any>> {
        if qualified_name == self.qualified_name {
            return (self.upcast)(instance);
        }
        self.interfaces
            .iter()
            .find(|binding| binding.name == qualified_name)
            .and_then(|binding| (binding.view)(instance))
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("qualified_name", &self.qualified_name)
            .field("kind", &self.kind)
            .field("interfaces", &self.interfaces)
            .field("injection_points", &self.injection_points)
            .field("request_mapping", &self.request_mapping)
            .finish()
    }
}

/// 组件定义构建器
pub struct DefinitionBuilder<T> {
    qualified_name: String,
    kind: ComponentKind,
    factory: Option<FactoryFn>,
    interfaces: Vec<InterfaceBinding>,
    injection_points: Vec<InjectionPoint>,
    request_mapping: Option<String>,
    handlers: fn() -> Vec<HandlerMethod>,
    _component: PhantomData<fn() -> T>,
}

impl<T> DefinitionBuilder<T>
where
    T: Any + Send + Sync,
{
    fn new(qualified_name: String) -> Self {
        Self {
            qualified_name,
            kind: ComponentKind::Untagged,
            factory: None,
            interfaces: Vec::new(),
            injection_points: Vec::new(),
            request_mapping: None,
            handlers: Vec::new,
            _component: PhantomData,
        }
    }

    /// 设置组件种类
    pub fn kind(mut self, kind: ComponentKind) -> Self {
        self.kind = kind;
        self
    }

    /// 标记为控制器
    pub fn controller(self) -> Self {
        self.kind(ComponentKind::Controller)
    }

    /// 标记为业务组件
    pub fn service(self) -> Self {
        self.kind(ComponentKind::service())
    }

    /// 标记为带显式名称的业务组件
    pub fn named_service(self, name: impl Into<String>) -> Self {
        self.kind(ComponentKind::named_service(name))
    }

    /// 设置类型级请求路径前缀
    pub fn request_mapping(mut self, path: impl Into<String>) -> Self {
        self.request_mapping = Some(path.into());
        self
    }

    /// 使用可失败的零参构造函数，返回的错误与构造过程中的 panic 都会被转为实例化错误
    pub fn constructor<E>(mut self, constructor: fn() -> Result<T, E>) -> Self
    where
        E: fmt::Display + 'static,
    {
        let type_name = self.qualified_name.clone();
        self.factory = Some(Arc::new(move || {
            match std::panic::catch_unwind(constructor) {
                Ok(Ok(instance)) => Ok(BeanRef::new(&type_name, Arc::new(instance))),
                Ok(Err(e)) => Err(ComponentError::instantiation_failed(
                    type_name.as_str(),
                    e.to_string(),
                )),
                Err(payload) => Err(ComponentError::instantiation_failed(
                    type_name.as_str(),
                    panic_message(&*payload),
                )),
            }
        }));
        self
    }

    /// 使用 `Default::default()` 作为零参构造函数，构造过程中的 panic 会被转为实例化错误
    pub fn default_constructor(mut self) -> Self
    where
        T: Default,
    {
        let type_name = self.qualified_name.clone();
        self.factory = Some(Arc::new(move || {
            std::panic::catch_unwind(T::default)
                .map(|instance| BeanRef::new(&type_name, Arc::new(instance)))
                .map_err(|payload| {
                    ComponentError::instantiation_failed(type_name.as_str(), panic_message(&*payload))
                })
        }));
        self
    }

    /// 声明实现的接口，`cast` 负责把具体实例转换为接口实例
    pub fn implements<I>(mut self, cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + QualifiedName + Send + Sync + 'static,
    {
        let view: ViewFn = Arc::new(move |instance: &BeanRef| {
            instance
                .downcast::<T>()
                .map(|concrete| Box::new(cast(concrete)) as Box<dyn Any>)
        });
        self.interfaces.push(InterfaceBinding {
            name: I::qualified_name(),
            view,
        });
        self
    }

    /// 声明可注入字段
    ///
    /// `key` 为空或空白时使用字段声明类型的全限定名称作为查找键
    pub fn inject<X>(
        mut self,
        field: &'static str,
        key: Option<&str>,
        accessor: fn(&T) -> &Autowired<X>,
    ) -> Self
    where
        X: ?Sized + QualifiedName + Send + Sync + 'static,
    {
        let declared_type = X::qualified_name();
        let explicit_key = key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        let lookup_key = explicit_key.clone().unwrap_or_else(|| declared_type.clone());
        let expected = declared_type.clone();
        let owner_type = self.qualified_name.clone();
        let bind: BindFn = Arc::new(move |owner: &Bean, dependency: &Bean| {
            let target = owner
                .downcast::<T>()
                .ok_or_else(|| InjectionError::OwnerTypeMismatch {
                    expected: owner_type.clone(),
                    actual: owner.qualified_name().to_string(),
                })?;
            let value = dependency.resolve_as::<X>().ok_or_else(|| {
                InjectionError::IncompatibleDependency {
                    field: field.to_string(),
                    key: lookup_key.clone(),
                    expected: expected.clone(),
                    actual: dependency.qualified_name().to_string(),
                }
            })?;
            Ok(accessor(&target).bind(value))
        });
        self.injection_points.push(InjectionPoint {
            field,
            explicit_key,
            declared_type,
            bind,
        });
        self
    }

    /// 设置请求处理方法的来源
    pub fn handlers(mut self, handlers: fn() -> Vec<HandlerMethod>) -> Self {
        self.handlers = handlers;
        self
    }

    /// 构建组件定义
    ///
    /// 未设置构造器时，实例化总是失败（相当于缺少零参构造器）
    pub fn build(self) -> ComponentDefinition {
        let type_name = self.qualified_name.clone();
        let factory: FactoryFn = match self.factory {
            Some(factory) => factory,
            None => Arc::new(move || {
                Err::<BeanRef, _>(ComponentError::instantiation_failed(
                    type_name.as_str(),
                    "缺少零参构造器",
                ))
            }),
        };
        let upcast: ViewFn = Arc::new(|instance: &BeanRef| {
            instance
                .downcast::<T>()
                .map(|concrete| Box::new(concrete) as Box<dyn Any>)
        });

        ComponentDefinition {
            qualified_name: self.qualified_name,
            kind: self.kind,
            factory,
            upcast,
            interfaces: self.interfaces,
            injection_points: self.injection_points,
            request_mapping: self.request_mapping,
            handlers: self.handlers,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "构造过程中发生未知 panic".to_string()
    }
}
