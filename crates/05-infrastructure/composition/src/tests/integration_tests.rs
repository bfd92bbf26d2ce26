//! 应用构建器与启动器集成测试

use crate::builder::ApplicationBuilder;
use crate::bootstrapper::Bootstrapper;
use crate::dispatcher::DispatchOutcome;
use mvc_common::{
    ApplicationProperties, Autowired, BootstrapError, ComponentCatalog, ComponentDefinition,
    ComponentError, HandlerMethod, QualifiedName, Request,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok(); // 忽略初始化失败的错误
    });
}

trait Greeting: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

impl QualifiedName for dyn Greeting {
    fn qualified_name() -> String {
        "hello.service.Greeting".to_string()
    }
}

#[derive(Default)]
struct PoliteGreeting;

impl Greeting for PoliteGreeting {
    fn greet(&self, name: &str) -> String {
        format!("你好, {}", name)
    }
}

#[derive(Default)]
struct HelloController {
    greeting: Autowired<dyn Greeting>,
}

fn hello_handlers() -> Vec<HandlerMethod> {
    vec![HandlerMethod::new(
        "say",
        "/say",
        |controller: &HelloController, request: &Request| -> anyhow::Result<serde_json::Value> {
            let greeting = controller
                .greeting
                .get()
                .ok_or_else(|| anyhow::anyhow!("greeting 未注入"))?;
            Ok(json!({ "message": greeting.greet(request.param("name").unwrap_or("world")) }))
        },
    )]
}

fn catalog() -> Arc<ComponentCatalog> {
    Arc::new(
        ComponentCatalog::new()
            .with(
                ComponentDefinition::builder_named::<PoliteGreeting>("hello.service.PoliteGreeting")
                    .service()
                    .default_constructor()
                    .implements::<dyn Greeting>(|g| g as Arc<dyn Greeting>)
                    .build(),
            )
            .with(
                ComponentDefinition::builder_named::<HelloController>("hello.web.HelloController")
                    .controller()
                    .request_mapping("/hello")
                    .default_constructor()
                    .inject::<dyn Greeting>("greeting", None, |c| &c.greeting)
                    .handlers(hello_handlers)
                    .build(),
            ),
    )
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

/// 测试从属性文件构建完整上下文
#[test]
fn test_builder_with_properties_file() {
    init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("application.properties");
    fs::write(&config_path, "scanPackage=hello\ncontextPath=/app\n").unwrap();

    let context = ApplicationBuilder::new()
        .without_environment()
        .add_config_file(&config_path)
        .with_catalog(catalog())
        .build()
        .expect("上下文构建应该成功");

    let outcome = context.dispatch_uri("/app/hello/say?name=Rust").unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Handled {
            path: "/hello/say".to_string(),
            body: json!({ "message": "你好, Rust" }),
        }
    );

    let report = context.report();
    assert_eq!(report.scanner, "CatalogScanner");
    assert_eq!(report.registered, vec!["politeGreeting", "helloController"]);
    assert_eq!(report.routes, vec!["/hello/say"]);
    assert!(report.unresolved.is_empty());
}

/// 测试目录扫描与扩展名过滤
#[test]
fn test_bootstrap_with_classpath_scanner() {
    init_test_logger();

    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "hello/service/PoliteGreeting.class");
    touch(dir.path(), "hello/web/HelloController.class");
    touch(dir.path(), "hello/web/HelloController$1.class");
    touch(dir.path(), "hello/web/notes.txt");

    let properties = ApplicationProperties::new()
        .with("scanPackage", "hello")
        .with("classpath", dir.path().display().to_string())
        .with("scanExtension", "class");
    let context = Bootstrapper::new(properties)
        .with_catalog(catalog())
        .bootstrap()
        .unwrap();

    let report = context.report();
    assert_eq!(report.scanner, "ClasspathScanner");
    assert_eq!(report.scanned, 3);
    assert_eq!(report.skipped, vec!["hello.web.HelloController$1"]);
    assert!(context.bean_of::<dyn Greeting>().is_some());
    assert!(context.dispatch_uri("/hello/say").unwrap().is_handled());
}

/// 测试扫描根不可解析时启动失败
#[test]
fn test_unresolvable_scan_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let properties = ApplicationProperties::new()
        .with("scanPackage", "missing.pkg")
        .with("classpath", dir.path().display().to_string());

    let result = Bootstrapper::new(properties).with_catalog(catalog()).bootstrap();
    assert!(matches!(
        result,
        Err(BootstrapError::ComponentError {
            source: ComponentError::ScanError { .. }
        })
    ));
}

/// 测试缺少依赖时其余 Bean 不受影响
#[test]
fn test_missing_dependency_is_tolerated() {
    let catalog = Arc::new(
        ComponentCatalog::new().with(
            ComponentDefinition::builder_named::<HelloController>("hello.web.HelloController")
                .controller()
                .request_mapping("/hello")
                .default_constructor()
                .inject::<dyn Greeting>("greeting", None, |c| &c.greeting)
                .handlers(hello_handlers)
                .build(),
        ),
    );
    let properties = ApplicationProperties::new().with("scanPackage", "hello");
    let context = Bootstrapper::new(properties)
        .with_catalog(catalog)
        .bootstrap()
        .unwrap();

    assert_eq!(context.report().unresolved.len(), 1);
    assert!(context.bean("helloController").is_some());
    // 未注入的字段在调用时才暴露为处理器错误
    assert!(context.dispatch_uri("/hello/say").is_err());
    assert!(!context.dispatch_uri("/hello/other").unwrap().is_handled());
}

/// 测试多线程并发分发
#[test]
fn test_concurrent_dispatch() {
    let properties = ApplicationProperties::new().with("scanPackage", "hello");
    let context = Bootstrapper::new(properties)
        .with_catalog(catalog())
        .bootstrap()
        .unwrap();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let context = &context;
            scope.spawn(move || {
                let name = format!("worker{}", i);
                let outcome = context
                    .dispatch_uri(&format!("/hello/say?name={}", name))
                    .unwrap();
                assert_eq!(
                    outcome.body(),
                    Some(&json!({ "message": format!("你好, {}", name) }))
                );
            });
        }
    });
}
