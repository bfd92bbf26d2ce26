//! 启动与请求分发的端到端测试
//!
//! 组件通过宏声明，分布在互不重叠的包中，每个测试只扫描自己关心的包

use mvc_common::{
    ApplicationProperties, BindingKind, BootstrapError, BootstrapResult, ComponentError,
};
use mvc_composition::{ApplicationBuilder, ApplicationContext, Bootstrapper, DispatchOutcome};
use serde_json::json;
use std::fs;
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

mod app {
    pub mod service {
        use component_macros::{interface, service};

        #[interface]
        pub trait Greeter {
            fn greet(&self, name: &str) -> String;
            fn language(&self) -> &'static str;
        }

        #[service(implements(Greeter))]
        #[derive(Default)]
        pub struct EnglishGreeter;

        impl Greeter for EnglishGreeter {
            fn greet(&self, name: &str) -> String {
                format!("Hello, {}", name)
            }

            fn language(&self) -> &'static str {
                "en"
            }
        }

        #[service("french", implements(Greeter))]
        #[derive(Default)]
        pub struct FrenchGreeter;

        impl Greeter for FrenchGreeter {
            fn greet(&self, name: &str) -> String {
                format!("Bonjour, {}", name)
            }

            fn language(&self) -> &'static str {
                "fr"
            }
        }
    }

    pub mod cycle {
        use component_macros::service;
        use mvc_common::Autowired;

        #[service]
        #[derive(Default)]
        pub struct Ping {
            #[autowired("pong")]
            pub pong: Autowired<Pong>,
        }

        #[service]
        #[derive(Default)]
        pub struct Pong {
            #[autowired("ping")]
            pub ping: Autowired<Ping>,
        }
    }

    pub mod web {
        use super::service::Greeter;
        use component_macros::{controller, routes};
        use mvc_common::{Autowired, Request};
        use serde_json::{json, Value};

        #[controller]
        #[request_mapping("/greet")]
        #[derive(Default)]
        pub struct GreetingController {
            #[autowired]
            greeter: Autowired<dyn Greeter>,
        }

        #[routes]
        impl GreetingController {
            #[request_mapping("hello")]
            fn hello(&self, request: &Request) -> anyhow::Result<Value> {
                let greeter = self.greeter.require("greeter")?;
                Ok(json!({ "message": greeter.greet(request.param("name").unwrap_or("world")) }))
            }

            #[request_mapping("/language")]
            fn language(&self) -> anyhow::Result<&'static str> {
                Ok(self.greeter.require("greeter")?.language())
            }
        }

        #[controller]
        #[derive(Default)]
        pub struct HealthController;

        #[routes]
        impl HealthController {
            #[request_mapping("/health")]
            fn health(&self) -> Value {
                json!({ "status": "UP" })
            }
        }
    }
}

mod orphan {
    use component_macros::{controller, interface, routes, service};
    use mvc_common::Autowired;

    #[interface]
    pub trait TaxTable {
        fn rate(&self) -> u32;
    }

    #[service]
    #[derive(Default)]
    pub struct Survivor;

    #[controller]
    #[request_mapping("/orphan")]
    #[derive(Default)]
    pub struct OrphanController {
        #[autowired]
        taxes: Autowired<dyn TaxTable>,
    }

    #[routes]
    impl OrphanController {
        #[request_mapping("/rate")]
        fn rate(&self) -> anyhow::Result<u32> {
            Ok(self.taxes.require("taxes")?.rate())
        }

        #[request_mapping("/alive")]
        fn alive(&self) -> bool {
            true
        }
    }
}

mod dup {
    pub mod service {
        use component_macros::service;

        #[service("clash")]
        #[derive(Default)]
        pub struct ClashA;

        #[service("clash")]
        #[derive(Default)]
        pub struct ClashB;
    }

    pub mod web {
        use component_macros::{controller, routes};

        #[controller]
        #[request_mapping("/dup")]
        #[derive(Default)]
        pub struct FirstController;

        #[routes]
        impl FirstController {
            #[request_mapping("/same")]
            fn same(&self) -> &'static str {
                "first"
            }
        }

        #[controller]
        #[request_mapping("/dup/")]
        #[derive(Default)]
        pub struct SecondController;

        #[routes]
        impl SecondController {
            #[request_mapping("same")]
            fn same(&self) -> &'static str {
                "second"
            }
        }
    }
}

mod broken {
    use component_macros::service;

    #[service(constructor = "Fragile::open")]
    pub struct Fragile;

    impl Fragile {
        fn open() -> Result<Self, String> {
            Err("资源不可用".to_string())
        }
    }

    #[service(constructor = "Brittle::connect")]
    pub struct Brittle;

    impl Brittle {
        fn connect() -> Result<Self, String> {
            panic!("连接池已耗尽")
        }
    }

    #[service]
    #[derive(Default)]
    pub struct Sturdy;
}

use app::cycle::{Ping, Pong};
use app::service::Greeter;

const APP: &str = "bootstrap_tests.app";

fn bootstrap(package: &str) -> BootstrapResult<ApplicationContext> {
    bootstrap_with(ApplicationProperties::new().with("scanPackage", package))
}

fn bootstrap_with(properties: ApplicationProperties) -> BootstrapResult<ApplicationContext> {
    init_test_logger();
    Bootstrapper::new(properties).bootstrap()
}

#[test]
fn test_bean_names_follow_conventions() {
    let context = bootstrap(APP).unwrap();

    assert_eq!(
        context.report().registered,
        vec![
            "ping",
            "pong",
            "englishGreeter",
            "french",
            "greetingController",
            "healthController",
        ]
    );
    assert!(context.bean("frenchGreeter").is_none());
    assert!(context.bean("greetingController").is_some());
}

#[test]
fn test_interface_alias_last_registration_wins() {
    let context = bootstrap(APP).unwrap();
    let alias = <dyn Greeter as mvc_common::QualifiedName>::qualified_name();

    let bound = context.bean(&alias).unwrap();
    assert!(bound.same_instance(context.bean("french").unwrap()));
    assert!(!bound.same_instance(context.bean("englishGreeter").unwrap()));
    assert_eq!(
        context.report().overwrites,
        vec![format!(
            "Bean键 {} 被覆盖: bootstrap_tests.app.service.EnglishGreeter -> bootstrap_tests.app.service.FrenchGreeter",
            alias
        )]
    );

    // 控制器注入的是最终绑定的实现
    let outcome = context.dispatch_uri("/greet/language").unwrap();
    assert_eq!(outcome.body(), Some(&json!("fr")));
}

#[test]
fn test_resolution_returns_the_same_instance() {
    let context = bootstrap(APP).unwrap();

    let by_name = context.bean_as::<dyn Greeter>("french").unwrap();
    let by_type = context.bean_of::<dyn Greeter>().unwrap();
    assert_eq!(by_name.greet("Rust"), by_type.greet("Rust"));
    assert!(context
        .bean("french")
        .unwrap()
        .same_instance(context.bean("french").unwrap()));

    let first = context.bean_as::<Ping>("ping").unwrap();
    let second = context.bean_as::<Ping>("ping").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_circular_dependencies_are_bound() {
    let context = bootstrap(APP).unwrap();

    let ping = context.bean_as::<Ping>("ping").unwrap();
    let pong = context.bean_as::<Pong>("pong").unwrap();
    assert!(Arc::ptr_eq(ping.pong.get().unwrap(), &pong));
    assert!(Arc::ptr_eq(pong.ping.get().unwrap(), &ping));
    assert!(context.report().unresolved.is_empty());
}

#[test]
fn test_routes_compose_prefix_and_method_path() {
    let context = bootstrap(APP).unwrap();

    assert_eq!(
        context.report().routes,
        vec!["/greet/hello", "/greet/language", "/health"]
    );
    assert_eq!(
        context.dispatch_uri("/greet/hello?name=Rust").unwrap(),
        DispatchOutcome::Handled {
            path: "/greet/hello".to_string(),
            body: json!({ "message": "Bonjour, Rust" }),
        }
    );
    assert_eq!(
        context.dispatch_uri("//health").unwrap().body(),
        Some(&json!({ "status": "UP" }))
    );
    assert_eq!(
        context.dispatch_uri("/greet/missing").unwrap(),
        DispatchOutcome::NotFound {
            path: "/greet/missing".to_string()
        }
    );
}

#[test]
fn test_context_path_from_config_file() {
    init_test_logger();
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("application.toml");
    fs::write(
        &config_path,
        format!("scanPackage = \"{}\"\ncontextPath = \"/api\"\n", APP),
    )
    .unwrap();

    let context = ApplicationBuilder::new()
        .without_environment()
        .add_config_file(&config_path)
        .build()
        .unwrap();

    assert!(context.dispatch_uri("/api/health").unwrap().is_handled());
    assert_eq!(
        context.dispatch_uri("/api/greet/hello").unwrap().body(),
        Some(&json!({ "message": "Bonjour, world" }))
    );
    assert_eq!(
        context.dispatch_uri("/health").unwrap(),
        DispatchOutcome::NotFound {
            path: "/health".to_string()
        }
    );
}

#[test]
fn test_missing_dependency_leaves_field_unbound() {
    let context = bootstrap("bootstrap_tests.orphan").unwrap();

    assert_eq!(
        context.report().registered,
        vec!["orphanController", "survivor"]
    );
    assert_eq!(context.report().unresolved.len(), 1);
    assert!(context.report().unresolved[0].contains("taxes"));

    assert!(context.dispatch_uri("/orphan/rate").is_err());
    assert_eq!(
        context.dispatch_uri("/orphan/alive").unwrap().body(),
        Some(&json!(true))
    );
}

#[test]
fn test_failed_instantiation_does_not_abort_startup() {
    let context = bootstrap("bootstrap_tests.broken").unwrap();
    let report = context.report();

    assert_eq!(report.registered, vec!["sturdy"]);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(report.failed[0].type_name, "bootstrap_tests.broken.Brittle");
    assert!(report.failed[0].message.contains("连接池已耗尽"));
    assert_eq!(report.failed[1].type_name, "bootstrap_tests.broken.Fragile");
    assert!(context.bean("brittle").is_none());
    assert!(context.bean("fragile").is_none());
}

#[test]
fn test_duplicates_overwrite_in_permissive_mode() {
    let context = bootstrap("bootstrap_tests.dup").unwrap();

    assert!(context
        .bean("clash")
        .unwrap()
        .qualified_name()
        .ends_with("ClashB"));
    assert_eq!(
        context.dispatch_uri("/dup/same").unwrap().body(),
        Some(&json!("second"))
    );
    assert_eq!(context.routes().len(), 1);
    assert_eq!(context.report().overwrites.len(), 2);
}

#[test]
fn test_strict_mode_rejects_duplicate_bean_names() {
    let properties = ApplicationProperties::new()
        .with("scanPackage", "bootstrap_tests.dup")
        .with("strictMode", "true");

    match bootstrap_with(properties) {
        Err(BootstrapError::ComponentError {
            source: ComponentError::DuplicateBinding { kind, key, .. },
        }) => {
            assert_eq!(kind, BindingKind::Bean);
            assert_eq!(key, "clash");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("严格模式下应该启动失败"),
    }
}

#[test]
fn test_strict_mode_rejects_duplicate_routes_and_aliases() {
    let routes = ApplicationProperties::new()
        .with("scanPackage", "bootstrap_tests.dup.web")
        .with("strictMode", "true");
    assert!(matches!(
        bootstrap_with(routes),
        Err(BootstrapError::ComponentError {
            source: ComponentError::DuplicateBinding {
                kind: BindingKind::Route,
                ..
            }
        })
    ));

    let aliases = ApplicationProperties::new()
        .with("scanPackage", APP)
        .with("strictMode", "yes");
    assert!(bootstrap_with(aliases).is_err());

    let clean = ApplicationProperties::new()
        .with("scanPackage", "bootstrap_tests.orphan")
        .with("strictMode", "true");
    assert!(bootstrap_with(clean).is_ok());
}

#[test]
fn test_registration_order_is_deterministic() {
    let first = bootstrap(APP).unwrap();
    let second = bootstrap(APP).unwrap();

    assert_eq!(first.report().registered, second.report().registered);
    assert_eq!(first.report().routes, second.report().routes);
    assert_eq!(first.bean_names(), second.bean_names());
}

#[test]
fn test_classpath_scan_skips_untagged_types() {
    let dir = tempfile::tempdir().unwrap();
    let package_dir = dir.path().join("bootstrap_tests/broken");
    fs::create_dir_all(&package_dir).unwrap();
    for file in ["Sturdy.rs", "Helper.rs", "README.md"] {
        fs::write(package_dir.join(file), b"").unwrap();
    }

    let properties = ApplicationProperties::new()
        .with("scanPackage", "bootstrap_tests.broken")
        .with("classpath", dir.path().display().to_string())
        .with("scanExtension", ".rs");
    let context = bootstrap_with(properties).unwrap();

    let report = context.report();
    assert_eq!(report.scanner, "ClasspathScanner");
    assert_eq!(report.scanned, 2);
    assert_eq!(report.skipped, vec!["bootstrap_tests.broken.Helper"]);
    assert_eq!(report.registered, vec!["sturdy"]);
}

#[test]
fn test_missing_scan_package_is_fatal() {
    assert!(matches!(
        bootstrap_with(ApplicationProperties::new()),
        Err(BootstrapError::ConfigError { .. })
    ));
    assert!(matches!(
        bootstrap("bootstrap_tests.nowhere"),
        Err(BootstrapError::ComponentError {
            source: ComponentError::ScanError { .. }
        })
    ));
}

#[test]
fn test_concurrent_dispatch_shares_one_context() {
    let context = Arc::new(bootstrap(APP).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let context = Arc::clone(&context);
            std::thread::spawn(move || {
                let name = format!("worker{}", i);
                let outcome = context
                    .dispatch_uri(&format!("/greet/hello?name={}", name))
                    .unwrap();
                assert_eq!(
                    outcome.body(),
                    Some(&json!({ "message": format!("Bonjour, {}", name) }))
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
