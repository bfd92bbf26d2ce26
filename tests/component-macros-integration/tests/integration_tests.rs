//! Centralized integration tests for component-macros crate

use mvc_common::{
    Bean, ComponentCatalog, ComponentError, ComponentKind, QualifiedName, Request,
};
use serde_json::json;
use std::sync::Arc;

mod shop {
    use component_macros::{controller, interface, routes, service};
    use mvc_common::{Autowired, Request};
    use serde::Serialize;

    #[interface]
    pub trait PriceList {
        fn unit_price(&self, sku: &str) -> Option<u64>;
    }

    #[service(implements(PriceList))]
    #[derive(Default)]
    pub struct FixedPriceList;

    impl PriceList for FixedPriceList {
        fn unit_price(&self, sku: &str) -> Option<u64> {
            match sku {
                "apple" => Some(3),
                "pear" => Some(5),
                _ => None,
            }
        }
    }

    #[service(name = "inventory")]
    #[derive(Default)]
    pub struct Inventory;

    #[derive(Debug, Serialize)]
    pub struct Quote {
        pub sku: String,
        pub total: u64,
    }

    #[controller]
    #[request_mapping("/order")]
    #[derive(Default)]
    pub struct OrderController {
        #[autowired]
        pub prices: Autowired<dyn PriceList>,
        #[autowired("inventory")]
        pub inventory: Autowired<Inventory>,
        pub label: String,
    }

    #[routes]
    impl OrderController {
        #[request_mapping("/quote")]
        pub fn quote(&self, request: &Request) -> anyhow::Result<Quote> {
            let sku = request.param("sku").unwrap_or("apple").to_string();
            let qty: u64 = request.param("qty").unwrap_or("1").parse()?;
            let price = self
                .prices
                .require("prices")?
                .unit_price(&sku)
                .ok_or_else(|| anyhow::anyhow!("未知商品: {}", sku))?;
            Ok(Quote {
                total: price * qty,
                sku,
            })
        }

        #[request_mapping("ping")]
        pub fn ping(&self) -> &'static str {
            "pong"
        }

        pub fn not_a_handler(&self) -> usize {
            self.label.len()
        }
    }

    /// 构造失败的组件
    #[service(constructor = "Unreachable::connect")]
    pub struct Unreachable;

    impl Unreachable {
        fn connect() -> Result<Self, String> {
            Err("连接被拒绝".to_string())
        }
    }

    /// 没有处理方法的控制器
    #[controller]
    #[derive(Default)]
    pub struct EmptyController;

    impl mvc_common::RequestMappings for EmptyController {}
}

use shop::{FixedPriceList, Inventory, OrderController, PriceList};

fn definition(catalog: &ComponentCatalog, simple_name: &str) -> Arc<mvc_common::ComponentDefinition> {
    let name = format!("integration_tests.shop.{}", simple_name);
    catalog
        .get(&name)
        .cloned()
        .unwrap_or_else(|| panic!("{} 应该已注册", name))
}

fn bean(catalog: &ComponentCatalog, simple_name: &str) -> Bean {
    let definition = definition(catalog, simple_name);
    Bean::new(definition.instantiate().unwrap(), definition)
}

#[test]
fn test_qualified_names_follow_module_path() {
    assert_eq!(
        OrderController::qualified_name(),
        "integration_tests.shop.OrderController"
    );
    assert_eq!(
        <dyn PriceList as QualifiedName>::qualified_name(),
        "integration_tests.shop.PriceList"
    );
}

#[test]
fn test_definitions_are_registered_at_startup() {
    let catalog = ComponentCatalog::global();
    assert_eq!(
        catalog.names_in_package("integration_tests.shop"),
        vec![
            "integration_tests.shop.EmptyController",
            "integration_tests.shop.FixedPriceList",
            "integration_tests.shop.Inventory",
            "integration_tests.shop.OrderController",
            "integration_tests.shop.Unreachable",
        ]
    );

    let controller = definition(&catalog, "OrderController");
    assert!(controller.kind().is_controller());
    assert_eq!(controller.request_mapping(), Some("/order"));

    let inventory = definition(&catalog, "Inventory");
    assert_eq!(inventory.kind(), &ComponentKind::named_service("inventory"));

    let prices = definition(&catalog, "FixedPriceList");
    assert_eq!(
        prices.interface_names().collect::<Vec<_>>(),
        vec!["integration_tests.shop.PriceList"]
    );
}

#[test]
fn test_autowired_fields_become_injection_points() {
    let catalog = ComponentCatalog::global();
    let controller = definition(&catalog, "OrderController");
    let points = controller.injection_points();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].field(), "prices");
    assert_eq!(points[0].explicit_key(), None);
    assert_eq!(points[0].lookup_key(), "integration_tests.shop.PriceList");
    assert_eq!(points[1].field(), "inventory");
    assert_eq!(points[1].lookup_key(), "inventory");
}

#[test]
fn test_routes_generate_handler_methods() {
    let catalog = ComponentCatalog::global();
    let handlers = definition(&catalog, "OrderController").handler_methods();
    let described: Vec<_> = handlers.iter().map(|h| (h.name(), h.path())).collect();
    assert_eq!(described, vec![("quote", "/quote"), ("ping", "ping")]);

    assert!(definition(&catalog, "EmptyController")
        .handler_methods()
        .is_empty());
}

#[test]
fn test_generated_handler_invokes_bound_controller() {
    let catalog = ComponentCatalog::global();
    let controller = bean(&catalog, "OrderController");
    let prices = bean(&catalog, "FixedPriceList");
    let inventory = bean(&catalog, "Inventory");

    let order = definition(&catalog, "OrderController");
    assert_eq!(order.injection_points()[0].bind(&controller, &prices), Ok(true));
    assert_eq!(order.injection_points()[1].bind(&controller, &inventory), Ok(true));

    let handlers = order.handler_methods();
    let body = handlers[0]
        .invoke(&controller, &Request::parse("/order/quote?sku=pear&qty=4"))
        .unwrap();
    assert_eq!(body, json!({ "sku": "pear", "total": 20 }));

    let ping = handlers[1].invoke(&controller, &Request::parse("/order/ping")).unwrap();
    assert_eq!(ping, json!("pong"));

    // 处理方法内部的错误被包装为处理器错误
    assert!(handlers[0]
        .invoke(&controller, &Request::parse("/order/quote?sku=plum"))
        .is_err());

    let typed = controller.downcast::<OrderController>().unwrap();
    assert!(typed.inventory.get().is_some());
    assert_eq!(typed.not_a_handler(), 0);
}

#[test]
fn test_service_resolves_as_declared_interface() {
    let catalog = ComponentCatalog::global();
    let prices = bean(&catalog, "FixedPriceList");

    let view = prices.resolve_as::<dyn PriceList>().unwrap();
    assert_eq!(view.unit_price("apple"), Some(3));
    assert!(prices.resolve_as::<FixedPriceList>().is_some());
    assert!(prices.resolve_as::<Inventory>().is_none());
}

#[test]
fn test_failing_constructor_reports_instantiation_error() {
    let catalog = ComponentCatalog::global();
    match definition(&catalog, "Unreachable").instantiate() {
        Err(ComponentError::InstantiationFailed { type_name, message }) => {
            assert_eq!(type_name, "integration_tests.shop.Unreachable");
            assert_eq!(message, "连接被拒绝");
        }
        Ok(_) => panic!("构造应该失败"),
        Err(other) => panic!("unexpected error: {}", other),
    }
}
