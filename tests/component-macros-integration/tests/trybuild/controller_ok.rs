use component_macros::{controller, routes};
use mvc_common::{ComponentCatalog, QualifiedName, Request};

#[controller]
#[request_mapping("/probe")]
#[derive(Default)]
struct ProbeController;

#[routes]
impl ProbeController {
    #[request_mapping("/echo")]
    fn echo(&self, request: &Request) -> anyhow::Result<String> {
        Ok(request.param("text").unwrap_or_default().to_string())
    }
}

fn main() {
    let name = ProbeController::qualified_name();
    assert!(name.ends_with(".ProbeController"));

    let catalog = ComponentCatalog::global();
    let definition = catalog.get(&name).expect("controller should be registered");
    assert_eq!(definition.request_mapping(), Some("/probe"));
    assert_eq!(definition.handler_methods().len(), 1);
}
