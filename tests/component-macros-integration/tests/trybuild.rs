//! trybuild UI tests for component_macros

#[test]
fn ui_component_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/controller_ok.rs");
    t.pass("tests/trybuild/service_ok.rs");
}
