use component_macros::{interface, service};
use mvc_common::{Autowired, ComponentCatalog, QualifiedName};

#[interface]
trait Clock {
    fn now(&self) -> u64;
}

#[service("clock", implements(Clock))]
#[derive(Default)]
struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        42
    }
}

#[service]
#[derive(Default)]
struct Scheduler {
    #[autowired("clock")]
    clock: Autowired<dyn Clock>,
}

fn main() {
    let catalog = ComponentCatalog::global();
    let scheduler = catalog
        .get(&Scheduler::qualified_name())
        .expect("scheduler should be registered");
    assert_eq!(scheduler.injection_points()[0].lookup_key(), "clock");

    let clock = catalog.get(&FixedClock::qualified_name()).expect("clock should be registered");
    let names: Vec<_> = clock.interface_names().collect();
    assert_eq!(names, vec![<dyn Clock as QualifiedName>::qualified_name()]);
    assert!(!Scheduler::default().clock.is_bound());
}
