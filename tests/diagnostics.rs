/// Diagnostics tests: traced resolution, observers and static validation

use ferrous_container::{
    implements, key_of_type, ConstructError, Constructor, Container, ContainerError, ContainerObserver,
    Implementation, Injectable, Key, RejectedConstructor, Resolver, ServiceId, TracingObserver,
    ValidationError, ValidationWarning,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Services =====

struct Port(u16);

fn guarded_port() -> Implementation {
    Implementation::from_constructors::<Port, Port>(vec![
        Constructor::unary(|raw: Arc<u16>| {
            if *raw == 0 {
                return Err(ConstructError::rejected("port 0 is reserved"));
            }
            Ok(Port(*raw))
        }),
        Constructor::unary(|raw: Arc<u32>| Ok(Port(*raw as u16))),
    ])
}

struct Endpoint {
    port: Arc<Port>,
}

impl Injectable for Endpoint {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::unary(|port: Arc<Port>| Ok(Endpoint { port }))]
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ContainerObserver for Recorder {
    fn resolving(&self, key: &Key) {
        self.events.lock().unwrap().push(format!("resolving {}", key));
    }

    fn resolved(&self, key: &Key, _duration: Duration, found: bool) {
        self.events.lock().unwrap().push(format!("resolved {} {}", key, found));
    }

    fn constructor_rejected(&self, key: &Key, rejection: &RejectedConstructor) {
        self.events
            .lock()
            .unwrap()
            .push(format!("rejected {} #{}", key, rejection.index));
    }
}

// ===== Traced resolution =====

#[test]
fn test_trace_reports_rejections_and_keeps_the_value_contract() {
    let mut container = Container::new();
    container.instance(Arc::new(0u16)).unwrap();
    container
        .register_singleton(Some(ServiceId::of::<Port>()), Some(guarded_port()), None)
        .unwrap();

    let trace = container.resolve_traced(Some(ServiceId::of::<Port>()), None).unwrap();
    assert!(!trace.is_resolved());
    assert_eq!(trace.rejections.len(), 2);

    let guard = &trace.rejections[0];
    assert_eq!(guard.service, key_of_type::<Port>());
    assert_eq!(guard.index, 0);
    assert_eq!(guard.reason, ConstructError::rejected("port 0 is reserved"));
    assert!(guard.implementation.contains("Port"));

    let missing = &trace.rejections[1];
    assert_eq!(missing.index, 1);
    assert!(matches!(missing.reason, ConstructError::MissingArgument { index: 0, service: "u32" }));

    // The untraced contract is the same absent value
    assert!(container.resolve::<Port>().unwrap().is_none());
}

#[test]
fn test_trace_includes_nested_resolutions() {
    let mut container = Container::new();
    container.instance(Arc::new(0u16)).unwrap();
    container.instance(Arc::new(8080u32)).unwrap();
    container
        .register_singleton(Some(ServiceId::of::<Port>()), Some(guarded_port()), None)
        .unwrap();
    container.singleton::<Endpoint, Endpoint>().unwrap();

    let trace = container
        .resolve_traced(Some(ServiceId::of::<Endpoint>()), None)
        .unwrap();
    let endpoint = trace.downcast::<Endpoint>().unwrap().unwrap();
    assert_eq!(endpoint.port.0, 8080);
    assert_eq!(trace.rejections.len(), 1);
    assert_eq!(trace.rejections[0].service, key_of_type::<Port>());

    // Cached now: nothing left to reject
    let again = container
        .resolve_traced(Some(ServiceId::of::<Endpoint>()), None)
        .unwrap();
    assert!(again.is_resolved());
    assert!(again.rejections.is_empty());
}

#[test]
fn test_trace_propagates_hard_errors() {
    let mut container = Container::new();
    assert!(matches!(
        container.resolve_traced(None, None),
        Err(ContainerError::InvalidArgument("service"))
    ));

    container
        .handler(|c: &Container| c.resolve_required::<String>().map(Some))
        .unwrap();
    assert!(matches!(
        container.resolve_traced(Some(ServiceId::of::<String>()), None),
        Err(ContainerError::Circular(_))
    ));
}

#[test]
fn test_rejection_display() {
    let rejection = RejectedConstructor {
        service: Key::new(ServiceId::of::<u16>(), Some("port")),
        implementation: "app::Port",
        index: 1,
        reason: ConstructError::rejected("nope"),
    };
    assert_eq!(rejection.to_string(), "app::Port constructor #1 for u16[\"port\"]: nope");
}

// ===== Observers =====

#[test]
fn test_observer_sees_construction_events() {
    let recorder = Arc::new(Recorder::default());
    let mut container = Container::new();
    container.add_observer(recorder.clone());
    container.instance(Arc::new(0u16)).unwrap();
    container.instance(Arc::new(443u32)).unwrap();
    container
        .register_singleton(Some(ServiceId::of::<Port>()), Some(guarded_port()), None)
        .unwrap();

    container.resolve_required::<Port>().unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            format!("resolving {}", key_of_type::<Port>()),
            format!("rejected {} #0", key_of_type::<Port>()),
            format!("resolved {} true", key_of_type::<Port>()),
        ]
    );

    // Cache hits are not reported
    container.resolve_required::<Port>().unwrap();
    assert_eq!(recorder.events().len(), 3);
}

#[test]
fn test_observer_sees_misses() {
    let recorder = Arc::new(Recorder::default());
    let mut container = Container::new();
    container.add_observer(recorder.clone());

    assert!(container.resolve_keyed::<u8>("nothing").unwrap().is_none());
    assert_eq!(
        recorder.events(),
        vec!["resolving u8[\"nothing\"]".to_string(), "resolved u8[\"nothing\"] false".to_string()]
    );
}

#[test]
fn test_tracing_observer_with_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut container = Container::new();
        container.add_observer(Arc::new(TracingObserver::new("test")));
        container.instance(Arc::new(0u16)).unwrap();
        container
            .register_singleton(Some(ServiceId::of::<Port>()), Some(guarded_port()), None)
            .unwrap();

        assert!(container.resolve::<Port>().unwrap().is_none());
    });
}

// ===== Validation =====

trait Mailer: Send + Sync {}

struct SmtpMailer;

impl Mailer for SmtpMailer {}

impl Injectable for SmtpMailer {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::binary(|_: Arc<String>, _: Arc<Endpoint>| Ok(SmtpMailer))]
    }
}

implements!(SmtpMailer => dyn Mailer);

#[test]
fn test_validation_reports_unsatisfiable_registrations() {
    let mut container = Container::new();
    container.singleton::<dyn Mailer, SmtpMailer>().unwrap();

    let result = container.validate();
    assert!(!result.is_valid());
    assert_eq!(
        result.errors,
        vec![ValidationError::Unsatisfiable {
            service: key_of_type::<dyn Mailer>(),
            implementation: ServiceId::of::<SmtpMailer>().name(),
            missing: {
                let mut names = vec![ServiceId::of::<String>().name(), ServiceId::of::<Endpoint>().name()];
                names.sort();
                names
            },
        }]
    );
    assert!(result.format_issues().contains("Validation Errors"));
}

#[test]
fn test_validation_is_static() {
    let mut container = Container::new();
    container.instance(Arc::new("smtp".to_string())).unwrap();
    container.singleton::<dyn Mailer, SmtpMailer>().unwrap();
    // Endpoint is registered but could not be built: validation does not construct
    container.singleton::<Endpoint, Endpoint>().unwrap();
    container
        .handler(|_: &Container| Ok(None::<Arc<Port>>))
        .unwrap();

    let result = container.validate();
    assert!(result.is_valid(), "{}", result.format_issues());
    assert!(container.resolve::<dyn Mailer>().unwrap().is_none());
}

#[test]
fn test_validation_warnings() {
    let mut container = Container::new();
    container
        .register_singleton(
            Some(ServiceId::of::<Port>()),
            Some(Implementation::from_constructors::<Port, Port>(Vec::new())),
            None,
        )
        .unwrap();
    container
        .register_per_request(
            Some(ServiceId::of::<u16>()),
            Some(Implementation::from_constructors::<u16, u16>(vec![Constructor::nullary(|| 80)])),
            None,
        )
        .unwrap();
    container
        .register_singleton(Some(ServiceId::of::<Port>()), Some(guarded_port()), Some("guarded"))
        .unwrap();

    let result = container.validate();
    assert!(result.is_valid());
    assert_eq!(
        result.warnings,
        vec![
            ValidationWarning::NoConstructors {
                service: key_of_type::<Port>(),
                implementation: ServiceId::of::<Port>().name(),
            },
            ValidationWarning::SingletonCapturesPerRequest {
                singleton: Key::new(ServiceId::of::<Port>(), Some("guarded")),
                dependency: "u16",
            },
        ]
    );
    assert!(result.format_issues().contains("Validation Warnings"));
}
