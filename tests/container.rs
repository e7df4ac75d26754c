use nomen::{
    Container, Descriptor, InstantiateErrorKind, Lifecycle, MessageSink, ResolveErrorKind, Scope, TypeInfo,
    ValidationErrorKind,
};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
};

#[derive(Clone, Default)]
struct RecordingSink {
    infos: Arc<Mutex<Vec<String>>>,
    warnings: Arc<Mutex<Vec<String>>>,
}

impl MessageSink for RecordingSink {
    fn info(&self, message: &str) {
        self.infos.lock().push(message.to_owned());
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().push(message.to_owned());
    }
}

#[derive(Debug)]
struct Config {
    url: &'static str,
}

#[derive(Debug)]
struct Pool {
    config: Arc<Config>,
}

#[derive(Debug)]
struct Repository {
    pool: Arc<Pool>,
}

#[derive(Debug)]
struct Handler {
    repository: Arc<Repository>,
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn app_container(config_calls: Arc<AtomicUsize>) -> Container {
    let container = Container::new();
    container
        .register("config", move |_| {
            config_calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, InstantiateErrorKind>(Config { url: "postgres://" })
        })
        .unwrap()
        .register("pool", |session| {
            Ok::<_, InstantiateErrorKind>(Pool {
                config: session.resolve("config")?,
            })
        })
        .unwrap()
        .register("repository", |session| {
            Ok::<_, InstantiateErrorKind>(Repository {
                pool: session.resolve("pool")?,
            })
        })
        .unwrap()
        .register_with_scope("handler", Scope::Prototype, |session| {
            Ok::<_, InstantiateErrorKind>(Handler {
                repository: session.resolve("repository")?,
            })
        })
        .unwrap();
    container
}

#[test]
fn test_singleton_identity() {
    let config_calls = counter();
    let container = app_container(config_calls.clone());

    let config_1 = container.resolve::<Config>("config").unwrap();
    let config_2 = container.resolve::<Config>("Config").unwrap();

    assert!(Arc::ptr_eq(&config_1, &config_2));
    assert_eq!(config_1.url, "postgres://");
    assert_eq!(config_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_prototype_freshness() {
    let config_calls = counter();
    let container = app_container(config_calls.clone());

    let handler_1 = container.resolve::<Handler>("handler").unwrap();
    let handler_2 = container.resolve::<Handler>("handler").unwrap();

    assert!(!Arc::ptr_eq(&handler_1, &handler_2));
    assert!(Arc::ptr_eq(&handler_1.repository, &handler_2.repository));
    assert!(Arc::ptr_eq(&handler_1.repository.pool.config, &handler_2.repository.pool.config));
    assert_eq!(config_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_laziness() {
    let config_calls = counter();
    let container = app_container(config_calls.clone());

    assert_eq!(config_calls.load(Ordering::SeqCst), 0);
    assert!(container.resolved().is_empty());

    container.resolve::<Pool>("pool").unwrap();

    let names = container
        .resolved()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["config", "pool"]);
}

#[test]
fn test_circular_dependency() {
    let container = Container::new();
    container
        .register("x", |session| Ok::<_, InstantiateErrorKind>(session.resolve::<u8>("y")?))
        .unwrap()
        .register("y", |session| Ok::<_, InstantiateErrorKind>(session.resolve::<u8>("x")?))
        .unwrap();

    match container.resolve::<Arc<u8>>("x") {
        Err(ResolveErrorKind::CircularDependency { name, pending }) => {
            assert_eq!(name.as_str(), "x");
            assert!(pending.contains("x"));
            assert!(pending.contains("y"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(container.resolved().is_empty());

    // The failed resolution leaves nothing behind, so the same error is reported again
    assert!(matches!(
        container.resolve::<Arc<u8>>("y"),
        Err(ResolveErrorKind::CircularDependency { .. })
    ));
}

#[test]
fn test_no_factory() {
    let container = Container::new();
    container
        .register("service", |session| Ok::<_, InstantiateErrorKind>(session.resolve::<u8>("missing")?))
        .unwrap();

    match container.resolve::<u8>("nothing") {
        Err(ResolveErrorKind::NoFactory { name }) => assert_eq!(name.as_str(), "nothing"),
        other => panic!("unexpected result: {other:?}"),
    }
    match container.resolve::<Arc<u8>>("service") {
        Err(err @ ResolveErrorKind::NoFactory { .. }) => {
            assert_eq!(
                err.to_string(),
                "There is no registered factory for dependency with name 'missing'"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_null_product_is_not_found_and_not_cached() {
    let calls = counter();

    let container = Container::new();
    container.register_descriptor(
        Descriptor::optional("maybe", Scope::Singleton, {
            let calls = calls.clone();
            move |_| {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, InstantiateErrorKind>((call > 0).then_some(7u8))
            }
        })
        .unwrap(),
    );

    assert!(matches!(
        container.resolve::<u8>("maybe"),
        Err(ResolveErrorKind::NotFound { .. })
    ));
    assert!(container.resolved().is_empty());

    assert_eq!(*container.resolve::<u8>("maybe").unwrap(), 7);
    assert_eq!(*container.resolve::<u8>("maybe").unwrap(), 7);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_incorrect_type() {
    let container = app_container(counter());

    match container.resolve::<Pool>("config") {
        Err(ResolveErrorKind::IncorrectType { name, expected, actual }) => {
            assert_eq!(name.as_str(), "config");
            assert_eq!(expected, TypeInfo::of::<Pool>());
            assert_eq!(actual, TypeInfo::of::<Config>());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_factory_error() {
    let container = Container::new();
    container
        .register("broken", |_| Err::<u8, _>(anyhow::anyhow!("disk is full")))
        .unwrap();

    let err = container.resolve::<u8>("broken").unwrap_err();
    assert!(matches!(err, ResolveErrorKind::Factory { .. }));
    assert_eq!(err.to_string(), "Factory for dependency with name 'broken' failed: disk is full");
}

#[test]
fn test_blank_names() {
    let container = Container::new();

    assert_eq!(
        container
            .register(" \t ", |_| Ok::<_, InstantiateErrorKind>(1u8))
            .err(),
        Some(ValidationErrorKind::BlankName)
    );
    assert!(matches!(
        container.resolve::<u8>(""),
        Err(ResolveErrorKind::Validation(ValidationErrorKind::BlankName))
    ));
}

#[test]
fn test_load_all() {
    let config_calls = counter();
    let sink = RecordingSink::default();
    let container = Container::with_sink(sink.clone());
    container
        .register("config", {
            let config_calls = config_calls.clone();
            move |_| {
                config_calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, InstantiateErrorKind>(Config { url: "postgres://" })
            }
        })
        .unwrap()
        .register("pool", |session| {
            Ok::<_, InstantiateErrorKind>(Pool {
                config: session.resolve("config")?,
            })
        })
        .unwrap();

    container.load_all(true, true).unwrap();
    container.load_all(false, false).unwrap();

    assert_eq!(config_calls.load(Ordering::SeqCst), 1);
    assert_eq!(container.resolved().len(), 2);

    let infos = sink.infos.lock();
    assert!(infos.iter().any(|line| line == "Loading container:"));
    assert!(infos.iter().any(|line| line == "Resolving singleton dependency with name: config ..."));
    assert!(infos.iter().any(|line| line == "Resolving singleton dependency with name: pool ..."));
    assert!(infos
        .iter()
        .any(|line| line.starts_with("For name: \"pool\" injects object of type")));
}

#[test]
fn test_load_all_surfaces_errors() {
    let container = Container::new();
    container
        .register("a", |_| Ok::<_, InstantiateErrorKind>(1u8))
        .unwrap()
        .register("b", |session| Ok::<_, InstantiateErrorKind>(session.resolve::<u8>("c")?))
        .unwrap();

    assert!(matches!(
        container.load_all(false, false),
        Err(ResolveErrorKind::NoFactory { .. })
    ));
    // Names are loaded in sorted order, so "a" was cached before the failure
    assert_eq!(container.resolved().len(), 1);

    let container = Container::new();
    container
        .register("x", |session| Ok::<_, InstantiateErrorKind>(session.resolve::<u8>("y")?))
        .unwrap()
        .register("y", |session| Ok::<_, InstantiateErrorKind>(session.resolve::<u8>("x")?))
        .unwrap();

    assert!(matches!(
        container.load_all(true, true),
        Err(ResolveErrorKind::CircularDependency { .. })
    ));
}

#[derive(Default)]
struct Cache {
    warmed: bool,
    post_construct_calls: usize,
}

impl Lifecycle for Cache {
    fn post_construct(&mut self) {
        self.warmed = true;
        self.post_construct_calls += 1;
    }
}

#[test]
fn test_post_construct() {
    let container = Container::new();
    container
        .register_descriptor(
            Descriptor::managed("cache", Scope::Singleton, |_| Ok::<_, InstantiateErrorKind>(Cache::default())).unwrap(),
        )
        .register_descriptor(
            Descriptor::managed("request_cache", Scope::Prototype, |_| {
                Ok::<_, InstantiateErrorKind>(Cache::default())
            })
            .unwrap(),
        )
        .register("consumer", |session| {
            let cache = session.resolve::<Cache>("cache")?;
            assert!(cache.warmed);
            Ok::<_, InstantiateErrorKind>(cache)
        })
        .unwrap();

    let consumer = container.resolve::<Arc<Cache>>("consumer").unwrap();
    let cache = container.resolve::<Cache>("cache").unwrap();

    assert!(Arc::ptr_eq(&*consumer, &cache));
    assert_eq!(cache.post_construct_calls, 1);

    for _ in 0..2 {
        let request_cache = container.resolve::<Cache>("request_cache").unwrap();
        assert!(request_cache.warmed);
        assert_eq!(request_cache.post_construct_calls, 1);
    }
}

#[test]
fn test_override_warning() {
    let sink = RecordingSink::default();
    let container = Container::with_sink(sink.clone());

    container
        .register("number", |_| Ok::<_, InstantiateErrorKind>(1u8))
        .unwrap()
        .register_with_scope(" NUMBER ", Scope::Prototype, |_| Ok::<_, InstantiateErrorKind>(2u8))
        .unwrap();

    assert_eq!(
        *sink.warnings.lock(),
        ["Override register for dependency with name 'number'"]
    );
    assert_eq!(*container.resolve::<u8>("number").unwrap(), 2);
    assert!(container.resolved().is_empty());
}

#[test]
fn test_concurrent_singleton() {
    const THREADS: usize = 8;

    let calls = counter();
    let container = Container::new();
    container
        .register("config", {
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                thread::yield_now();
                Ok::<_, InstantiateErrorKind>(Config { url: "postgres://" })
            }
        })
        .unwrap();

    let barrier = Barrier::new(THREADS);
    let configs = thread::scope(|s| {
        let handles = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    container.resolve::<Config>("config").unwrap()
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(configs.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_global() {
    let container = Container::global();
    container
        .register("global_answer", |_| Ok::<_, InstantiateErrorKind>(42u32))
        .unwrap();

    assert!(Container::global().is_registered("global_answer"));
    assert_eq!(*Container::global().resolve::<u32>("global_answer").unwrap(), 42);
}
