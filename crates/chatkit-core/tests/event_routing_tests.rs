//! Tests for signals and routed events working across a component tree.

use std::sync::Arc;

use parking_lot::Mutex;

use chatkit_core::{
    EventInit, EventRouter, ObjectTreeDebug, Property, RoutedEvent, Signal, TreeStyle,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("chatkit_core=trace")
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Toggled,
}

#[derive(Debug)]
struct Toggled {
    open: bool,
    composed: bool,
}

impl RoutedEvent for Toggled {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        Kind::Toggled
    }

    fn init(&self) -> EventInit {
        EventInit {
            bubbles: true,
            composed: self.composed,
        }
    }
}

#[test]
fn test_signal_drives_routed_event() {
    init_tracing();
    let router = EventRouter::<Toggled>::new();
    let shell = router.tree().insert("shell", None).unwrap();
    let header = router.tree().insert("header", Some(shell)).unwrap();

    let mirrored = Arc::new(Property::new(false));
    let mirrored_clone = mirrored.clone();
    let _listener = router.add_listener_scoped(shell, Kind::Toggled, move |event, _| {
        mirrored_clone.set(event.open);
    });

    let toggled = Arc::new(Signal::<bool>::new());
    let weak_router = Arc::downgrade(&router);
    let _connection = toggled.connect_scoped(move |&open| {
        if let Some(router) = weak_router.upgrade() {
            router
                .dispatch(header, &Toggled { open, composed: true })
                .unwrap();
        }
    });

    toggled.emit(true);
    assert!(mirrored.get());
    toggled.emit(false);
    assert!(!mirrored.get());
}

#[test]
fn test_shadow_boundary_only_blocks_non_composed() {
    init_tracing();
    let router = EventRouter::<Toggled>::new();
    let outer = router.tree().insert("outer", None).unwrap();
    let host = router.tree().insert("host", Some(outer)).unwrap();
    let inner = router.tree().insert("inner", Some(host)).unwrap();
    router.tree().set_shadow_root(host, true).unwrap();

    let reached = Arc::new(Mutex::new(Vec::new()));
    for node in [outer, host, inner] {
        let reached = reached.clone();
        router.add_listener(node, Kind::Toggled, move |_, ctx| {
            reached.lock().push(ctx.current_target());
        });
    }

    router
        .dispatch(inner, &Toggled { open: true, composed: false })
        .unwrap();
    assert_eq!(*reached.lock(), vec![inner]);

    reached.lock().clear();
    let result = router
        .dispatch(inner, &Toggled { open: true, composed: true })
        .unwrap();
    assert_eq!(*reached.lock(), vec![inner, host, outer]);
    assert_eq!(result.delivered, 3);

    let output = ObjectTreeDebug::new()
        .with_style(TreeStyle::Ascii)
        .format_tree(router.tree());
    assert!(output.contains("host (shadow)"));
}

#[test]
fn test_teardown_releases_everything() {
    init_tracing();
    let router = EventRouter::<Toggled>::new();
    let root = router.tree().insert("root", None).unwrap();
    let child = router.tree().insert("child", Some(root)).unwrap();

    let guard = router.add_listener_scoped(root, Kind::Toggled, |_, _| {});
    router.add_listener(child, Kind::Toggled, |_, _| {});
    assert_eq!(router.listener_count(), 2);

    drop(guard);
    router.remove_node(root).unwrap();
    assert_eq!(router.listener_count(), 0);
    assert!(router.tree().is_empty());
    assert!(router.dispatch(child, &Toggled { open: true, composed: true }).is_err());
}
