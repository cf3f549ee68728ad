//! Behavioural tests for the reactive core

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tessera_core::react::{Dispatcher, Emitter, Mutable, ReactError, Remover, Stream, Subject, Value};

fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

fn bump(c: &Rc<Cell<u32>>) {
    c.set(c.get() + 1);
}

#[test]
fn test_stream_wake_sleep_alternates() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let connect_log = log.clone();
    let stream: Stream<i32> = Stream::new(move |_| {
        connect_log.borrow_mut().push("connect");
        let disconnect_log = connect_log.clone();
        Ok(Remover::new(move || disconnect_log.borrow_mut().push("disconnect")))
    });

    for _ in 0..3 {
        let remover = stream.on_emit(|_| Ok(())).unwrap();
        assert!(stream.is_awake());
        remover.remove();
        assert!(!stream.is_awake());
    }

    assert_eq!(
        *log.borrow(),
        vec!["connect", "disconnect", "connect", "disconnect", "connect", "disconnect"]
    );
}

#[test]
fn test_subject_connects_once_for_many_listeners() {
    let (connects, disconnects) = (counter(), counter());
    let (c, d) = (connects.clone(), disconnects.clone());
    let subject = Subject::derive(move |dispatcher: Dispatcher<u32>| {
        bump(&c);
        dispatcher.dispatch(1)?;
        let d = d.clone();
        Ok(Remover::new(move || bump(&d)))
    });

    let first = subject.on_value(|_| Ok(())).unwrap();
    let second = subject.on_emit(|_| Ok(())).unwrap();
    let third = subject.on_value(|_| Ok(())).unwrap();
    assert_eq!(connects.get(), 1);

    first.remove();
    second.remove();
    assert_eq!(disconnects.get(), 0);
    third.remove();
    assert_eq!(disconnects.get(), 1);
    assert!(!subject.is_occupied());

    let again = subject.on_value(|_| Ok(())).unwrap();
    assert_eq!(connects.get(), 2);
    again.remove();
    assert_eq!(disconnects.get(), 2);
}

#[test]
fn test_derived_chain_wakes_each_level() {
    let emitter = Emitter::<i32>::new();
    let mapped = emitter.map(|v| v + 1);
    let filtered = mapped.filter(|v| *v > 0);

    let remover = filtered.on_emit(|_| Ok(())).unwrap();
    assert!(emitter.is_awake() && mapped.is_awake() && filtered.is_awake());
    remover.remove();
    assert!(!emitter.is_awake() && !mapped.is_awake() && !filtered.is_awake());
}

#[test]
fn test_mutable_equal_update_fires_nothing() {
    let point = Mutable::local(vec![1, 2]);
    let calls = counter();
    let c = calls.clone();
    let remover = point
        .on_change(move |_, _| {
            bump(&c);
            Ok(())
        })
        .unwrap();

    point.update(vec![1, 2]).unwrap();
    assert_eq!(calls.get(), 0);
    remover.remove();
}

#[test]
fn test_mutable_change_fires_each_listener_once_with_old() {
    let point = Mutable::local(vec![1, 2]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut removers = Vec::new();
    for tag in 0..2 {
        let seen = seen.clone();
        removers.push(
            point
                .on_change(move |new, old| {
                    seen.borrow_mut().push((tag, new.clone(), old.clone()));
                    Ok(())
                })
                .unwrap(),
        );
    }

    point.update(vec![3]).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![(0, vec![3], vec![1, 2]), (1, vec![3], vec![1, 2])]
    );
    Remover::join(removers).remove();
}

#[test]
fn test_on_value_delivers_before_returning() {
    let value = Mutable::local(5);
    let seen = Rc::new(Cell::new(0));
    let s = seen.clone();
    let remover = value
        .on_value(move |v| {
            s.set(*v);
            Ok(())
        })
        .unwrap();
    assert_eq!(seen.get(), 5);

    let late = Rc::new(Cell::new(0));
    let l = late.clone();
    let second = value
        .on_value(move |v| {
            l.set(*v);
            Ok(())
        })
        .unwrap();
    assert_eq!(late.get(), 5);

    remover.remove();
    second.remove();
}

#[test]
fn test_switch_map_resubscribes_on_source_change() {
    let source = Mutable::local(0);
    let switched = source.switch_map(|n| Mutable::local(n * 10).read_only());

    let changes = Rc::new(RefCell::new(Vec::new()));
    let c = changes.clone();
    let remover = switched
        .on_change(move |new, _| {
            c.borrow_mut().push(*new);
            Ok(())
        })
        .unwrap();
    assert_eq!(switched.current(), 0);

    source.update(1).unwrap();
    assert_eq!(*changes.borrow(), vec![10]);
    source.update(1).unwrap();
    assert_eq!(*changes.borrow(), vec![10]);

    remover.remove();
    assert!(!source.is_awake());
}

#[test]
fn test_switch_map_tracks_inner_changes() {
    let left = Mutable::local("left-a".to_string());
    let right = Mutable::local("right-a".to_string());
    let use_left = Mutable::local(true);
    let (l, r) = (left.clone(), right.clone());
    let chosen = use_left.switch_map(move |flag| if *flag { l.read_only() } else { r.read_only() });

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let remover = chosen
        .on_change(move |new, _| {
            s.borrow_mut().push(new.clone());
            Ok(())
        })
        .unwrap();

    left.update("left-b".into()).unwrap();
    use_left.update(false).unwrap();
    left.update("left-c".into()).unwrap();
    right.update("right-b".into()).unwrap();

    assert_eq!(*seen.borrow(), vec!["left-b", "right-a", "right-b"]);
    remover.remove();
    assert!(!left.is_awake() && !right.is_awake());
}

/// The dispatch after a source switch is gated by the new inner value's
/// equality, not by a fixed outer equality.
#[test]
fn test_switch_map_gates_with_current_inner_equality() {
    let structural = Mutable::local(1);
    let always = Mutable::local_eq(1, tessera_core::react::never_equals());
    let pick_always = Mutable::local(false);
    let (a, b) = (structural.clone(), always.clone());
    let chosen = pick_always.switch_map(move |flag| if *flag { b.read_only() } else { a.read_only() });

    let calls = counter();
    let c = calls.clone();
    let remover = chosen
        .on_change(move |_, _| {
            bump(&c);
            Ok(())
        })
        .unwrap();

    // 1 -> 1 under never_equals still counts as a change
    pick_always.update(true).unwrap();
    assert_eq!(calls.get(), 1);

    // Back to structural equality: 1 -> 1 is not a change
    pick_always.update(false).unwrap();
    assert_eq!(calls.get(), 1);
    remover.remove();
}

#[test]
fn test_emitter_aggregates_listener_errors() {
    let emitter = Emitter::<u8>::new();
    let (first, second) = (counter(), counter());
    let (f, s) = (first.clone(), second.clone());
    let r1 = emitter
        .on_emit(move |_| {
            bump(&f);
            Err(ReactError::msg("first failed"))
        })
        .unwrap();
    let r2 = emitter
        .on_emit(move |_| {
            bump(&s);
            Err(ReactError::msg("second failed"))
        })
        .unwrap();

    let err = emitter.emit(1).unwrap_err();
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 1);
    match err {
        ReactError::Multi(multi) => {
            let messages: Vec<String> = multi.errors().iter().map(|e| e.to_string()).collect();
            assert_eq!(messages, vec!["first failed", "second failed"]);
        }
        other => panic!("expected a multi-error, got {other:?}"),
    }
    r1.remove();
    r2.remove();
}

#[test]
fn test_single_listener_error_propagates_unwrapped() {
    let value = Mutable::local(0);
    let remover = value
        .on_change(|_, _| Err(ReactError::msg("rejected")))
        .unwrap();
    let err = value.update(1).unwrap_err();
    assert!(matches!(err, ReactError::Message(ref m) if m == "rejected"));
    // The update itself still happened
    assert_eq!(value.current(), 1);
    remover.remove();
}

#[test]
fn test_listener_removing_itself_mid_dispatch() {
    let emitter = Emitter::<i32>::new();
    let slot: Rc<RefCell<Option<Remover>>> = Rc::new(RefCell::new(None));
    let (calls_a, calls_b) = (counter(), counter());

    let (a, own) = (calls_a.clone(), slot.clone());
    let first = emitter
        .on_emit(move |_| {
            bump(&a);
            let own = own.borrow_mut().take();
            if let Some(own) = own {
                own.remove();
            }
            Ok(())
        })
        .unwrap();
    *slot.borrow_mut() = Some(first);

    let b = calls_b.clone();
    let second = emitter
        .on_emit(move |_| {
            bump(&b);
            Ok(())
        })
        .unwrap();

    emitter.emit(1).unwrap();
    emitter.emit(2).unwrap();
    assert_eq!(calls_a.get(), 1);
    assert_eq!(calls_b.get(), 2);
    second.remove();
    assert!(!emitter.is_awake());
}

#[test]
fn test_value_join_and_constant() {
    let a = Value::constant(1);
    let b = Mutable::local(2);
    let joined = Value::join([a, b.read_only()]);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let remover = joined
        .on_value(move |v| {
            s.borrow_mut().push(v.clone());
            Ok(())
        })
        .unwrap();
    b.update(3).unwrap();
    assert_eq!(*seen.borrow(), vec![vec![1, 2], vec![1, 3]]);
    remover.remove();
}
