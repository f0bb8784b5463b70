use crate::{Hook, TapHandle};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn listeners_run_in_tap_order_and_share_the_argument() {
    let hook: Hook<Vec<u32>> = Hook::new();
    hook.tap(|log| log.push(1));
    hook.tap(|log| log.push(2));
    hook.tap(|log| log.push(3));

    let mut log = Vec::new();
    hook.call(&mut log);
    assert_eq!(log, [1, 2, 3]);
}

#[test]
fn revoked_listener_no_longer_runs() {
    let hook: Hook<Vec<u32>> = Hook::new();
    hook.tap(|log| log.push(1));
    let handle = hook.tap(|log| log.push(2));
    handle.revoke();

    let mut log = Vec::new();
    hook.call(&mut log);
    assert_eq!(log, [1]);
    assert_eq!(hook.len(), 1);
}

#[test]
fn revoking_during_a_call_does_not_affect_the_in_flight_call() {
    let hook: Hook<Vec<u32>> = Hook::new();
    let second: Rc<RefCell<Option<TapHandle>>> = Rc::new(RefCell::new(None));
    {
        let second = Rc::clone(&second);
        hook.tap(move |log: &mut Vec<u32>| {
            log.push(1);
            if let Some(handle) = second.borrow_mut().take() {
                handle.revoke();
            }
        });
    }
    *second.borrow_mut() = Some(hook.tap(|log| log.push(2)));

    let mut log = Vec::new();
    hook.call(&mut log);
    assert_eq!(log, [1, 2], "snapshot iteration keeps the revoked listener");

    log.clear();
    hook.call(&mut log);
    assert_eq!(log, [1], "subsequent calls see the revocation");
}

#[test]
fn clear_drops_all_listeners_and_outstanding_handles_become_noops() {
    let hook: Hook<Vec<u32>> = Hook::new();
    let handle = hook.tap(|log| log.push(1));
    hook.tap(|log| log.push(2));
    hook.clear();
    assert!(hook.is_empty());

    // Revoking after clear must not panic or resurrect anything.
    handle.revoke();
    let mut log = Vec::new();
    hook.call(&mut log);
    assert!(log.is_empty());
}
