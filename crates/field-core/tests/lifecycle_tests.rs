// Host-side tests for the single-active mount slot and frame gating.

use std::cell::Cell;
use std::rc::Rc;

use field_core::constants::{FRAME_BUDGET_LOW_END_MS, FRAME_BUDGET_MS};
use field_core::timing::{frame_budget_ms, FrameGate};
use field_core::{Dispose, Disposer, Slot};

struct Tracked {
    disposed: Rc<Cell<u32>>,
}

impl Dispose for Tracked {
    fn dispose(&mut self) {
        self.disposed.set(self.disposed.get() + 1);
    }
}

fn tracked(counter: &Rc<Cell<u32>>) -> Result<Tracked, ()> {
    Ok(Tracked {
        disposed: Rc::clone(counter),
    })
}

#[test]
fn second_mount_disposes_the_first() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let mut slot = Slot::new();

    let a = slot.mount(|| tracked(&first)).unwrap();
    assert_eq!(first.get(), 0);
    let b = slot.mount(|| tracked(&second)).unwrap();
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
    assert!(slot.is_current(b));
    assert!(!slot.is_current(a));
}

#[test]
fn release_is_idempotent_and_ignores_stale_tickets() {
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let mut slot = Slot::new();

    let a = slot.mount(|| tracked(&first)).unwrap();
    let b = slot.mount(|| tracked(&second)).unwrap();

    assert!(!slot.release(a));
    assert_eq!(second.get(), 0);

    assert!(slot.release(b));
    assert!(!slot.release(b));
    assert_eq!(second.get(), 1);
    assert_eq!(first.get(), 1);
    assert!(slot.is_empty());
}

#[test]
fn failed_mount_leaves_slot_empty() {
    let first = Rc::new(Cell::new(0));
    let mut slot = Slot::new();
    slot.mount(|| tracked(&first)).unwrap();

    let failed: Result<_, &str> = slot.mount(|| Err("no context"));
    assert!(failed.is_err());
    assert_eq!(first.get(), 1);
    assert!(slot.is_empty());
}

#[test]
fn disposer_runs_once() {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    let mut d = Disposer::new(move || c.set(c.get() + 1));
    assert!(!d.is_spent());
    d.dispose();
    d.dispose();
    assert_eq!(count.get(), 1);
    assert!(d.is_spent());
}

#[test]
fn low_end_devices_get_the_slower_budget() {
    assert_eq!(frame_budget_ms(2), FRAME_BUDGET_LOW_END_MS);
    assert_eq!(frame_budget_ms(4), FRAME_BUDGET_LOW_END_MS);
    assert_eq!(frame_budget_ms(8), FRAME_BUDGET_MS);
    assert_eq!(frame_budget_ms(0), FRAME_BUDGET_MS);
}

#[test]
fn gate_skips_early_frames() {
    let mut gate = FrameGate::for_threads(8);
    assert!(gate.admit(0.0));
    assert!(!gate.admit(10.0));
    assert!(gate.admit(17.0));
    assert!(!gate.admit(30.0));
    gate.reset();
    assert!(gate.admit(31.0));
}
