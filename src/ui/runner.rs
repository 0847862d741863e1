//! Deferred tasks on the GLib main loop

use gtk4::glib;
use shredder_core::{DeferredRunner, TaskHandle};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Runs tasks with `glib::timeout_add_local_once`
///
/// Pending sources are kept until they fire or are cancelled, so a fired
/// source is never removed a second time.
#[derive(Default)]
pub struct GlibRunner {
    next_id: Cell<u64>,
    pending: Rc<RefCell<HashMap<u64, glib::SourceId>>>,
}

impl GlibRunner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeferredRunner for GlibRunner {
    fn run_after(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let pending = self.pending.clone();
        let source_id = glib::timeout_add_local_once(delay, move || {
            pending.borrow_mut().remove(&id);
            task();
        });
        self.pending.borrow_mut().insert(id, source_id);
        TaskHandle(id)
    }

    fn cancel(&self, handle: TaskHandle) {
        let source_id = self.pending.borrow_mut().remove(&handle.0);
        if let Some(source_id) = source_id {
            source_id.remove();
        }
    }
}
