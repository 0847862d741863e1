//! Lifecycle of a visit to the settings screen
//!
//! Entering the screen opens a staged batch on the store. Leaving it either
//! applies or reverts that batch, never both and never neither. "Reset to
//! defaults" is a two step transition: the batch is reverted at once, then a
//! deferred task resets every key and opens a fresh batch. The deferred task
//! is cancelled when the screen is left, and a task that fires anyway for an
//! older visit does nothing.

use log::{debug, error, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::constants::RESET_SETTLE_DELAY;
use crate::store::{HandlerId, Settings};

/// The surrounding application window, as seen by the settings screen
pub trait ScreenShell {
    /// Put the Apply and Reset to defaults actions into the header
    fn show_actions(&self);

    /// Take the actions out of the header again
    fn hide_actions(&self);

    fn set_actions_sensitive(&self, sensitive: bool);

    /// Navigate back to the screen shown before the settings screen
    fn switch_to_previous(&self);
}

/// Handle of a task scheduled on a [`DeferredRunner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Runs tasks later on the same thread
pub trait DeferredRunner {
    fn run_after(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle;

    /// Cancel a task; cancelling a task that already ran does nothing
    fn cancel(&self, handle: TaskHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Not visited, no staged batch
    Idle,
    /// Staged batch open, nothing to apply
    Editing,
    /// Staged batch open with unapplied changes
    Dirty,
}

pub struct SettingsController {
    settings: Settings,
    shell: Rc<dyn ScreenShell>,
    runner: Rc<dyn DeferredRunner>,
    state: Cell<ScreenState>,
    commit_on_exit: Cell<bool>,
    /// Incremented on every enter and leave, stale resets compare against it
    visit: Cell<u64>,
    handlers: RefCell<Vec<HandlerId>>,
    pending_reset: Cell<Option<TaskHandle>>,
    weak_self: Weak<SettingsController>,
}

impl SettingsController {
    pub fn new(
        settings: Settings,
        shell: Rc<dyn ScreenShell>,
        runner: Rc<dyn DeferredRunner>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak_self| Self {
            settings,
            shell,
            runner,
            state: Cell::new(ScreenState::Idle),
            commit_on_exit: Cell::new(false),
            visit: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
            pending_reset: Cell::new(None),
            weak_self: weak_self.clone(),
        })
    }

    pub fn state(&self) -> ScreenState {
        self.state.get()
    }

    pub fn commit_on_exit(&self) -> bool {
        self.commit_on_exit.get()
    }

    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset.get().is_some()
    }

    /// The screen became visible
    pub fn enter(&self) {
        if self.state.get() != ScreenState::Idle {
            warn!("Settings screen entered twice without leaving");
            return;
        }

        self.visit.set(self.visit.get() + 1);
        self.commit_on_exit.set(false);
        self.settings.delay();
        self.state.set(ScreenState::Editing);
        self.refresh_actions();

        let weak = self.weak_self.clone();
        let changed = self.settings.connect_changed(None, move |_, _| {
            if let Some(controller) = weak.upgrade() {
                controller.refresh_actions();
            }
        });
        let weak = self.weak_self.clone();
        let unapplied = self.settings.connect_has_unapplied_notify(move |_| {
            if let Some(controller) = weak.upgrade() {
                controller.refresh_actions();
            }
        });
        self.handlers.borrow_mut().extend([changed, unapplied]);

        self.shell.show_actions();
        debug!("Entered settings screen (visit {})", self.visit.get());
    }

    /// The screen is being replaced by another one
    pub fn leave(&self) {
        if self.state.get() == ScreenState::Idle {
            return;
        }

        self.shell.hide_actions();
        for id in self.handlers.borrow_mut().drain(..) {
            self.settings.disconnect(id);
        }
        if let Some(handle) = self.pending_reset.take() {
            self.runner.cancel(handle);
        }

        if self.commit_on_exit.get() {
            info!("Applying settings");
            if let Err(e) = self.settings.apply() {
                error!("Failed to apply settings: {}", e);
            }
        } else {
            debug!("Reverting unapplied settings");
            self.settings.revert();
        }

        self.commit_on_exit.set(false);
        self.state.set(ScreenState::Idle);
        self.visit.set(self.visit.get() + 1);
    }

    /// Keep the staged changes and go back
    pub fn apply(&self) {
        if self.state.get() == ScreenState::Idle {
            return;
        }
        self.commit_on_exit.set(true);
        self.shell.switch_to_previous();
    }

    /// Drop staged changes, then reset every key once the revert settled
    pub fn reset_to_defaults(&self) {
        if self.state.get() == ScreenState::Idle {
            return;
        }

        // Edits made before the deferred step runs stay staged
        self.settings.revert();
        self.settings.delay();
        self.commit_on_exit.set(false);
        self.refresh_actions();

        if let Some(handle) = self.pending_reset.take() {
            self.runner.cancel(handle);
        }

        let weak = self.weak_self.clone();
        let visit = self.visit.get();
        let handle = self.runner.run_after(
            RESET_SETTLE_DELAY,
            Box::new(move || {
                if let Some(controller) = weak.upgrade() {
                    controller.finish_reset(visit);
                }
            }),
        );
        self.pending_reset.set(Some(handle));
    }

    fn finish_reset(&self, visit: u64) {
        if self.state.get() == ScreenState::Idle || self.visit.get() != visit {
            debug!("Ignoring reset to defaults from an earlier visit");
            return;
        }
        self.pending_reset.set(None);

        info!("Resetting all settings to their defaults");
        self.settings.revert();
        if let Err(e) = self.settings.reset_all() {
            error!("Failed to reset settings: {}", e);
        }
        self.settings.delay();
        self.refresh_actions();
    }

    fn refresh_actions(&self) {
        if self.state.get() == ScreenState::Idle {
            return;
        }
        let dirty = self.settings.has_unapplied();
        self.state.set(if dirty {
            ScreenState::Dirty
        } else {
            ScreenState::Editing
        });
        self.shell.set_actions_sensitive(dirty);
    }
}
