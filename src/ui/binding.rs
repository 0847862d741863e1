//! Two-way bindings between settings keys and widgets
//!
//! Every binding follows the same shape: initialise the widget from the
//! store, write user edits back, and re-read the key whenever the store
//! reports a change for it. The store drops writes of the current value, so
//! a change bouncing back from the widget does not loop.

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{SpinButton, Switch};
use log::warn;
use shredder_core::{HandlerId, NumericDisplay, NumericSpec, SettingValue, Settings};
use std::cell::Cell;
use std::rc::Rc;

/// Write a widget's value to the store, logging rejected writes
pub fn write_value(settings: &Settings, key: &str, value: SettingValue) {
    if let Err(e) = settings.set_value(key, value) {
        warn!("Could not store value for '{}': {}", key, e);
    }
}

/// Run `update` with the widget whenever `key` changes
///
/// The handler holds the widget weakly and disconnects itself on the first
/// change after the widget is gone.
pub fn on_key_changed<W, F>(settings: &Settings, key: &str, widget: &W, update: F) -> HandlerId
where
    W: IsA<glib::Object>,
    F: Fn(&Settings, &str, &W) + 'static,
{
    let widget_weak = widget.downgrade();
    let handler_slot: Rc<Cell<Option<HandlerId>>> = Rc::new(Cell::new(None));
    let slot = handler_slot.clone();
    let id = settings.connect_changed(Some(key), move |settings, key| {
        match widget_weak.upgrade() {
            Some(widget) => update(settings, key, &widget),
            None => {
                if let Some(id) = slot.take() {
                    settings.disconnect(id);
                }
            }
        }
    });
    handler_slot.set(Some(id));
    id
}

/// Bind a boolean key to a switch
pub fn bind_switch(settings: &Settings, key: &str, switch: &Switch) {
    // Initial state before the binding, so the first paint is correct
    switch.set_active(settings.boolean(key).unwrap_or_default());

    let settings_for_write = settings.clone();
    let key_for_write = key.to_string();
    switch.connect_active_notify(move |switch| {
        write_value(
            &settings_for_write,
            &key_for_write,
            SettingValue::Bool(switch.is_active()),
        );
    });

    on_key_changed(settings, key, switch, |settings, key, switch| {
        if let Ok(active) = settings.boolean(key) {
            if switch.is_active() != active {
                switch.set_active(active);
            }
        }
    });
}

/// Bind a numeric key to a spin button configured from `spec`
pub fn bind_spin(settings: &Settings, key: &str, spin: &SpinButton, spec: NumericSpec) {
    spin.set_value(settings.number(key).unwrap_or(spec.min));

    if spec.display != NumericDisplay::Raw {
        spin.connect_output(move |spin| {
            spin.set_text(&spec.format(spin.value()));
            glib::Propagation::Stop
        });
        spin.connect_input(move |spin| spec.parse(&spin.text()).map(Ok));
    }

    let settings_for_write = settings.clone();
    let key_for_write = key.to_string();
    spin.connect_value_changed(move |spin| {
        write_value(
            &settings_for_write,
            &key_for_write,
            spec.to_setting_value(spin.value()),
        );
    });

    on_key_changed(settings, key, spin, |settings, key, spin| {
        if let Ok(value) = settings.number(key) {
            if spin.value() != value {
                spin.set_value(value);
            }
        }
    });
}
