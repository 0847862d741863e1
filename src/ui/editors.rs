//! Editor widgets for settings keys
//!
//! `factory_for` maps an editor kind to the function building its widget.
//! Each constructor reads the key from the store, wires user edits back into
//! it and follows later changes of the key.

use gtk4::prelude::*;
use gtk4::{Align, Label, SpinButton, Switch};
use log::warn;
use shredder_core::{
    ChoiceBinding, EditorKind, KeyRange, NumericDisplay, NumericSpec, Settings, SizeRangeBinding,
};

use super::binding::{bind_spin, bind_switch};
use super::choice_button::MultipleChoiceButton;
use super::size_range::SizeRangeWidget;

/// Builds the editor for `(settings, key, summary, description)`
pub type WidgetFactory = fn(&Settings, &str, &str, Option<&str>) -> gtk4::Widget;

pub fn factory_for(kind: EditorKind) -> WidgetFactory {
    match kind {
        EditorKind::Toggle => boolean_widget,
        EditorKind::Numeric {
            floating_point: false,
        } => integer_widget,
        EditorKind::Numeric {
            floating_point: true,
        } => double_widget,
        EditorKind::Choice => choice_widget,
        EditorKind::SizeRange => range_widget,
    }
}

pub fn boolean_widget(
    settings: &Settings,
    key: &str,
    _summary: &str,
    _description: Option<&str>,
) -> gtk4::Widget {
    let switch = Switch::new();
    switch.set_valign(Align::Center);
    bind_switch(settings, key, &switch);
    switch.upcast()
}

pub fn integer_widget(
    settings: &Settings,
    key: &str,
    summary: &str,
    description: Option<&str>,
) -> gtk4::Widget {
    numeric_widget(settings, key, summary, description, false, false, false)
}

/// Doubles limited to `0..=1` are fractions and shown as percentages
pub fn double_widget(
    settings: &Settings,
    key: &str,
    summary: &str,
    description: Option<&str>,
) -> gtk4::Widget {
    let is_fraction = settings.key_schema(key).is_ok_and(|schema| {
        matches!(schema.range, KeyRange::Range { min, max } if min >= 0.0 && max <= 1.0)
    });
    numeric_widget(settings, key, summary, description, true, is_fraction, false)
}

/// Spin button bound to a numeric key
pub fn numeric_widget(
    settings: &Settings,
    key: &str,
    _summary: &str,
    _description: Option<&str>,
    floating_point: bool,
    draw_percent: bool,
    draw_size: bool,
) -> gtk4::Widget {
    let display = NumericDisplay::from_flags(draw_percent, draw_size);
    let spec = match settings.key_schema(key) {
        Ok(schema) => NumericSpec::for_key(schema, floating_point, display),
        Err(e) => {
            warn!("Cannot build numeric editor: {}", e);
            return SpinButton::with_range(0.0, 1.0, 1.0).upcast();
        }
    };

    // Percent values step by one percent
    let step = if display == NumericDisplay::Percent {
        0.01
    } else {
        spec.step
    };

    let spin = SpinButton::with_range(spec.min, spec.max, step);
    spin.set_digits(spec.digits);
    spin.set_numeric(display == NumericDisplay::Raw);
    spin.set_valign(Align::Center);
    bind_spin(settings, key, &spin, spec);
    spin.upcast()
}

pub fn choice_widget(
    settings: &Settings,
    key: &str,
    summary: &str,
    _description: Option<&str>,
) -> gtk4::Widget {
    let binding = match ChoiceBinding::new(settings, key) {
        Ok(binding) => binding,
        Err(e) => {
            warn!("Cannot build choice editor: {}", e);
            return unavailable_widget();
        }
    };

    let button = MultipleChoiceButton::new(binding, summary);
    button.widget().set_valign(Align::Center);
    button.widget().clone().upcast()
}

/// Size range editor for `(ii)` and `(tt)` keys
pub fn range_widget(
    settings: &Settings,
    key: &str,
    _summary: &str,
    _description: Option<&str>,
) -> gtk4::Widget {
    let binding = match SizeRangeBinding::new(settings, key) {
        Ok(binding) => binding,
        Err(e) => {
            warn!("Cannot build size range editor: {}", e);
            return unavailable_widget();
        }
    };

    let (min, max) = binding.range();
    let range = SizeRangeWidget::new(min, max);
    range.widget().set_valign(Align::Center);

    // The widget owns the binding; the binding only sees the widget weakly
    let weak_range = range.downgrade();
    binding.connect_synced(move |min, max| {
        if let Some(range) = weak_range.upgrade() {
            range.set_range(min, max);
        }
    });
    range.set_on_change(move |min, max| binding.write(min, max));

    range.widget().clone().upcast()
}

/// Placeholder for a key whose editor could not be built
fn unavailable_widget() -> gtk4::Widget {
    let label = Label::new(Some("Unavailable"));
    label.add_css_class("dim-label");
    label.set_sensitive(false);
    label.upcast()
}
