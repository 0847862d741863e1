//! Min/max file size range widget
//!
//! Two spin buttons share one size unit selector. Below them a bar shows the
//! selected span on a logarithmic scale, together with the range in
//! human-readable form.

use gtk4::prelude::*;
use gtk4::{Box as GtkBox, DrawingArea, DropDown, Label, Orientation, SpinButton, StringList};
use shredder_core::{format_size, order_range, RangeEnd, SizeUnit};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Position of `bytes` on the bar, from 0.0 to 1.0
fn bar_fraction(bytes: u64) -> f64 {
    ((bytes as f64 + 1.0).log2() / 64.0).clamp(0.0, 1.0)
}

fn draw_span(
    cr: &cairo::Context,
    width: i32,
    height: i32,
    range: (u64, u64),
) -> Result<(), cairo::Error> {
    let (width, height) = (width as f64, height as f64);

    // Trough
    cr.set_source_rgba(0.5, 0.5, 0.5, 0.25);
    cr.rectangle(0.0, 0.0, width, height);
    cr.fill()?;

    // Selected span
    let start = bar_fraction(range.0) * width;
    let end = bar_fraction(range.1) * width;
    cr.set_source_rgba(0.21, 0.52, 0.89, 0.9);
    cr.rectangle(start, 0.0, (end - start).max(2.0), height);
    cr.fill()?;
    Ok(())
}

struct SizeRangeState {
    container: GtkBox,
    min_spin: SpinButton,
    max_spin: SpinButton,
    unit_dropdown: DropDown,
    bar: DrawingArea,
    summary: Label,
    range: Cell<(u64, u64)>,
    unit: Cell<SizeUnit>,
    /// Set while the widget updates its own spin buttons
    updating: Cell<bool>,
    on_change: RefCell<Option<Box<dyn Fn(u64, u64)>>>,
}

#[derive(Clone)]
pub struct SizeRangeWidget {
    state: Rc<SizeRangeState>,
}

/// Reference to a [`SizeRangeWidget`] that does not keep it alive
#[derive(Clone)]
pub struct WeakSizeRange(Weak<SizeRangeState>);

impl WeakSizeRange {
    pub fn upgrade(&self) -> Option<SizeRangeWidget> {
        self.0.upgrade().map(|state| SizeRangeWidget { state })
    }
}

impl SizeRangeWidget {
    pub fn new(min: u64, max: u64) -> Self {
        let container = GtkBox::new(Orientation::Vertical, 4);

        let spin_row = GtkBox::new(Orientation::Horizontal, 6);
        let min_spin = SpinButton::with_range(0.0, 1.0, 1.0);
        let max_spin = SpinButton::with_range(0.0, 1.0, 1.0);
        min_spin.set_tooltip_text(Some("Smallest file size"));
        max_spin.set_tooltip_text(Some("Largest file size"));

        let labels: Vec<&str> = SizeUnit::ALL.iter().map(|u| u.label()).collect();
        let unit_dropdown = DropDown::new(
            Some(StringList::new(&labels)),
            Option::<gtk4::Expression>::None,
        );

        spin_row.append(&min_spin);
        spin_row.append(&Label::new(Some("to")));
        spin_row.append(&max_spin);
        spin_row.append(&unit_dropdown);
        container.append(&spin_row);

        let bar = DrawingArea::new();
        bar.set_content_height(6);
        bar.set_hexpand(true);
        container.append(&bar);

        let summary = Label::new(None);
        summary.add_css_class("dim-label");
        summary.set_halign(gtk4::Align::Start);
        container.append(&summary);

        let range = order_range(min, max, RangeEnd::Min);
        let widget = Self {
            state: Rc::new(SizeRangeState {
                container,
                min_spin,
                max_spin,
                unit_dropdown,
                bar,
                summary,
                range: Cell::new(range),
                unit: Cell::new(SizeUnit::best_for(range.0.max(1))),
                updating: Cell::new(false),
                on_change: RefCell::new(None),
            }),
        };
        let state = &widget.state;

        let weak = widget.downgrade();
        state.bar.set_draw_func(move |_, cr, width, height| {
            if let Some(widget) = weak.upgrade() {
                let _ = draw_span(cr, width, height, widget.range());
            }
        });

        state.unit_dropdown.set_selected(state.unit.get().index());
        widget.refresh();

        let this = widget.clone();
        state.min_spin.connect_value_changed(move |spin| {
            this.end_moved(RangeEnd::Min, spin.value());
        });
        let this = widget.clone();
        state.max_spin.connect_value_changed(move |spin| {
            this.end_moved(RangeEnd::Max, spin.value());
        });
        let this = widget.clone();
        state.unit_dropdown.connect_selected_notify(move |dropdown| {
            this.state.unit.set(SizeUnit::from_index(dropdown.selected()));
            this.refresh();
        });

        widget
    }

    /// Get the container widget (for adding to layouts)
    pub fn widget(&self) -> &GtkBox {
        &self.state.container
    }

    pub fn downgrade(&self) -> WeakSizeRange {
        WeakSizeRange(Rc::downgrade(&self.state))
    }

    pub fn range(&self) -> (u64, u64) {
        self.state.range.get()
    }

    /// Show a range set from elsewhere, without notifying the callback
    pub fn set_range(&self, min: u64, max: u64) {
        let range = order_range(min, max, RangeEnd::Min);
        if range != self.state.range.get() {
            self.state.range.set(range);
            self.refresh();
        }
    }

    /// Called with `(min, max)` after the user changed either end
    pub fn set_on_change<F: Fn(u64, u64) + 'static>(&self, callback: F) {
        *self.state.on_change.borrow_mut() = Some(Box::new(callback));
    }

    fn end_moved(&self, end: RangeEnd, amount: f64) {
        if self.state.updating.get() {
            return;
        }

        // Text read back on focus-out or activate is rounded to the shown
        // digits and must not move the end
        let unit = self.state.unit.get();
        let (min, max) = self.state.range.get();
        let range = match end {
            RangeEnd::Min => order_range(unit.bytes_for_amount(amount, min), max, end),
            RangeEnd::Max => order_range(min, unit.bytes_for_amount(amount, max), end),
        };
        if range == (min, max) {
            return;
        }

        self.state.range.set(range);
        self.refresh();
        if let Some(callback) = self.state.on_change.borrow().as_ref() {
            callback(range.0, range.1);
        }
    }

    /// Push the current range and unit into the child widgets
    fn refresh(&self) {
        let state = &self.state;
        let unit = state.unit.get();
        let (min, max) = state.range.get();
        let upper = unit.from_bytes(u64::MAX);

        state.updating.set(true);
        for (spin, bytes) in [(&state.min_spin, min), (&state.max_spin, max)] {
            spin.set_digits(unit.digits());
            spin.set_range(0.0, upper);
            spin.set_value(unit.from_bytes(bytes));
        }
        state.updating.set(false);

        state
            .summary
            .set_text(&format!("{} to {}", format_size(min), format_size(max)));
        state.bar.queue_draw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_fraction() {
        assert_eq!(bar_fraction(0), 0.0);
        assert_eq!(bar_fraction(u64::MAX), 1.0);
        assert!(bar_fraction(1024) < bar_fraction(1024 * 1024));
    }
}
