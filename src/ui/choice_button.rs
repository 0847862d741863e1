//! Popover-based single-select button
//!
//! The button shows the selected option underlined. Clicking it opens a
//! popover listing every option; the default option is marked with a star
//! so it stays recognisable when something else is selected. Picks go to
//! the store through a [`ChoiceBinding`], and the button follows every change
//! the binding reports.

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Frame, Image, Label, ListBox, ListBoxRow, MenuButton, Orientation,
    Popover, SelectionMode, Separator,
};
use shredder_core::{ChoiceBinding, ChoiceModel};
use shredder_types::capitalize;
use std::rc::Rc;

/// One option in the popover list
struct ChoiceRow {
    row: ListBoxRow,
    value: String,
    symbol: Image,
}

impl ChoiceRow {
    fn new(value: &str) -> Self {
        let hbox = GtkBox::new(Orientation::Horizontal, 6);

        let label = Label::new(Some(capitalize(value).as_str()));
        label.set_xalign(0.0);
        label.set_hexpand(true);
        hbox.append(&label);

        let symbol = Image::from_icon_name("emblem-ok-symbolic");
        symbol.set_visible(false);
        hbox.append(&symbol);

        let row = ListBoxRow::new();
        row.set_can_focus(false);
        row.set_margin_start(3);
        row.set_margin_end(3);
        row.set_child(Some(&hbox));

        Self {
            row,
            value: value.to_string(),
            symbol,
        }
    }

    fn update_symbol(&self, model: &ChoiceModel) {
        let glyph = model.glyph(&self.value);
        match glyph.icon_name() {
            Some(icon) => {
                self.symbol.set_icon_name(Some(icon));
                self.symbol.set_visible(true);
            }
            None => self.symbol.set_visible(false),
        }

        if glyph.is_dimmed() {
            self.symbol.add_css_class("dim-label");
            self.symbol.set_opacity(0.5);
        } else {
            self.symbol.remove_css_class("dim-label");
            self.symbol.set_opacity(1.0);
        }
    }
}

/// Button that picks one of several string options
pub struct MultipleChoiceButton {
    button: MenuButton,
}

impl MultipleChoiceButton {
    pub fn new(binding: Rc<ChoiceBinding>, summary: &str) -> Self {
        let value_label = Label::new(None);
        value_label.set_use_markup(true);

        let button = MenuButton::new();
        button.set_has_frame(false);
        button.set_can_focus(false);
        button.set_child(Some(&value_label));

        let listbox = ListBox::new();
        listbox.set_margin_start(10);
        listbox.set_margin_end(10);
        listbox.set_margin_top(10);
        listbox.set_margin_bottom(10);
        listbox.set_selection_mode(SelectionMode::None);
        listbox.set_activate_on_single_click(true);

        let header = Label::new(None);
        header.set_markup(&format!(
            "<small><b>{}</b></small>",
            glib::markup_escape_text(&ChoiceModel::header_text(summary))
        ));
        header.add_css_class("dim-label");
        header.set_size_request(90, -1);
        header.set_halign(Align::Center);

        let separator = Separator::new(Orientation::Horizontal);
        for widget in [header.upcast::<gtk4::Widget>(), separator.upcast()] {
            let row = ListBoxRow::new();
            row.set_selectable(false);
            row.set_activatable(false);
            row.set_child(Some(&widget));
            listbox.append(&row);
        }

        let rows: Rc<Vec<ChoiceRow>> = Rc::new(
            binding
                .model()
                .options()
                .iter()
                .map(|o| ChoiceRow::new(o))
                .collect(),
        );
        for choice_row in rows.iter() {
            listbox.append(&choice_row.row);
        }

        let frame = Frame::new(None);
        frame.set_margin_start(5);
        frame.set_margin_end(5);
        frame.set_margin_top(5);
        frame.set_margin_bottom(5);
        frame.set_child(Some(&listbox));

        let popover = Popover::new();
        popover.set_child(Some(&frame));
        button.set_popover(Some(&popover));

        update(&rows, &binding.model(), &value_label);

        // Store changes, including the ones a pick causes, redraw the button
        let rows_for_sync = rows.clone();
        let label_for_sync = value_label.clone();
        binding.connect_synced(move |model| update(&rows_for_sync, model, &label_for_sync));

        // The handler owns everything it touches
        listbox.connect_row_activated(move |_, activated| {
            let Some(picked) = rows.iter().find(|r| &r.row == activated) else {
                return;
            };
            binding.pick(&picked.value);
            popover.popdown();
        });

        Self { button }
    }

    pub fn widget(&self) -> &MenuButton {
        &self.button
    }
}

fn update(rows: &[ChoiceRow], model: &ChoiceModel, value_label: &Label) {
    for row in rows {
        row.update_symbol(model);
    }
    value_label.set_markup(&format!(
        "<u>{}</u>",
        glib::markup_escape_text(&model.label_text())
    ));
}
