//! Settings screen
//!
//! One framed list per section, one row per key. The rows are generated from
//! the settings schema; the Apply and Reset to defaults buttons live in the
//! header bar while the screen is shown.

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{
    Align, Button, Frame, Grid, Label, ListBox, ListBoxRow, Orientation, PolicyType,
    ScrolledWindow, SelectionMode, Separator, Widget,
};
use log::debug;
use shredder_core::{build_form, FormEntry, ScreenShell, Settings, SettingsController};
use shredder_types::capitalize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use super::editors::factory_for;
use super::main_window::{MainWindow, View};
use super::runner::GlibRunner;

pub const SETTINGS_VIEW_NAME: &str = "settings";

/// Header buttons of the settings screen
struct HeaderActions {
    window: Weak<MainWindow>,
    apply: Button,
    reset: Button,
}

impl ScreenShell for HeaderActions {
    fn show_actions(&self) {
        if let Some(window) = self.window.upgrade() {
            window.add_header_widget(&self.apply, Align::End);
            window.add_header_widget(&self.reset, Align::Start);
        }
    }

    fn hide_actions(&self) {
        if let Some(window) = self.window.upgrade() {
            window.remove_header_widget(&self.apply);
            window.remove_header_widget(&self.reset);
        }
    }

    fn set_actions_sensitive(&self, sensitive: bool) {
        self.apply.set_sensitive(sensitive);
        self.reset.set_sensitive(sensitive);
    }

    fn switch_to_previous(&self) {
        if let Some(window) = self.window.upgrade() {
            window.switch_to_previous();
        }
    }
}

pub struct SettingsView {
    scrolled: ScrolledWindow,
    grid: Grid,
    /// Section lists by lower-cased name
    sections: RefCell<HashMap<String, ListBox>>,
    next_row: Cell<i32>,
    controller: Rc<SettingsController>,
}

impl SettingsView {
    pub fn new(settings: &Settings, window: &Rc<MainWindow>) -> Rc<Self> {
        let grid = Grid::new();
        grid.set_row_spacing(6);
        grid.set_margin_start(30);
        grid.set_margin_end(40);
        grid.set_margin_top(5);
        grid.set_margin_bottom(15);

        let scrolled = ScrolledWindow::new();
        scrolled.set_policy(PolicyType::Never, PolicyType::Automatic);
        scrolled.set_vexpand(true);
        scrolled.set_child(Some(&grid));

        let apply = Button::with_label("Apply");
        apply.add_css_class("suggested-action");
        let reset = Button::with_label("Reset to defaults");
        reset.add_css_class("destructive-action");

        let shell = Rc::new(HeaderActions {
            window: Rc::downgrade(window),
            apply: apply.clone(),
            reset: reset.clone(),
        });
        let controller =
            SettingsController::new(settings.clone(), shell, Rc::new(GlibRunner::new()));

        let weak = Rc::downgrade(&controller);
        apply.connect_clicked(move |_| {
            if let Some(controller) = weak.upgrade() {
                controller.apply();
            }
        });
        let weak = Rc::downgrade(&controller);
        reset.connect_clicked(move |_| {
            if let Some(controller) = weak.upgrade() {
                controller.reset_to_defaults();
            }
        });

        let view = Rc::new(Self {
            scrolled,
            grid,
            sections: RefCell::new(HashMap::new()),
            next_row: Cell::new(0),
            controller,
        });
        view.fill_from_settings(settings);
        view
    }

    /// Generate a row for every editable key of the schema
    fn fill_from_settings(&self, settings: &Settings) {
        let sections = build_form(settings.schema(), |kind, key, summary, description| {
            factory_for(kind)(settings, &key.name, summary, description)
        });

        for section in sections {
            self.append_section(&section.name);
            for entry in &section.entries {
                self.append_entry(entry);
            }
        }
        debug!("Settings view holds {} sections", self.sections.borrow().len());
    }

    fn append_section(&self, name: &str) {
        let title = Label::new(None);
        title.set_markup(&format!(
            "<b>{}:</b>",
            glib::markup_escape_text(&capitalize(name))
        ));
        title.set_halign(Align::Start);
        title.set_margin_top(if self.next_row.get() == 0 { 10 } else { 20 });

        let list = ListBox::new();
        list.set_selection_mode(SelectionMode::None);

        let frame = Frame::new(None);
        frame.set_hexpand(true);
        frame.set_child(Some(&list));

        let row = self.next_row.get();
        self.grid.attach(&title, 0, row, 1, 1);
        self.grid.attach(&frame, 0, row + 1, 1, 1);
        self.next_row.set(row + 2);

        self.sections.borrow_mut().insert(name.to_lowercase(), list);
    }

    fn append_entry(&self, entry: &FormEntry<Widget>) {
        let sections = self.sections.borrow();
        let Some(list) = sections.get(&entry.section.to_lowercase()) else {
            return;
        };

        if list.first_child().is_some() {
            let separator_row = ListBoxRow::new();
            separator_row.set_activatable(false);
            separator_row.set_selectable(false);
            separator_row.set_child(Some(&Separator::new(Orientation::Horizontal)));
            list.append(&separator_row);
        }

        let row_grid = Grid::new();
        row_grid.set_column_spacing(12);
        row_grid.set_margin_start(10);
        row_grid.set_margin_end(10);
        row_grid.set_margin_top(6);
        row_grid.set_margin_bottom(6);

        let summary = Label::new(Some(entry.summary.as_str()));
        summary.set_halign(Align::Start);
        summary.set_hexpand(true);
        row_grid.attach(&summary, 0, 0, 1, 1);

        let description = Label::new(None);
        if let Some(text) = &entry.description {
            description.set_markup(&description_markup(text));
        }
        description.add_css_class("dim-label");
        description.set_halign(Align::Start);
        description.set_wrap(true);
        description.set_xalign(0.0);
        row_grid.attach(&description, 0, 1, 1, 1);

        entry.widget.set_halign(Align::End);
        row_grid.attach(&entry.widget, 1, 0, 1, 2);

        let row = ListBoxRow::new();
        row.set_activatable(false);
        row.set_child(Some(&row_grid));
        list.append(&row);
    }
}

/// Small print markup for a key description
fn description_markup(description: &str) -> String {
    format!("<small>{}</small>", glib::markup_escape_text(description))
}

impl View for SettingsView {
    fn name(&self) -> &str {
        SETTINGS_VIEW_NAME
    }

    fn title(&self) -> &str {
        "Settings"
    }

    fn sub_title(&self) -> &str {
        "Configure how duplicates are searched"
    }

    fn widget(&self) -> Widget {
        self.scrolled.clone().upcast()
    }

    fn on_view_enter(&self) {
        self.controller.enter();
    }

    fn on_view_leave(&self) {
        self.controller.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_markup_escapes_text() {
        assert_eq!(
            description_markup("a & b <c>"),
            "<small>a &amp; b &lt;c&gt;</small>"
        );
        assert_eq!(
            description_markup("How file contents are compared"),
            "<small>How file contents are compared</small>"
        );
    }
}
