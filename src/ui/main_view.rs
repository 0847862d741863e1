//! Start view with the entry point to the settings screen

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Button, Label, Orientation, Widget};
use std::rc::{Rc, Weak};

use super::main_window::{MainWindow, View};
use super::settings_view::SETTINGS_VIEW_NAME;

pub struct MainView {
    container: GtkBox,
}

impl MainView {
    pub fn new(window: &Rc<MainWindow>) -> Rc<Self> {
        let container = GtkBox::new(Orientation::Vertical, 12);
        container.set_halign(Align::Center);
        container.set_valign(Align::Center);

        let heading = Label::new(Some("Find and remove duplicate files"));
        heading.add_css_class("heading");
        container.append(&heading);

        let button = Button::with_label("Settings");
        button.set_halign(Align::Center);
        let window: Weak<MainWindow> = Rc::downgrade(window);
        button.connect_clicked(move |_| {
            if let Some(window) = window.upgrade() {
                window.switch_to(SETTINGS_VIEW_NAME);
            }
        });
        container.append(&button);

        Rc::new(Self { container })
    }
}

impl View for MainView {
    fn name(&self) -> &str {
        "main"
    }

    fn title(&self) -> &str {
        "Shredder"
    }

    fn sub_title(&self) -> &str {
        ""
    }

    fn widget(&self) -> Widget {
        self.container.clone().upcast()
    }
}
