//! Main application window
//!
//! The window shows one view at a time in a stack. Switching views calls the
//! leaving view's `on_view_leave` and then the entering view's
//! `on_view_enter`; a history of visited views backs `switch_to_previous`.

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, HeaderBar, Label, Orientation, Stack,
    StackTransitionType, Widget,
};
use log::{debug, info, warn};
use shredder_core::{SettingValue, Settings};
use std::cell::RefCell;
use std::rc::Rc;

const WINDOW_SIZE_KEY: &str = "ui-window-size";
const DEFAULT_SIZE: (i32, i32) = (900, 640);

/// A screen hosted by the main window
pub trait View {
    /// Stack page name, unique per window
    fn name(&self) -> &str;
    fn title(&self) -> &str;
    fn sub_title(&self) -> &str;
    fn widget(&self) -> Widget;

    /// The view became visible
    fn on_view_enter(&self) {}

    /// The view is about to be replaced, or the window is closing
    fn on_view_leave(&self) {}
}

pub struct MainWindow {
    window: ApplicationWindow,
    header: HeaderBar,
    title: Label,
    sub_title: Label,
    stack: Stack,
    settings: Settings,
    views: RefCell<Vec<Rc<dyn View>>>,
    current: RefCell<Option<Rc<dyn View>>>,
    history: RefCell<Vec<String>>,
}

impl MainWindow {
    pub fn new(app: &Application, settings: &Settings) -> Rc<Self> {
        let (width, height) = settings
            .size_pair(WINDOW_SIZE_KEY)
            .map(|(w, h)| (w.min(i32::MAX as u64) as i32, h.min(i32::MAX as u64) as i32))
            .unwrap_or(DEFAULT_SIZE);

        let window = ApplicationWindow::builder()
            .application(app)
            .title("Shredder")
            .default_width(width)
            .default_height(height)
            .build();

        let title = Label::new(None);
        title.add_css_class("title");
        let sub_title = Label::new(None);
        sub_title.add_css_class("subtitle");
        sub_title.add_css_class("dim-label");

        let title_box = GtkBox::new(Orientation::Vertical, 0);
        title_box.set_valign(Align::Center);
        title_box.append(&title);
        title_box.append(&sub_title);

        let header = HeaderBar::new();
        header.set_title_widget(Some(&title_box));
        window.set_titlebar(Some(&header));

        let stack = Stack::new();
        stack.set_transition_type(StackTransitionType::Crossfade);
        window.set_child(Some(&stack));

        let main_window = Rc::new(Self {
            window,
            header,
            title,
            sub_title,
            stack,
            settings: settings.clone(),
            views: RefCell::new(Vec::new()),
            current: RefCell::new(None),
            history: RefCell::new(Vec::new()),
        });

        // The close handler keeps the window state and its views alive
        let main_window_for_close = main_window.clone();
        main_window.window.connect_close_request(move |_| {
            main_window_for_close.on_close();
            glib::Propagation::Proceed
        });

        main_window
    }

    pub fn add_view(&self, view: Rc<dyn View>) {
        self.stack.add_named(&view.widget(), Some(view.name()));
        self.views.borrow_mut().push(view);
    }

    /// Show the view called `name`
    pub fn switch_to(&self, name: &str) {
        self.show_view(name, true);
    }

    /// Go back to the view shown before the current one
    pub fn switch_to_previous(&self) {
        let previous = self.history.borrow_mut().pop();
        match previous {
            Some(name) => self.show_view(&name, false),
            None => debug!("No previous view to switch to"),
        }
    }

    /// Pack `widget` into the header, at the start for `Align::Start` and at
    /// the end otherwise
    pub fn add_header_widget(&self, widget: &impl IsA<Widget>, align: Align) {
        if widget.as_ref().parent().is_some() {
            return;
        }
        match align {
            Align::Start => self.header.pack_start(widget),
            _ => self.header.pack_end(widget),
        }
    }

    pub fn remove_header_widget(&self, widget: &impl IsA<Widget>) {
        if widget.as_ref().parent().is_some() {
            self.header.remove(widget);
        }
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn show_view(&self, name: &str, record: bool) {
        let view = self
            .views
            .borrow()
            .iter()
            .find(|v| v.name() == name)
            .cloned();
        let Some(view) = view else {
            warn!("Unknown view '{}'", name);
            return;
        };

        // Hooks run without any borrow held, they may navigate again
        let previous = self.current.borrow_mut().take();
        if let Some(previous) = &previous {
            if previous.name() == name {
                *self.current.borrow_mut() = Some(previous.clone());
                return;
            }
            previous.on_view_leave();
            if record {
                self.history.borrow_mut().push(previous.name().to_string());
            }
        }

        self.stack.set_visible_child_name(name);
        self.title.set_text(view.title());
        self.sub_title.set_text(view.sub_title());
        self.sub_title.set_visible(!view.sub_title().is_empty());
        *self.current.borrow_mut() = Some(view.clone());

        info!("Switched to view '{}'", name);
        view.on_view_enter();
    }

    fn on_close(&self) {
        let current = self.current.borrow_mut().take();
        if let Some(view) = current {
            view.on_view_leave();
        }

        let (width, height) = (self.window.default_width(), self.window.default_height());
        if width > 0 && height > 0 {
            let size = SettingValue::IntPair(width as i64, height as i64);
            if let Err(e) = self.settings.set_value(WINDOW_SIZE_KEY, size) {
                warn!("Could not store window size: {}", e);
            }
        }
    }
}
