//! UI components

mod binding;
mod choice_button;
pub mod editors;
mod main_view;
mod main_window;
mod runner;
mod settings_view;
mod size_range;

pub use choice_button::MultipleChoiceButton;
pub use editors::{factory_for, WidgetFactory};
pub use main_view::MainView;
pub use main_window::{MainWindow, View};
pub use runner::GlibRunner;
pub use settings_view::{SettingsView, SETTINGS_VIEW_NAME};
pub use size_range::SizeRangeWidget;
