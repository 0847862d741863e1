//! Editor state kept in step with a settings key
//!
//! A binding reads its key when created, writes edits back to the store and
//! re-reads the key on every change notification for it, so external
//! changes like revert or reset to defaults reach the editor. The store only
//! holds a weak reference to a binding, and dropping the binding
//! disconnects it.

use log::warn;
use shredder_types::{SettingValue, TypeTag};
use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::choice::ChoiceModel;
use crate::store::{HandlerId, Settings, SettingsError};

/// Call `sync` on `binding` whenever `key` changes, while the binding lives
fn watch_key<B: 'static>(
    settings: &Settings,
    key: &str,
    binding: &Rc<B>,
    sync: fn(&B),
) -> HandlerId {
    let weak: Weak<B> = Rc::downgrade(binding);
    settings.connect_changed(Some(key), move |_, _| {
        if let Some(binding) = weak.upgrade() {
            sync(&binding);
        }
    })
}

/// Choice model bound to a string key
pub struct ChoiceBinding {
    settings: Settings,
    key: String,
    model: RefCell<ChoiceModel>,
    handler: Cell<Option<HandlerId>>,
    on_synced: RefCell<Option<Box<dyn Fn(&ChoiceModel)>>>,
}

impl ChoiceBinding {
    pub fn new(settings: &Settings, key: &str) -> Result<Rc<Self>, SettingsError> {
        let schema = settings.key_schema(key)?;
        let selected = settings.string(key)?;

        let binding = Rc::new(Self {
            settings: settings.clone(),
            key: key.to_string(),
            model: RefCell::new(ChoiceModel::for_key(schema, &selected)),
            handler: Cell::new(None),
            on_synced: RefCell::new(None),
        });
        let handler = watch_key(settings, key, &binding, Self::sync);
        binding.handler.set(Some(handler));
        Ok(binding)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn model(&self) -> Ref<'_, ChoiceModel> {
        self.model.borrow()
    }

    /// Select `option` and write it to the store
    ///
    /// Returns false when nothing was written: the option is unknown, already
    /// selected, or rejected by the store.
    pub fn pick(&self, option: &str) -> bool {
        if !self.model.borrow_mut().select(option) {
            return false;
        }

        match self.settings.set_string(&self.key, option) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not store choice for '{}': {}", self.key, e);
                self.sync();
                false
            }
        }
    }

    /// Called with the model after it followed a change of the key
    pub fn connect_synced<F: Fn(&ChoiceModel) + 'static>(&self, callback: F) {
        *self.on_synced.borrow_mut() = Some(Box::new(callback));
    }

    fn sync(&self) {
        let value = match self.settings.string(&self.key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read choice for '{}': {}", self.key, e);
                return;
            }
        };
        self.model.borrow_mut().sync_selected(&value);

        if let Some(callback) = self.on_synced.borrow().as_ref() {
            callback(&self.model.borrow());
        }
    }
}

impl Drop for ChoiceBinding {
    fn drop(&mut self) {
        if let Some(id) = self.handler.take() {
            self.settings.disconnect(id);
        }
    }
}

/// `(min, max)` size range bound to an `(ii)` or `(tt)` key
pub struct SizeRangeBinding {
    settings: Settings,
    key: String,
    /// `(ii)` keys hold 32 bit components
    signed: bool,
    range: Cell<(u64, u64)>,
    handler: Cell<Option<HandlerId>>,
    on_synced: RefCell<Option<Box<dyn Fn(u64, u64)>>>,
}

impl SizeRangeBinding {
    pub fn new(settings: &Settings, key: &str) -> Result<Rc<Self>, SettingsError> {
        let signed = settings.key_schema(key)?.type_tag == TypeTag::IntPair;
        let range = settings.size_pair(key)?;

        let binding = Rc::new(Self {
            settings: settings.clone(),
            key: key.to_string(),
            signed,
            range: Cell::new(range),
            handler: Cell::new(None),
            on_synced: RefCell::new(None),
        });
        let handler = watch_key(settings, key, &binding, Self::sync);
        binding.handler.set(Some(handler));
        Ok(binding)
    }

    /// Range as last read from the store
    pub fn range(&self) -> (u64, u64) {
        self.range.get()
    }

    /// Write an edited range to the store
    ///
    /// Components of `(ii)` keys are capped at `i32::MAX`; the capped range
    /// comes back through the synced callback.
    pub fn write(&self, min: u64, max: u64) {
        let value = if self.signed {
            let cap = |v: u64| v.min(i32::MAX as u64) as i64;
            SettingValue::IntPair(cap(min), cap(max))
        } else {
            SettingValue::UintPair(min, max)
        };

        if let Err(e) = self.settings.set_value(&self.key, value) {
            warn!("Could not store range for '{}': {}", self.key, e);
            self.sync();
        } else if self.range.get() != (min, max) {
            // An equal write does not notify, but the editor may still show
            // a value the store adjusted
            self.sync();
        }
    }

    /// Called with the range after it followed a change of the key
    pub fn connect_synced<F: Fn(u64, u64) + 'static>(&self, callback: F) {
        *self.on_synced.borrow_mut() = Some(Box::new(callback));
    }

    fn sync(&self) {
        let (min, max) = match self.settings.size_pair(&self.key) {
            Ok(range) => range,
            Err(e) => {
                warn!("Could not read range for '{}': {}", self.key, e);
                return;
            }
        };
        self.range.set((min, max));

        if let Some(callback) = self.on_synced.borrow().as_ref() {
            callback(min, max);
        }
    }
}

impl Drop for SizeRangeBinding {
    fn drop(&mut self) {
        if let Some(id) = self.handler.take() {
            self.settings.disconnect(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::choice::RowGlyph;
    use crate::store::tests::test_schema;
    use serde_json::json;

    const ALGORITHM: &str = "computation-algorithm";
    const SIZE_RANGE: &str = "computation-size-range";

    fn settings() -> (Settings, MemoryBackend) {
        let backend = MemoryBackend::new();
        (Settings::new(test_schema(), backend.clone()), backend)
    }

    fn synced_choices(binding: &ChoiceBinding) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_for_sync = seen.clone();
        binding.connect_synced(move |model| {
            seen_for_sync.borrow_mut().push(model.selected().to_string());
        });
        seen
    }

    #[test]
    fn test_pick_writes_store() {
        let (settings, backend) = settings();
        let binding = ChoiceBinding::new(&settings, ALGORITHM).unwrap();
        let seen = synced_choices(&binding);

        assert!(binding.pick("paranoid"));
        assert_eq!(settings.string(ALGORITHM).unwrap(), "paranoid");
        assert_eq!(backend.contents().get(ALGORITHM), Some(&json!("paranoid")));
        assert_eq!(binding.model().selected(), "paranoid");
        assert_eq!(*seen.borrow(), vec!["paranoid".to_string()]);
    }

    #[test]
    fn test_pick_current_option_writes_nothing() {
        let (settings, backend) = settings();
        let binding = ChoiceBinding::new(&settings, ALGORITHM).unwrap();
        let seen = synced_choices(&binding);

        assert!(!binding.pick("sha1"));
        assert!(!binding.pick("crc32"));
        assert_eq!(backend.save_count(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_revert_resyncs_selection_and_glyphs() {
        let (settings, _) = settings();
        let binding = ChoiceBinding::new(&settings, ALGORITHM).unwrap();
        let seen = synced_choices(&binding);

        settings.delay();
        assert!(binding.pick("md5"));
        assert_eq!(binding.model().glyph("md5"), RowGlyph::Check);
        assert_eq!(binding.model().glyph("sha1"), RowGlyph::NonStarred);

        settings.revert();
        let model = binding.model();
        assert_eq!(model.selected(), "sha1");
        assert_eq!(model.glyph("sha1"), RowGlyph::Starred);
        assert_eq!(model.glyph("md5"), RowGlyph::None);
        assert_eq!(seen.borrow().last().map(String::as_str), Some("sha1"));
    }

    #[test]
    fn test_reset_all_resyncs_selection() {
        let (settings, _) = settings();
        let binding = ChoiceBinding::new(&settings, ALGORITHM).unwrap();

        settings.set_string(ALGORITHM, "md5").unwrap();
        assert_eq!(binding.model().selected(), "md5");
        assert_eq!(binding.model().label_text(), "Md5");

        settings.reset_all().unwrap();
        assert_eq!(binding.model().selected(), "sha1");
        assert_eq!(binding.model().label_text(), "Sha1");
    }

    #[test]
    fn test_dropped_binding_disconnects() {
        let (settings, _) = settings();
        let before = settings.changed_handler_count();

        let binding = ChoiceBinding::new(&settings, ALGORITHM).unwrap();
        let range = SizeRangeBinding::new(&settings, SIZE_RANGE).unwrap();
        assert_eq!(settings.changed_handler_count(), before + 2);

        drop(binding);
        drop(range);
        assert_eq!(settings.changed_handler_count(), before);
        settings.set_string(ALGORITHM, "md5").unwrap();
    }

    #[test]
    fn test_non_string_key_is_rejected() {
        let (settings, _) = settings();
        assert!(ChoiceBinding::new(&settings, "traverse-hidden").is_err());
        assert!(SizeRangeBinding::new(&settings, "traverse-hidden").is_err());
        assert!(ChoiceBinding::new(&settings, "missing").is_err());
    }

    #[test]
    fn test_range_write_and_resync() {
        let (settings, backend) = settings();
        let binding = SizeRangeBinding::new(&settings, SIZE_RANGE).unwrap();
        assert_eq!(binding.range(), (0, 1000));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_for_sync = seen.clone();
        binding.connect_synced(move |min, max| seen_for_sync.borrow_mut().push((min, max)));

        binding.write(10, 5000);
        assert_eq!(settings.size_pair(SIZE_RANGE).unwrap(), (10, 5000));
        assert_eq!(backend.contents().get(SIZE_RANGE), Some(&json!([10, 5000])));
        assert_eq!(binding.range(), (10, 5000));

        settings.reset(SIZE_RANGE).unwrap();
        assert_eq!(binding.range(), (0, 1000));
        assert_eq!(seen.borrow().last(), Some(&(0, 1000)));
    }

    #[test]
    fn test_range_revert_resyncs() {
        let (settings, _) = settings();
        let binding = SizeRangeBinding::new(&settings, SIZE_RANGE).unwrap();

        settings.delay();
        binding.write(1, u64::MAX);
        assert_eq!(binding.range(), (1, u64::MAX));

        settings.revert();
        assert_eq!(binding.range(), (0, 1000));
    }

    #[test]
    fn test_signed_range_is_capped() {
        let (settings, _) = settings();
        let binding = SizeRangeBinding::new(&settings, "window-size").unwrap();

        let seen = Rc::new(Cell::new((0, 0)));
        let seen_for_sync = seen.clone();
        binding.connect_synced(move |min, max| seen_for_sync.set((min, max)));

        binding.write(1024, u64::MAX);
        assert_eq!(
            settings.value("window-size").unwrap(),
            SettingValue::IntPair(1024, i32::MAX as i64)
        );
        assert_eq!(binding.range(), (1024, i32::MAX as u64));
        assert_eq!(seen.get(), (1024, i32::MAX as u64));
    }
}
