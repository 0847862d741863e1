//! Schema-driven settings store with a delayed (staged) write mode
//!
//! Values are looked up as staged value, else stored value, else schema
//! default. While a staged batch is open every write lands in the batch; the
//! batch is then either applied (persisted in one save) or reverted as a unit.
//!
//! `Settings` is a cheap handle around shared state, meant to be used from
//! the GTK main thread. Handlers are called with no internal borrow held, so
//! they may freely read and write the store.

use log::{debug, error, warn};
use shredder_types::{KeySchema, SettingValue, SettingsSchema};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use thiserror::Error;

use crate::backend::{SettingsBackend, StoredValues};

/// Errors returned by settings store operations
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown settings key '{0}'")]
    UnknownKey(String),
    #[error("key '{key}' expects a value of type '{expected}'")]
    TypeMismatch { key: String, expected: String },
    #[error("value for key '{0}' is outside its allowed range")]
    OutOfRange(String),
    #[error("failed to persist settings: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Identifies a connected handler, used to disconnect it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

type ChangedHandler = Rc<dyn Fn(&Settings, &str)>;
type NotifyHandler = Rc<dyn Fn(&Settings)>;

struct ChangedSubscription {
    id: HandlerId,
    /// Only this key, or every key when `None`
    detail: Option<String>,
    handler: ChangedHandler,
}

struct SettingsInner {
    schema: SettingsSchema,
    backend: Box<dyn SettingsBackend>,
    stored: RefCell<HashMap<String, SettingValue>>,
    /// Open staged batch; `None` outside delayed mode
    staged: RefCell<Option<BTreeMap<String, SettingValue>>>,
    changed_handlers: RefCell<Vec<ChangedSubscription>>,
    unapplied_handlers: RefCell<Vec<(HandlerId, NotifyHandler)>>,
    next_handler_id: Cell<u64>,
}

/// Handle to a settings store
#[derive(Clone)]
pub struct Settings {
    inner: Rc<SettingsInner>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("schema", &self.inner.schema.id)
            .field("delayed", &self.is_delayed())
            .finish()
    }
}

impl Settings {
    /// Create a store for `schema`, loading stored values from `backend`
    ///
    /// A backend that fails to load leaves every key at its default. Stored
    /// values for unknown keys or of the wrong type are dropped.
    pub fn new(schema: SettingsSchema, backend: impl SettingsBackend + 'static) -> Self {
        let raw = backend.load().unwrap_or_else(|e| {
            warn!("Failed to load stored settings, using defaults: {}", e);
            StoredValues::new()
        });

        let mut stored = HashMap::new();
        for (name, json) in raw {
            let Some(key) = schema.key(&name) else {
                warn!("Ignoring stored value for unknown key '{}'", name);
                continue;
            };
            match SettingValue::from_json(&key.type_tag, &json) {
                Some(value) if key.accepts(&value) => {
                    stored.insert(name, value);
                }
                _ => warn!("Ignoring invalid stored value for key '{}': {}", name, json),
            }
        }

        Self {
            inner: Rc::new(SettingsInner {
                schema,
                backend: Box::new(backend),
                stored: RefCell::new(stored),
                staged: RefCell::new(None),
                changed_handlers: RefCell::new(Vec::new()),
                unapplied_handlers: RefCell::new(Vec::new()),
                next_handler_id: Cell::new(1),
            }),
        }
    }

    pub fn schema(&self) -> &SettingsSchema {
        &self.inner.schema
    }

    /// Key names in schema declaration order
    pub fn list_keys(&self) -> Vec<String> {
        self.inner.schema.list_keys()
    }

    pub fn key_schema(&self, key: &str) -> Result<&KeySchema, SettingsError> {
        self.inner
            .schema
            .key(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))
    }

    /// Current value of `key`, including staged changes
    pub fn value(&self, key: &str) -> Result<SettingValue, SettingsError> {
        let schema = self.key_schema(key)?;
        if let Some(value) = self.staged_value(key) {
            return Ok(value);
        }
        Ok(self.stored_or_default(schema))
    }

    pub fn default_value(&self, key: &str) -> Result<SettingValue, SettingsError> {
        Ok(self.key_schema(key)?.default.clone())
    }

    pub fn boolean(&self, key: &str) -> Result<bool, SettingsError> {
        let value = self.value(key)?;
        value.as_bool().ok_or_else(|| self.mismatch(key))
    }

    /// Numeric value of an integer or double key
    pub fn number(&self, key: &str) -> Result<f64, SettingsError> {
        let value = self.value(key)?;
        value.as_f64().ok_or_else(|| self.mismatch(key))
    }

    pub fn string(&self, key: &str) -> Result<String, SettingsError> {
        let value = self.value(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(key))
    }

    /// `(min, max)` of an integer or unsigned pair key
    pub fn size_pair(&self, key: &str) -> Result<(u64, u64), SettingsError> {
        let value = self.value(key)?;
        value.as_size_pair().ok_or_else(|| self.mismatch(key))
    }

    /// Write `value` to `key`
    ///
    /// Writing the current value is a no-op. Inside a staged batch the value
    /// is staged; a staged value equal to the stored one is dropped from the
    /// batch again. Outside a batch the value is persisted immediately.
    pub fn set_value(&self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let schema = self.key_schema(key)?;
        if !value.matches_tag(&schema.type_tag) {
            return Err(self.mismatch(key));
        }
        if !schema.accepts(&value) {
            return Err(SettingsError::OutOfRange(key.to_string()));
        }
        if self.value(key)? == value {
            return Ok(());
        }

        if self.is_delayed() {
            let had_unapplied = self.has_unapplied();
            let underlying = self.stored_or_default(schema);
            if let Some(staged) = self.inner.staged.borrow_mut().as_mut() {
                if underlying == value {
                    staged.remove(key);
                } else {
                    staged.insert(key.to_string(), value);
                }
            }
            debug!("Staged change for '{}'", key);
            self.emit_changed(key);
            self.notify_unapplied_if_changed(had_unapplied);
            Ok(())
        } else {
            self.inner
                .stored
                .borrow_mut()
                .insert(key.to_string(), value);
            let result = self.persist();
            self.emit_changed(key);
            result
        }
    }

    pub fn set_boolean(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.set_value(key, SettingValue::Bool(value))
    }

    pub fn set_string(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.set_value(key, SettingValue::String(value.to_string()))
    }

    /// Open a staged batch; does nothing if one is already open
    pub fn delay(&self) {
        let mut staged = self.inner.staged.borrow_mut();
        if staged.is_none() {
            debug!("Opening staged settings batch");
            *staged = Some(BTreeMap::new());
        }
    }

    pub fn is_delayed(&self) -> bool {
        self.inner.staged.borrow().is_some()
    }

    /// Whether the open batch holds changes not yet applied
    pub fn has_unapplied(&self) -> bool {
        self.inner
            .staged
            .borrow()
            .as_ref()
            .is_some_and(|staged| !staged.is_empty())
    }

    /// Persist the staged batch and close it
    ///
    /// Does nothing outside delayed mode. On a backend failure the values
    /// are kept in memory and the error is returned.
    pub fn apply(&self) -> Result<(), SettingsError> {
        let Some(staged) = self.inner.staged.borrow_mut().take() else {
            return Ok(());
        };
        let had_unapplied = !staged.is_empty();

        let result = if had_unapplied {
            debug!("Applying {} staged settings", staged.len());
            self.inner.stored.borrow_mut().extend(staged);
            self.persist()
        } else {
            Ok(())
        };

        self.notify_unapplied_if_changed(had_unapplied);
        result
    }

    /// Discard the staged batch and close it
    ///
    /// Every key whose value goes back to the stored one is notified.
    pub fn revert(&self) {
        let Some(staged) = self.inner.staged.borrow_mut().take() else {
            return;
        };
        let had_unapplied = !staged.is_empty();
        if had_unapplied {
            debug!("Reverting {} staged settings", staged.len());
        }

        for key in staged.keys() {
            self.emit_changed(key);
        }
        self.notify_unapplied_if_changed(had_unapplied);
    }

    /// Return `key` to its schema default
    ///
    /// Inside a staged batch the default is staged, otherwise the stored
    /// value is removed.
    pub fn reset(&self, key: &str) -> Result<(), SettingsError> {
        let schema = self.key_schema(key)?;
        if self.is_delayed() {
            return self.set_value(key, schema.default.clone());
        }

        let before = self.value(key)?;
        let removed = self.inner.stored.borrow_mut().remove(key).is_some();
        if !removed {
            return Ok(());
        }
        let result = self.persist();
        if before != schema.default {
            self.emit_changed(key);
        }
        result
    }

    /// Return every key to its default
    ///
    /// Outside a staged batch this persists with a single save.
    pub fn reset_all(&self) -> Result<(), SettingsError> {
        if self.is_delayed() {
            for key in self.list_keys() {
                self.reset(&key)?;
            }
            return Ok(());
        }

        let changed: Vec<String> = self
            .inner
            .schema
            .keys()
            .iter()
            .filter(|k| self.stored_or_default(k) != k.default)
            .map(|k| k.name.clone())
            .collect();

        let had_stored = {
            let mut stored = self.inner.stored.borrow_mut();
            let had = !stored.is_empty();
            stored.clear();
            had
        };
        let result = if had_stored { self.persist() } else { Ok(()) };

        for key in &changed {
            self.emit_changed(key);
        }
        result
    }

    /// Call `handler` when a key changes
    ///
    /// With `detail` set, only changes of that key are reported.
    pub fn connect_changed<F>(&self, detail: Option<&str>, handler: F) -> HandlerId
    where
        F: Fn(&Settings, &str) + 'static,
    {
        let id = self.next_handler_id();
        self.inner
            .changed_handlers
            .borrow_mut()
            .push(ChangedSubscription {
                id,
                detail: detail.map(str::to_string),
                handler: Rc::new(handler),
            });
        id
    }

    /// Call `handler` when [`Settings::has_unapplied`] flips
    pub fn connect_has_unapplied_notify<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&Settings) + 'static,
    {
        let id = self.next_handler_id();
        self.inner
            .unapplied_handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));
        id
    }

    pub fn disconnect(&self, id: HandlerId) {
        self.inner.changed_handlers.borrow_mut().retain(|s| s.id != id);
        self.inner
            .unapplied_handlers
            .borrow_mut()
            .retain(|(handler_id, _)| *handler_id != id);
    }

    #[cfg(test)]
    pub(crate) fn changed_handler_count(&self) -> usize {
        self.inner.changed_handlers.borrow().len()
    }

    fn next_handler_id(&self) -> HandlerId {
        let id = self.inner.next_handler_id.get();
        self.inner.next_handler_id.set(id + 1);
        HandlerId(id)
    }

    fn staged_value(&self, key: &str) -> Option<SettingValue> {
        self.inner
            .staged
            .borrow()
            .as_ref()
            .and_then(|staged| staged.get(key).cloned())
    }

    fn stored_or_default(&self, schema: &KeySchema) -> SettingValue {
        self.inner
            .stored
            .borrow()
            .get(&schema.name)
            .cloned()
            .unwrap_or_else(|| schema.default.clone())
    }

    fn mismatch(&self, key: &str) -> SettingsError {
        let expected = self
            .inner
            .schema
            .key(key)
            .map(|k| k.type_tag.type_string().to_string())
            .unwrap_or_default();
        SettingsError::TypeMismatch {
            key: key.to_string(),
            expected,
        }
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let values: StoredValues = self
            .inner
            .stored
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();

        self.inner.backend.save(&values).map_err(|e| {
            error!("Failed to save settings: {}", e);
            SettingsError::Backend(e)
        })
    }

    fn emit_changed(&self, key: &str) {
        let handlers: Vec<ChangedHandler> = self
            .inner
            .changed_handlers
            .borrow()
            .iter()
            .filter(|s| s.detail.as_deref().map_or(true, |d| d == key))
            .map(|s| s.handler.clone())
            .collect();

        for handler in handlers {
            handler(self, key);
        }
    }

    fn notify_unapplied_if_changed(&self, before: bool) {
        if before == self.has_unapplied() {
            return;
        }

        let handlers: Vec<NotifyHandler> = self
            .inner
            .unapplied_handlers
            .borrow()
            .iter()
            .map(|(_, h)| h.clone())
            .collect();

        for handler in handlers {
            handler(self);
        }
    }
}
