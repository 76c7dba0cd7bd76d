use std::fmt;

use log::{debug, warn};

use crate::record::{Field, FormBuffer, UserId};
use crate::storage::KeyValueStorage;
use crate::store::{self, RecordStore};

/// What the user is told after an action, shown as a blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Failure(message) => message,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The form component: the record store, the single draft being typed into,
/// the record being edited (if any), and whether the record list is shown.
pub struct FormSession<S> {
    store: RecordStore<S>,
    form: FormBuffer,
    editing: Option<UserId>,
    list_visible: bool,
}

impl<S: KeyValueStorage> FormSession<S> {
    pub fn new(store: RecordStore<S>) -> FormSession<S> {
        FormSession {
            store,
            form: FormBuffer::new(),
            editing: None,
            list_visible: false,
        }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn form(&self) -> &FormBuffer {
        &self.form
    }

    pub fn editing(&self) -> Option<UserId> {
        self.editing
    }

    pub fn list_visible(&self) -> bool {
        self.list_visible
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn primary_action_label(&self) -> &'static str {
        if self.editing.is_some() {
            "Update User"
        } else {
            "Add User"
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.list_visible {
            "Hide Users"
        } else {
            "View Users"
        }
    }

    pub fn toggle_list(&mut self) {
        self.list_visible = !self.list_visible;
    }

    /// The primary button: update the record being edited, or add a new one.
    /// Only storage failures are returned as errors; everything else becomes a notice.
    pub fn submit(&mut self) -> anyhow::Result<Notice> {
        match self.editing {
            None => match self.store.add(&self.form) {
                Ok(_) => {
                    self.form.clear();
                    Ok(Notice::Success("User added successfully!".to_owned()))
                }
                Err(err) => Self::failure_notice(err),
            },
            Some(id) => match self.store.update(id, &self.form) {
                Ok(()) => {
                    self.form.clear();
                    self.editing = None;
                    Ok(Notice::Success("User updated successfully!".to_owned()))
                }
                Err(err @ store::Error::NotFound(_)) => {
                    warn!("User #{id} disappeared while being edited");
                    self.editing = None;
                    Self::failure_notice(err)
                }
                Err(err) => Self::failure_notice(err),
            },
        }
    }

    /// Load a record into the form for editing.
    pub fn begin_edit(&mut self, id: UserId) -> Notice {
        let Some(record) = self.store.get(id) else {
            return Notice::Failure(store::Error::NotFound(id).to_string());
        };
        self.form = FormBuffer::from_record(record);
        self.editing = Some(id);
        debug!("Editing user {}", record.identify());
        Notice::Success(format!("Editing user #{id}"))
    }

    /// Drop the draft and leave edit mode.
    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.editing = None;
    }

    pub fn delete(&mut self, id: UserId) -> anyhow::Result<Notice> {
        match self.store.delete(id) {
            Ok(_) => {
                if self.editing == Some(id) {
                    self.editing = None;
                }
                Ok(Notice::Success("User deleted successfully!".to_owned()))
            }
            Err(err) => Self::failure_notice(err),
        }
    }

    fn failure_notice(err: store::Error) -> anyhow::Result<Notice> {
        match err {
            store::Error::Validation(validation) => {
                debug!("Form rejected: {}", validation.kind());
                Ok(Notice::Failure(validation.to_string()))
            }
            store::Error::NotFound(_) | store::Error::IdSpaceExhausted => {
                Ok(Notice::Failure(err.to_string()))
            }
            store::Error::Storage(storage) => Err(storage),
        }
    }
}
