use std::collections::HashSet;
use std::fmt;

use anyhow::Context;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::record::{FormBuffer, UserId, UserRecord};
use crate::storage::KeyValueStorage;
use crate::validate::{validate, ValidationError};

/// The one storage key the whole record list is kept under.
pub const USERS_KEY: &str = "users";

#[derive(Debug)]
pub enum Error {
    Validation(ValidationError),
    NotFound(UserId),
    /// The next id would not fit in an `i64`.
    IdSpaceExhausted,
    Storage(anyhow::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(error) => write!(f, "{error}"),
            Error::NotFound(id) => write!(f, "No user with ID {id}"),
            Error::IdSpaceExhausted => write!(f, "No user IDs left to assign"),
            Error::Storage(error) => write!(f, "Storage: {error:#}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(error) => Some(error),
            Error::NotFound(_) | Error::IdSpaceExhausted => None,
            Error::Storage(error) => Some(&**error),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Error::Validation(value)
    }
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::Storage(value)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// How the id of a newly added record is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdPolicy {
    /// One more than the largest id in the list.
    #[default]
    MaxPlusOne,
    /// One more than the id of the last record in the list. Can hand out an id
    /// that is still in use if the list is not sorted by id.
    LastPlusOne,
}

impl IdPolicy {
    /// `None` once the base id is `i64::MAX`.
    pub fn next_id(self, records: &[UserRecord]) -> Option<UserId> {
        let base = match self {
            IdPolicy::MaxPlusOne => records.iter().map(|r| r.id).max(),
            IdPolicy::LastPlusOne => records.last().map(|r| r.id),
        };
        match base {
            Some(id) => id.0.checked_add(1).map(UserId),
            None => Some(UserId(1)),
        }
    }
}

/// The ordered list of user records, mirrored to a key-value storage after every change.
pub struct RecordStore<S> {
    storage: S,
    records: Vec<UserRecord>,
    id_policy: IdPolicy,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Load the list from storage. A missing or unparseable snapshot yields an empty list.
    pub fn load(storage: S, id_policy: IdPolicy) -> anyhow::Result<Self> {
        let records = read_snapshot(&storage)?;
        info!(
            "Loaded {} user(s) from {}",
            records.len(),
            storage.describe()
        );
        Ok(Self {
            storage,
            records,
            id_policy,
        })
    }

    /// Re-read the persisted snapshot, discarding the in-memory list.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        self.records = read_snapshot(&self.storage)?;
        Ok(())
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn get(&self, id: UserId) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add(&mut self, form: &FormBuffer) -> Result<UserId> {
        validate(form)?;

        let id = self
            .id_policy
            .next_id(&self.records)
            .ok_or(Error::IdSpaceExhausted)?;
        let previous = self.records.clone();
        self.records.push(UserRecord::from_form(id, form));
        self.persist_or_restore(previous)?;

        info!("Added user {}", self.records[self.records.len() - 1].identify());
        Ok(id)
    }

    pub fn update(&mut self, id: UserId, form: &FormBuffer) -> Result<()> {
        validate(form)?;

        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            return Err(Error::NotFound(id));
        };

        let previous = self.records.clone();
        self.records[index].assign_from(form);
        self.persist_or_restore(previous)?;

        info!("Updated user {}", self.records[index].identify());
        Ok(())
    }

    /// Remove the record with the given id, if any. The list is persisted either way.
    /// Returns whether a record was removed.
    pub fn delete(&mut self, id: UserId) -> Result<bool> {
        let previous = self.records.clone();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != previous.len();
        self.persist_or_restore(previous)?;

        if removed {
            info!("Deleted user #{id}");
        } else {
            debug!("Delete of user #{id}: no such user");
        }
        Ok(removed)
    }

    fn persist_or_restore(&mut self, previous: Vec<UserRecord>) -> Result<()> {
        if let Err(err) = self.persist() {
            self.records = previous;
            return Err(Error::Storage(err));
        }
        Ok(())
    }

    fn persist(&mut self) -> anyhow::Result<()> {
        let snapshot =
            serde_json::to_string(&self.records).context("Serializing the user list")?;
        self.storage
            .set_item(USERS_KEY, &snapshot)
            .with_context(|| format!("Persisting {} user(s)", self.records.len()))?;
        debug!("Persisted {} user(s)", self.records.len());
        Ok(())
    }
}

fn read_snapshot<S: KeyValueStorage>(storage: &S) -> anyhow::Result<Vec<UserRecord>> {
    let Some(snapshot) = storage
        .get_item(USERS_KEY)
        .with_context(|| format!("Reading {USERS_KEY:?} from {}", storage.describe()))?
    else {
        debug!("No {USERS_KEY:?} snapshot in {}", storage.describe());
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<UserRecord>>(&snapshot) {
        Ok(records) => {
            let mut seen = HashSet::new();
            for record in records.iter() {
                if !seen.insert(record.id) {
                    warn!("Duplicate user ID {} in {USERS_KEY:?} snapshot", record.id);
                }
                if record.id.0 <= 0 {
                    warn!("Non-positive user ID {} in {USERS_KEY:?} snapshot", record.id);
                }
            }
            Ok(records)
        }
        Err(err) => {
            warn!(
                "Ignoring unparseable {USERS_KEY:?} snapshot in {}: {err}",
                storage.describe()
            );
            Ok(Vec::new())
        }
    }
}
