pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod form;
pub mod interactive;
pub mod record;
pub mod render;
pub mod storage;
pub mod store;
pub mod validate;

pub use form::{FormSession, Notice};
pub use record::{Field, FormBuffer, UserId, UserRecord};
pub use store::{IdPolicy, RecordStore};
pub use validate::{validate, ValidationError};
