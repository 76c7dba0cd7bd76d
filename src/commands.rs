use log::info;
use strum::IntoEnumIterator;

use crate::cli::FieldArgs;
use crate::form::{FormSession, Notice};
use crate::record::{Field, UserId};
use crate::render::{render_card, render_list};
use crate::storage::KeyValueStorage;

impl FieldArgs {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Password => self.password.as_deref(),
            Field::Phone => self.phone.as_deref(),
            Field::City => self.city.as_deref(),
        }
    }
}

fn apply_fields<S: KeyValueStorage>(session: &mut FormSession<S>, fields: &FieldArgs) {
    for field in Field::iter() {
        if let Some(value) = fields.get(field) {
            session.set_field(field, value);
        }
    }
}

/// Fields left out are submitted empty, so the form reports them as missing.
pub fn add_user<S: KeyValueStorage>(
    session: &mut FormSession<S>,
    fields: &FieldArgs,
) -> anyhow::Result<Notice> {
    session.cancel_edit();
    apply_fields(session, fields);
    session.submit()
}

pub fn update_user<S: KeyValueStorage>(
    session: &mut FormSession<S>,
    id: UserId,
    fields: &FieldArgs,
) -> anyhow::Result<Notice> {
    let notice = session.begin_edit(id);
    if !notice.is_success() {
        return Ok(notice);
    }
    apply_fields(session, fields);
    session.submit()
}

pub fn delete_user<S: KeyValueStorage>(
    session: &mut FormSession<S>,
    id: UserId,
) -> anyhow::Result<Notice> {
    session.delete(id)
}

pub fn list_users<S: KeyValueStorage>(session: &FormSession<S>) -> String {
    info!("Listing {} user(s)", session.store().len());
    render_list(session.store().records())
}

pub fn show_user<S: KeyValueStorage>(session: &FormSession<S>, id: UserId) -> Result<String, Notice> {
    match session.store().get(id) {
        Some(record) => Ok(render_card(record)),
        None => Err(Notice::Failure(format!("No user with ID {id}"))),
    }
}
