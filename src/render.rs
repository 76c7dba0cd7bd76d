use strum::IntoEnumIterator;

use crate::form::FormSession;
use crate::record::{Field, UserRecord};
use crate::storage::KeyValueStorage;

pub fn render_card(record: &UserRecord) -> String {
    format!(
        "{}\n  Email: {}\n  Password: {}\n  Phone: {}\n  City: {}\n  [Edit #{id}] [Delete #{id}]\n",
        record.name,
        record.email,
        record.password,
        record.phone,
        record.city,
        id = record.id,
    )
}

pub fn render_list(records: &[UserRecord]) -> String {
    if records.is_empty() {
        return "(no users)\n".to_owned();
    }
    records
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The whole component: inputs, buttons and, if toggled on, the record cards.
pub fn render_session<S: KeyValueStorage>(session: &FormSession<S>) -> String {
    let mut out = String::from("User Details\n");

    for field in Field::iter() {
        let value = session.form().get(field);
        let shown = if value.is_empty() {
            format!("<{}>", field.placeholder())
        } else {
            value.to_owned()
        };
        out.push_str(&format!("  {:<9} {shown}\n", format!("{field}:")));
    }

    out.push_str(&format!(
        "[{}] [{}]\n",
        session.primary_action_label(),
        session.toggle_label()
    ));

    if session.list_visible() {
        out.push('\n');
        out.push_str(&render_list(session.store().records()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UserId;
    use crate::storage::MemoryStorage;
    use crate::store::{IdPolicy, RecordStore};

    fn record(id: i64, name: &str) -> UserRecord {
        UserRecord {
            name: name.to_owned(),
            email: "a@gmail.com".to_owned(),
            password: "12345678".to_owned(),
            phone: "1234567890".to_owned(),
            city: "X".to_owned(),
            id: UserId(id),
        }
    }

    #[test]
    fn test_card_shows_password_unmasked() {
        let card = render_card(&record(2, "A"));
        assert_eq!(
            card,
            "A\n  Email: a@gmail.com\n  Password: 12345678\n  Phone: 1234567890\n  City: X\n  [Edit #2] [Delete #2]\n"
        );
    }

    #[test]
    fn test_list_keeps_order() {
        let list = render_list(&[record(1, "First"), record(2, "Second")]);
        let first = list.find("First").unwrap();
        let second = list.find("Second").unwrap();
        assert!(first < second);
        assert_eq!(render_list(&[]), "(no users)\n");
    }

    #[test]
    fn test_session_hides_list_until_toggled() {
        let mut session = FormSession::new(
            RecordStore::load(MemoryStorage::new(), IdPolicy::default()).unwrap(),
        );
        session.set_field(Field::Name, "Typed");

        let rendered = render_session(&session);
        assert!(rendered.contains("Typed"));
        assert!(rendered.contains("<Email (e.g. abc@gmail.com)>"));
        assert!(rendered.contains("[Add User] [View Users]"));
        assert!(!rendered.contains("(no users)"));

        session.toggle_list();
        let rendered = render_session(&session);
        assert!(rendered.contains("[Hide Users]"));
        assert!(rendered.contains("(no users)"));
    }
}
