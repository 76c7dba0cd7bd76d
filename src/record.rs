use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored user, in the exact shape persisted under the `users` key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    /// Kept in plaintext, shown unmasked.
    pub password: String,
    pub phone: String,
    pub city: String,
    pub id: UserId,
}

impl UserRecord {
    pub fn from_form(id: UserId, form: &FormBuffer) -> UserRecord {
        UserRecord {
            name: form.name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            phone: form.phone.clone(),
            city: form.city.clone(),
            id,
        }
    }

    /// Overwrite everything except the id.
    pub fn assign_from(&mut self, form: &FormBuffer) {
        self.name.clone_from(&form.name);
        self.email.clone_from(&form.email);
        self.password.clone_from(&form.password);
        self.phone.clone_from(&form.phone);
        self.city.clone_from(&form.city);
    }

    pub fn identify(&self) -> String {
        format!("#{} {} <{}>", self.id, self.name, self.email)
    }
}

/// The editable draft behind the form inputs. Carries no id: whether it is a
/// new record or an edit is tracked next to it by the form session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuffer {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub city: String,
}

impl FormBuffer {
    pub fn new() -> FormBuffer {
        FormBuffer::default()
    }

    pub fn from_record(record: &UserRecord) -> FormBuffer {
        FormBuffer {
            name: record.name.clone(),
            email: record.email.clone(),
            password: record.password.clone(),
            phone: record.phone.clone(),
            city: record.city.clone(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::Phone => &self.phone,
            Field::City => &self.city,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::Phone => &mut self.phone,
            Field::City => &mut self.city,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = FormBuffer::default();
    }

    pub fn is_blank(&self) -> bool {
        *self == FormBuffer::default()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Field {
    Name,
    Email,
    Password,
    Phone,
    City,
}

impl Field {
    /// Placeholder text shown next to an empty input.
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email (e.g. abc@gmail.com)",
            Field::Password => "Password (8 chars)",
            Field::Phone => "Phone (10 digits)",
            Field::City => "City",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn sample() -> UserRecord {
        UserRecord {
            name: "A".to_owned(),
            email: "a@gmail.com".to_owned(),
            password: "12345678".to_owned(),
            phone: "1234567890".to_owned(),
            city: "X".to_owned(),
            id: UserId(1),
        }
    }

    #[test]
    fn test_record_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "A",
                "email": "a@gmail.com",
                "password": "12345678",
                "phone": "1234567890",
                "city": "X",
                "id": 1
            })
        );
    }

    #[test]
    fn test_assign_from_keeps_id() {
        let mut record = sample();
        let mut form = FormBuffer::from_record(&record);
        form.city = "NewCity".to_owned();
        record.id = UserId(7);
        record.assign_from(&form);
        assert_eq!(record.id, UserId(7));
        assert_eq!(record.city, "NewCity");
        assert_eq!(record.name, "A");
    }

    #[test]
    fn test_field_parse_and_set() {
        let mut form = FormBuffer::new();
        for field in Field::iter() {
            let parsed = Field::from_str(&field.to_string()).unwrap();
            assert_eq!(parsed, field);
            form.set(field, "v");
            assert_eq!(form.get(field), "v");
        }
        assert_eq!(Field::from_str("EMAIL").unwrap(), Field::Email);
        assert!(Field::from_str("id").is_err());
    }

    #[test]
    fn test_clear() {
        let mut form = FormBuffer::from_record(&sample());
        assert!(!form.is_blank());
        form.clear();
        assert!(form.is_blank());
    }
}
