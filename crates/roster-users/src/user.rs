//! User record types.

use serde::{Deserialize, Serialize};

/// One of the three editable fields of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserField {
    /// `firstName`
    FirstName,
    /// `lastName`
    LastName,
    /// `hobby`
    Hobby,
}

impl UserField {
    /// All fields, in the order validation checks them.
    pub const ALL: [UserField; 3] = [UserField::FirstName, UserField::LastName, UserField::Hobby];

    /// Key used for this field in JSON bodies.
    pub fn json_key(self) -> &'static str {
        match self {
            UserField::FirstName => "firstName",
            UserField::LastName => "lastName",
            UserField::Hobby => "hobby",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            UserField::FirstName => "First name",
            UserField::LastName => "Last name",
            UserField::Hobby => "Hobby",
        }
    }
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.json_key())
    }
}

/// Trims whitespace and byte order marks from both ends of a field value.
pub(crate) fn trim_field(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// A user stored in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Store-assigned identifier, never reused.
    pub id: u64,
    /// Trimmed first name.
    pub first_name: String,
    /// Trimmed last name.
    pub last_name: String,
    /// Trimmed hobby.
    pub hobby: String,
}

impl UserRecord {
    /// Creates a record with the given id from validated fields.
    pub fn new(id: u64, user: NewUser) -> Self {
        Self {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            hobby: user.hobby,
        }
    }

    /// Overwrites the fields present in `patch`, leaving the rest alone.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(hobby) = patch.hobby {
            self.hobby = hobby;
        }
    }
}

/// Validated fields for a new user. All values are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub hobby: String,
}

impl NewUser {
    /// Creates a new user payload, trimming each value.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        hobby: impl AsRef<str>,
    ) -> Self {
        Self {
            first_name: trim_field(first_name.as_ref()).to_string(),
            last_name: trim_field(last_name.as_ref()).to_string(),
            hobby: trim_field(hobby.as_ref()).to_string(),
        }
    }
}

/// Validated partial update. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hobby: Option<String>,
}

impl UserPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.hobby.is_none()
    }

    pub(crate) fn set(&mut self, field: UserField, value: String) {
        match field {
            UserField::FirstName => self.first_name = Some(value),
            UserField::LastName => self.last_name = Some(value),
            UserField::Hobby => self.hobby = Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = UserRecord::new(7, NewUser::new("Ann", "Lee", "chess"));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(json["lastName"], "Lee");
        assert_eq!(json["hobby"], "chess");
    }

    #[test]
    fn test_apply_overwrites_only_present_fields() {
        let mut record = UserRecord::new(1, NewUser::new("John", "Doe", "reading"));
        record.apply(UserPatch {
            hobby: Some("music".into()),
            ..Default::default()
        });

        assert_eq!(record.id, 1);
        assert_eq!(record.first_name, "John");
        assert_eq!(record.last_name, "Doe");
        assert_eq!(record.hobby, "music");
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(UserPatch::default().is_empty());

        let mut patch = UserPatch::default();
        patch.set(UserField::LastName, "Lee".into());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_field_keys_and_labels() {
        let keys: Vec<_> = UserField::ALL.iter().map(|f| f.json_key()).collect();
        assert_eq!(keys, ["firstName", "lastName", "hobby"]);
        assert_eq!(UserField::Hobby.label(), "Hobby");
    }
}
