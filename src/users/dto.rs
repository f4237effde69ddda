use serde::{Deserialize, Deserializer, Serialize};

/// Optional filter parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
}

/// Placeholder payload returned by the stub endpoints: echoes the identifier
/// and nothing else.
#[derive(Debug, Serialize)]
pub struct PlaceholderUser {
    pub user_id: Option<String>,
}

/// Payload for creating a user. `password` arrives as plaintext and is hashed
/// before it reaches the database.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub password: String,
}

/// Tri-state update field: distinguishes a key absent from the payload from
/// one explicitly set to `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_provided(&self) -> bool {
        !matches!(self, Patch::Missing)
    }

    /// Value the column should take when the field was provided. `Null` and
    /// `Missing` both collapse to `None`; callers gate on `is_provided`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

// Serde only calls a field's deserializer when the key is present, so
// `#[serde(default)]` yields `Missing` for absent keys and this impl maps
// `null`/value to the other two states.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// Partial update for an existing user. Fields left `Missing` are skipped by
/// the repository.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub user_name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub age: Patch<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_null_and_value() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"email": "a@b.c", "first_name": null}"#).unwrap();
        assert_eq!(patch.email, Patch::Value("a@b.c".to_string()));
        assert_eq!(patch.first_name, Patch::Null);
        assert_eq!(patch.user_name, Patch::Missing);
        assert_eq!(patch.age, Patch::Missing);
    }

    #[test]
    fn empty_patch_provides_nothing() {
        let patch: UserPatch = serde_json::from_str("{}").unwrap();
        assert!(!patch.user_name.is_provided());
        assert!(!patch.email.is_provided());
        assert!(!patch.first_name.is_provided());
        assert!(!patch.last_name.is_provided());
        assert!(!patch.age.is_provided());
    }

    #[test]
    fn into_option_collapses_states() {
        assert_eq!(Patch::Value(7).into_option(), Some(7));
        assert_eq!(Patch::<i32>::Null.into_option(), None);
        assert_eq!(Patch::<i32>::Missing.into_option(), None);
    }

    #[test]
    fn placeholder_user_serializes_null_id() {
        let json = serde_json::to_value(PlaceholderUser { user_id: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "user_id": null }));
    }
}
