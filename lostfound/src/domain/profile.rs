//! Student profile record.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

/// Validation errors returned by [`Profile::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    EmptyName,
    InvalidEmail,
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "profile name must not be empty"),
            Self::InvalidEmail => write!(f, "profile email must contain '@'"),
        }
    }
}

impl std::error::Error for ProfileValidationError {}

impl From<ProfileValidationError> for Error {
    fn from(value: ProfileValidationError) -> Self {
        Self::invalid_argument(value.to_string())
    }
}

/// Profile stored one-to-one with an account, keyed by email.
///
/// Serialised with the document field names used by the remote store:
/// `sic` for the student id and `college` for the institution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    #[serde(rename = "sic")]
    pub student_id: String,
    pub year: String,
    pub semester: String,
    #[serde(rename = "college")]
    pub institution: String,
    pub uid: String,
}

impl Profile {
    /// Check the fields the account service and document key depend on.
    ///
    /// # Examples
    /// ```
    /// use lostfound::domain::Profile;
    ///
    /// let profile = Profile {
    ///     name: "Ada".into(),
    ///     email: "ada@campus.edu".into(),
    ///     ..Profile::default()
    /// };
    /// assert!(profile.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if !self.email.contains('@') || self.email.trim() != self.email {
            return Err(ProfileValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// Document key for this profile.
    pub fn key(&self) -> &str {
        self.email.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn ada() -> Profile {
        Profile {
            name: "Ada Lovelace".to_owned(),
            email: "ada@campus.edu".to_owned(),
            student_id: "2105001".to_owned(),
            year: "3".to_owned(),
            semester: "6".to_owned(),
            institution: "KIIT".to_owned(),
            uid: "u-1".to_owned(),
        }
    }

    #[rstest]
    #[case(Profile { name: " ".to_owned(), ..ada() }, ProfileValidationError::EmptyName)]
    #[case(Profile { email: "ada.campus.edu".to_owned(), ..ada() }, ProfileValidationError::InvalidEmail)]
    #[case(Profile { email: " ada@campus.edu".to_owned(), ..ada() }, ProfileValidationError::InvalidEmail)]
    fn validate_rejects_bad_profiles(
        #[case] profile: Profile,
        #[case] expected: ProfileValidationError,
    ) {
        assert_eq!(profile.validate(), Err(expected));
    }

    #[rstest]
    fn serialises_with_document_field_names() {
        let value = serde_json::to_value(ada()).expect("serialise");
        assert_eq!(value.get("sic"), Some(&json!("2105001")));
        assert_eq!(value.get("college"), Some(&json!("KIIT")));
    }

    #[rstest]
    fn missing_fields_default_to_empty() {
        let profile: Profile =
            serde_json::from_value(json!({ "email": "ada@campus.edu" })).expect("deserialise");
        assert_eq!(profile.key(), "ada@campus.edu");
        assert!(profile.name.is_empty());
    }
}
