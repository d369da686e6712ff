//! Sign-in credentials.
//!
//! Constructors validate raw form input before anything reaches the
//! account service.

use std::fmt;

use zeroize::Zeroizing;

use super::Error;

/// Returned when credential input is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Identity was missing or blank once trimmed.
    EmptyIdentity,
    /// Secret was blank.
    EmptySecret,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentity => write!(f, "identity must not be empty"),
            Self::EmptySecret => write!(f, "secret must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<CredentialsValidationError> for Error {
    fn from(value: CredentialsValidationError) -> Self {
        Self::invalid_argument(value.to_string())
    }
}

/// Account secret, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Wrap a non-empty secret. Whitespace is kept as typed.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        if raw.is_empty() {
            return Err(CredentialsValidationError::EmptySecret);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret to an account service adapter.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Validated identity/secret pair.
///
/// ## Invariants
/// - `identity` is trimmed and non-empty.
/// - `secret` is non-empty.
///
/// # Examples
/// ```
/// use lostfound::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada@campus.edu ", "hunter2").unwrap();
/// assert_eq!(creds.identity(), "ada@campus.edu");
/// assert!(!format!("{creds:?}").contains("hunter2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    identity: String,
    secret: Secret,
}

impl Credentials {
    /// Construct credentials from raw form input.
    pub fn try_from_parts(identity: &str, secret: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = identity.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyIdentity);
        }
        Ok(Self {
            identity: normalized.to_owned(),
            secret: Secret::new(secret)?,
        })
    }

    /// Identity (email) used for account lookups.
    pub fn identity(&self) -> &str {
        self.identity.as_str()
    }

    /// Secret supplied by the caller.
    pub fn secret(&self) -> &Secret {
        &self.secret
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyIdentity)]
    #[case("   ", "pw", CredentialsValidationError::EmptyIdentity)]
    #[case("ada@campus.edu", "", CredentialsValidationError::EmptySecret)]
    fn invalid_credentials(
        #[case] identity: &str,
        #[case] secret: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(identity, secret)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn secret_keeps_whitespace() {
        let creds = Credentials::try_from_parts("ada@campus.edu", " pw ").expect("valid");
        assert_eq!(creds.secret().expose(), " pw ");
    }

    #[rstest]
    fn debug_redacts_secret() {
        let secret = Secret::new("hunter2").expect("valid");
        assert_eq!(format!("{secret:?}"), "Secret(..)");
    }
}
