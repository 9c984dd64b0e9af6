//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`EventDeskError`] via `From`.

use std::fmt;

/// Top-level error returned by application services.
#[derive(Debug, thiserror::Error)]
pub enum EventDeskError {
    /// One or more fields failed validation.
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// The requested row does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The storage backend failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ValidationError> for EventDeskError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(ValidationErrors::from(err))
    }
}

/// A row looked up by id does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Resource name, e.g. `"Event"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// A single field-level validation failure.
///
/// The display text is the message reported to API clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("This field is required.")]
    Required { field: &'static str },

    #[error("This field may not be blank.")]
    Blank { field: &'static str },

    #[error("This field may not be null.")]
    Null { field: &'static str },

    #[error("Not a valid string.")]
    NotAString { field: &'static str },

    #[error("Ensure this field has no more than {max} characters.")]
    TooLong { field: &'static str, max: usize },

    #[error(
        "Datetime has wrong format. Use one of these formats instead: \
         YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z]."
    )]
    InvalidTimestamp { field: &'static str },

    #[error("Invalid hyperlink - No URL match.")]
    NoUrlMatch { field: &'static str },

    #[error("Incorrect type. Expected URL string, received {received}.")]
    IncorrectType {
        field: &'static str,
        received: &'static str,
    },

    #[error("Invalid hyperlink - Object does not exist.")]
    DoesNotExist { field: &'static str },

    #[error(
        "Enter a valid username. This value may contain only letters, numbers, \
         and @/./+/-/_ characters."
    )]
    InvalidUsername,

    #[error("A user with that username already exists.")]
    UsernameTaken,

    #[error("Invalid data. Expected a dictionary, but got {received}.")]
    NotAnObject { received: &'static str },
}

impl ValidationError {
    /// Key under which this error is reported, `non_field_errors` when it
    /// concerns the payload as a whole.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::Blank { field }
            | Self::Null { field }
            | Self::NotAString { field }
            | Self::TooLong { field, .. }
            | Self::InvalidTimestamp { field }
            | Self::NoUrlMatch { field }
            | Self::IncorrectType { field, .. }
            | Self::DoesNotExist { field } => field,
            Self::InvalidUsername | Self::UsernameTaken => "username",
            Self::NotAnObject { .. } => "non_field_errors",
        }
    }
}

/// Every validation failure collected for one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any collected error targets `field`.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|err| err.field() == field)
    }

    /// `Ok(())` when nothing was collected, the collection otherwise.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was pushed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        Self(vec![err])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, err) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {err}", err.field())?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
