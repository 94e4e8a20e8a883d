//! Domain error taxonomy.
//!
//! Every failure the service can report to a client is a [`CoreError`]
//! variant. Each variant carries a stable short code, an HTTP status, a
//! short message and optionally a list of details and a hint. The HTTP layer
//! renders these into the `{error_code, message, details?, hint?}` envelope.

use std::fmt;

/// Why a bearer token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailure {
    InvalidKey,
    Malformed,
    BadSignature,
    Expired,
    NotYetValid,
    BadClaims,
}

impl TokenFailure {
    pub fn detail(self) -> &'static str {
        match self {
            TokenFailure::InvalidKey => "The signing key is invalid.",
            TokenFailure::Malformed => "This token is malformed.",
            TokenFailure::BadSignature => "The token signature is invalid.",
            TokenFailure::Expired => "This token has expired.",
            TokenFailure::NotYetValid => "This token is not valid yet.",
            TokenFailure::BadClaims => "The token claims are invalid.",
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            TokenFailure::Expired => Some("Try singing in again."),
            _ => None,
        }
    }
}

/// An ordered collection of human-readable validation failures.
///
/// Validators push every failing rule and convert the aggregate into a
/// single error at the end, so clients see all problems at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    messages: Vec<String>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }

    /// `Ok(())` when nothing was recorded, otherwise `wrap(self)`.
    pub fn into_result(self, wrap: impl FnOnce(Aggregate) -> CoreError) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(wrap(self))
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages.join(" "))
    }
}

/// Every error the domain can surface to a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    // --- U0xxx: URL and query string ---
    #[error("The requested resource could not be found.")]
    TargetNotFound,

    #[error("Bad value for query parameter \"{parameter}\": {reason}")]
    BadQueryParameter { parameter: String, reason: String },

    #[error("Multiple values for query parameter \"{parameter}\".")]
    MultipleValuesForQueryParameter { parameter: String },

    #[error("Query parameter \"{parameter}\" could not be parsed.")]
    QueryParameterNotParsed { parameter: String, rules: Vec<String> },

    #[error("Invalid UUID format for \"{parameter}\".")]
    InvalidUuidFormat { parameter: String },

    #[error("Invalid UUID length for \"{parameter}\": got {length} characters.")]
    InvalidUuidLength { parameter: String, length: usize },

    #[error("Method not allowed.")]
    MethodNotAllowed,

    // --- A0xxx: authentication and authorization ---
    #[error("Missing authorization.")]
    MissingAuthorization,

    #[error("Insufficient rights.")]
    InsufficientRights,

    #[error("Token verification failed: {}", .0.detail())]
    JwtFailure(TokenFailure),

    #[error("Corrupted claim \"{claim}\".")]
    CorruptedClaim { claim: &'static str },

    // --- S0xxx: service-level validation ---
    #[error("{context} {field} must be at most {limit} characters long.")]
    ValidationTooLong {
        field: &'static str,
        context: &'static str,
        limit: usize,
    },

    #[error("Password is too long.")]
    PasswordTooLong,

    #[error("{context} {field} must not be blank.")]
    ValidationRequired {
        field: &'static str,
        context: &'static str,
    },

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("A reminder cannot be set after the due date.")]
    InvalidSchedule,

    // --- RQxxx: request ---
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Password does not meet the restrictions: {0}")]
    PasswordRestrictions(Aggregate),

    #[error("An administrator cannot perform this operation on their own account.")]
    SelfOperation,

    #[error("Unsupported media type.")]
    UnsupportedMediaType,

    // --- R0xxx: repository ---
    #[error("User not found.")]
    UserNotFound,

    #[error("User no longer exists.")]
    UserNoLongerExists,

    #[error("Group not found.")]
    GroupNotFound,

    #[error("List not found.")]
    ListNotFound,

    #[error("Conflicting email address.")]
    DuplicateEmail,

    #[error("Task not found.")]
    TaskNotFound,

    #[error("Setting not found.")]
    SettingNotFound,

    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("User is blocked.")]
    UserBlocked,

    #[error("Deadline exceeded.")]
    DeadlineExceeded,

    #[error("Step not found.")]
    StepNotFound,

    #[error("Tag not found.")]
    TagNotFound,

    #[error("Conflicting tag name.")]
    DuplicateTag,

    #[error("Attachment not found.")]
    AttachmentNotFound,

    /// Anything unexpected. Never shown to clients.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable short code identifying the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::TargetNotFound => "U0001",
            CoreError::BadQueryParameter { .. } => "U0002",
            CoreError::MultipleValuesForQueryParameter { .. } => "U0003",
            CoreError::QueryParameterNotParsed { .. } => "U0004",
            CoreError::InvalidUuidFormat { .. } => "U0005",
            CoreError::InvalidUuidLength { .. } => "U0006",
            CoreError::MethodNotAllowed => "U0007",
            CoreError::MissingAuthorization => "A0001",
            CoreError::InsufficientRights => "A0002",
            CoreError::JwtFailure(_) => "A0003",
            CoreError::CorruptedClaim { .. } => "A0004",
            CoreError::ValidationTooLong { .. } => "S0001",
            CoreError::PasswordTooLong => "S0002",
            CoreError::ValidationRequired { .. } => "S0003",
            CoreError::InvalidEmail => "S0004",
            CoreError::InvalidSchedule => "S0005",
            CoreError::MalformedRequest(_) => "RQ001",
            CoreError::BadRequest(_) => "RQ002",
            CoreError::PasswordRestrictions(_) => "RQ003",
            CoreError::SelfOperation => "RQ004",
            CoreError::UnsupportedMediaType => "RQ005",
            CoreError::UserNotFound => "R0001",
            CoreError::UserNoLongerExists => "R0002",
            CoreError::GroupNotFound => "R0003",
            CoreError::ListNotFound => "R0004",
            CoreError::DuplicateEmail => "R0005",
            CoreError::TaskNotFound => "R0006",
            CoreError::SettingNotFound => "R0007",
            CoreError::IncorrectPassword => "R0008",
            CoreError::UserBlocked => "R0009",
            CoreError::DeadlineExceeded => "R0010",
            CoreError::StepNotFound => "R0011",
            CoreError::TagNotFound => "R0012",
            CoreError::DuplicateTag => "R0013",
            CoreError::AttachmentNotFound => "R0014",
            CoreError::Internal(_) => "INTERNAL",
        }
    }

    /// HTTP status carried by the error.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::TargetNotFound
            | CoreError::UserNotFound
            | CoreError::UserNoLongerExists
            | CoreError::GroupNotFound
            | CoreError::ListNotFound
            | CoreError::TaskNotFound
            | CoreError::SettingNotFound
            | CoreError::StepNotFound
            | CoreError::TagNotFound
            | CoreError::AttachmentNotFound => 404,
            CoreError::MethodNotAllowed => 405,
            CoreError::MissingAuthorization
            | CoreError::InsufficientRights
            | CoreError::JwtFailure(_)
            | CoreError::CorruptedClaim { .. }
            | CoreError::IncorrectPassword => 401,
            CoreError::UserBlocked => 403,
            CoreError::UnsupportedMediaType => 415,
            CoreError::DeadlineExceeded => 504,
            CoreError::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Short client-facing message.
    pub fn message(&self) -> String {
        match self {
            CoreError::JwtFailure(_) => "Invalid bearer token.".to_string(),
            CoreError::PasswordRestrictions(_) => {
                "The password does not meet the restrictions.".to_string()
            }
            CoreError::QueryParameterNotParsed { parameter, .. } => {
                format!("The query parameter \"{parameter}\" could not be parsed.")
            }
            CoreError::MalformedRequest(_) => "Malformed request.".to_string(),
            other => other.to_string(),
        }
    }

    /// Optional details rendered as a JSON array of sentences.
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            CoreError::JwtFailure(failure) => Some(vec![failure.detail().to_string()]),
            CoreError::PasswordRestrictions(aggregate) => Some(aggregate.messages().to_vec()),
            CoreError::QueryParameterNotParsed { rules, .. } => Some(rules.clone()),
            CoreError::MalformedRequest(detail) | CoreError::BadRequest(detail) => {
                Some(vec![detail.clone()])
            }
            CoreError::CorruptedClaim { claim } => Some(vec![format!(
                "The \"{claim}\" claim is missing or has the wrong shape."
            )]),
            _ => None,
        }
    }

    /// Optional hint on how to recover.
    pub fn hint(&self) -> Option<String> {
        let hint = match self {
            CoreError::JwtFailure(failure) => failure.hint(),
            CoreError::MissingAuthorization => {
                Some("Send a bearer token in the Authorization header.")
            }
            CoreError::DuplicateEmail => Some("Try using another one."),
            CoreError::DuplicateTag => Some("Try using another name."),
            CoreError::UserNoLongerExists => Some("Try signing up again."),
            CoreError::UserBlocked => Some("Contact an administrator."),
            CoreError::InvalidUuidFormat { .. } | CoreError::InvalidUuidLength { .. } => {
                Some("Identifiers are 36-character UUIDs.")
            }
            _ => None,
        };
        hint.map(str::to_string)
    }

    /// Whether the response must carry a `WWW-Authenticate` challenge.
    pub fn is_auth_challenge(&self) -> bool {
        matches!(
            self,
            CoreError::MissingAuthorization | CoreError::JwtFailure(_)
        )
    }
}
