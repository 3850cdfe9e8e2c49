use email_address::{EmailAddress, Options};
use serde::{Deserialize, Serialize};

/// Maximum length of a submitter name, in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 120;

/// Maximum length of a message body, in characters, as submitted.
pub const MESSAGE_MAX_CHARS: usize = 5000;

/// Request body of a contact-form post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Reasons a contact form is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NameEmpty,
    NameTooLong { chars: usize },
    InvalidEmail,
    MessageEmpty,
    MessageTooLong { chars: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameEmpty => write!(f, "name must not be empty"),
            Self::NameTooLong { chars } => {
                write!(f, "name exceeds {NAME_MAX_CHARS} chars ({chars})")
            },
            Self::InvalidEmail => write!(f, "email is not a valid email address"),
            Self::MessageEmpty => write!(f, "message must not be empty"),
            Self::MessageTooLong { chars } => {
                write!(f, "message exceeds {MESSAGE_MAX_CHARS} chars ({chars})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

impl ContactForm {
    /// Check every field constraint, reporting the first failure in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_chars = self.name.trim().chars().count();
        if name_chars == 0 {
            return Err(ValidationError::NameEmpty);
        }
        if name_chars > NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong { chars: name_chars });
        }

        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }

        // The limit counts the raw text; blank messages are rejected separately.
        let message_chars = self.message.chars().count();
        if self.message.trim().is_empty() {
            return Err(ValidationError::MessageEmpty);
        }
        if message_chars > MESSAGE_MAX_CHARS {
            return Err(ValidationError::MessageTooLong {
                chars: message_chars,
            });
        }
        Ok(())
    }
}

/// Syntactic address check. Only a bare `local@domain` passes: display names
/// (`Ada <ada@example.com>`), domain literals and quoted local parts are
/// refused, and the domain must be dotted, so `user@localhost` fails too.
pub fn is_valid_email(email: &str) -> bool {
    let options = Options::default()
        .without_display_text()
        .without_domain_literal();
    match EmailAddress::parse_with_options(email, options) {
        Ok(addr) => {
            let domain = addr.domain();
            !addr.local_part().starts_with('"')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        },
        Err(_) => false,
    }
}

/// Trim a message and collapse `\r\n` / `\n` line breaks into single spaces.
pub fn normalize_message(message: &str) -> String {
    message.trim().replace("\r\n", " ").replace('\n', " ")
}

/// One validated contact-form entry, ready to be persisted as a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    /// Column names of the storage file, in record order.
    pub const HEADER: [&'static str; 4] = ["timestamp", "name", "email", "message"];

    /// Validate a form and normalize it into a row stamped with `timestamp`.
    pub fn from_form(form: ContactForm, timestamp: String) -> Result<Self, ValidationError> {
        form.validate()?;
        Ok(Self {
            timestamp,
            name: form.name.trim().to_string(),
            email: form.email,
            message: normalize_message(&form.message),
        })
    }

    /// The header row as a single newline-terminated CSV line.
    pub fn header_line() -> Result<Vec<u8>, csv::Error> {
        encode_record(Self::HEADER)
    }

    /// This submission as a single newline-terminated CSV line.
    pub fn to_csv_line(&self) -> Result<Vec<u8>, csv::Error> {
        encode_record([
            self.timestamp.as_str(),
            self.name.as_str(),
            self.email.as_str(),
            self.message.as_str(),
        ])
    }
}

fn encode_record(fields: [&str; 4]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
