pub mod submission;
pub mod time;

pub use submission::{ContactForm, Submission, ValidationError};
