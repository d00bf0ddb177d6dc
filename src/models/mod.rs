mod submission;

pub mod types;

pub use submission::{NewSubmission, Submission, SubmissionId};
