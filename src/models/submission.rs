use super::types::UtcDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub u64);

/// A contact form entry as stored in the `contact_form` table.
///
/// `password` always holds the PHC-formatted hash, never the plaintext.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub image_path: Option<String>,
    pub address: String,
    pub created_at: UtcDateTime,
}

#[derive(Debug)]
pub struct NewSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub password_hash: String,
    pub image_path: Option<String>,
    pub address: String,
}
