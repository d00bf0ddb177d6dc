use indoc::indoc;
use sqlx::{query, query_as, FromRow, Pool, Sqlite};
use tracing::debug;

use crate::{
    models::{types::UtcDateTime, NewSubmission, Submission, SubmissionId},
    repository::conversion::DBConvertible,
};

use super::conversion::DBFromConversionError;

const CREATE_CONTACT_FORM_TABLE: &str = indoc! {r#"
    CREATE TABLE IF NOT EXISTS contact_form (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name VARCHAR(255) NOT NULL,
        last_name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        mobile VARCHAR(20) NOT NULL,
        password VARCHAR(255) NOT NULL,
        image_path VARCHAR(255),
        address TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
"#};

pub struct SubmissionRepository {
    pool: Pool<Sqlite>,
}

impl SubmissionRepository {
    pub fn new(pool: Pool<Sqlite>) -> SubmissionRepository {
        SubmissionRepository { pool }
    }

    /// Creates the `contact_form` table unless it already exists.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), anyhow::Error> {
        query(CREATE_CONTACT_FORM_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn add_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<Submission, anyhow::Error> {
        let added_submission = query_as::<_, SqlSubmission>(indoc! {r#"
            INSERT INTO contact_form
                (first_name, last_name, email, mobile, password, image_path, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id,
                first_name,
                last_name,
                email,
                mobile,
                password,
                image_path,
                address,
                created_at
        "#})
        .bind(&submission.first_name)
        .bind(&submission.last_name)
        .bind(&submission.email)
        .bind(&submission.mobile)
        .bind(&submission.password_hash)
        .bind(&submission.image_path)
        .bind(&submission.address)
        .fetch_one(&self.pool)
        .await?;

        debug!("Inserted contact_form row {}", added_submission.id);

        Ok(Submission::from_db(&added_submission)?)
    }

    #[cfg(test)]
    pub async fn list_submissions(&self) -> Result<Vec<Submission>, anyhow::Error> {
        let rows = query_as::<_, SqlSubmission>("SELECT * FROM contact_form ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Submission::from_db(row).map_err(anyhow::Error::from))
            .collect()
    }
}

#[derive(Debug, FromRow)]
pub struct SqlSubmission {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    mobile: String,
    password: String,
    image_path: Option<String>,
    address: String,
    created_at: String,
}

impl DBConvertible for Submission {
    type DBType = SqlSubmission;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Submission {
            id: SubmissionId::from_db(&value.id)?,
            first_name: value.first_name.clone(),
            last_name: value.last_name.clone(),
            email: value.email.clone(),
            mobile: value.mobile.clone(),
            password: value.password.clone(),
            image_path: value.image_path.clone(),
            address: value.address.clone(),
            created_at: UtcDateTime::from_db(&value.created_at)?,
        })
    }
}
