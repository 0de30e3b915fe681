use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("scout not found")]
    NotFound,
}

impl From<StoreError> for terascout_common::TerascoutError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => {
                terascout_common::TerascoutError::NotFound("scout".to_string())
            }
            other => terascout_common::TerascoutError::Store(other.to_string()),
        }
    }
}
