use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("email provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}
