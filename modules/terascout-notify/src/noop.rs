use async_trait::async_trait;

use crate::error::NotifyError;
use crate::EmailSender;

/// No-op backend for tests and environments without provider credentials.
pub struct NoopEmailSender;

#[async_trait]
impl EmailSender for NoopEmailSender {
    async fn send(&self, _from: &str, _to: &str, _subject: &str, _html: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_always_succeeds() {
        let sender = NoopEmailSender;
        let result = sender.send("a@b.com", "c@d.com", "subj", "<p>hi</p>").await;
        assert!(result.is_ok());
    }
}
