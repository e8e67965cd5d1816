//! Delivery of account activation links.

use thiserror::Error;

#[derive(Error, Debug)]
#[error("Activation notice failed: {0}")]
pub struct NotifyError(pub String);

/// Everything a notifier needs to tell a new user how to activate.
#[derive(Debug, Clone)]
pub struct ActivationNotice {
    pub username: String,
    pub email: String,
    pub link: String,
}

pub trait ActivationNotifier: Send + Sync {
    fn send_activation(&self, notice: &ActivationNotice) -> Result<(), NotifyError>;
}

/// Default notifier: writes the link to the log instead of sending mail.
pub struct LogActivationNotifier;

impl ActivationNotifier for LogActivationNotifier {
    fn send_activation(&self, notice: &ActivationNotice) -> Result<(), NotifyError> {
        tracing::info!(
            username = %notice.username,
            email = %notice.email,
            link = %notice.link,
            "Activation link issued"
        );
        Ok(())
    }
}
