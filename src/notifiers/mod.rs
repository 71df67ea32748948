pub mod email;
pub mod threshold;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

pub use email::SmtpMailer;
pub use threshold::{ThresholdCheck, compose_alert, notify_if_below};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers a composed email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}
