// src/notify/mod.rs — Terminal-state alerting
//
// The orchestrator calls this on terminal states that need human attention
// (draft, failed). Fire-and-forget: a notification failure never fails the
// run.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::core::types::RunStatus;
use crate::infra::config::EmailConfig;
use crate::infra::errors::RalphError;

/// What the orchestrator hands to the port on a terminal state.
#[derive(Debug, Clone)]
pub struct RunNotification {
    pub run_id: String,
    pub slot: String,
    pub status: RunStatus,
    pub reason: String,
    pub final_score: Option<f32>,
    pub iterations: u32,
    pub total_cost_usd: f64,
}

impl RunNotification {
    /// "DRAFT" / "FAILED" / "SKIPPED" tag for the subject line.
    pub fn alert_type(&self) -> &'static str {
        if self.reason.starts_with("duplicate") {
            return "SKIPPED";
        }
        match self.status {
            RunStatus::Draft => "DRAFT",
            RunStatus::Failed => "FAILED",
            RunStatus::Published => "PUBLISHED",
            RunStatus::Pending => "PENDING",
        }
    }

    pub fn subject(&self) -> String {
        format!("[{}] Ralph: run for {}", self.alert_type(), self.slot)
    }

    pub fn body(&self) -> String {
        let score = self
            .final_score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "n/a".into());
        format!(
            "Ralph content generator alert\n\n\
             Run: {}\n\
             Slot: {}\n\
             Status: {}\n\
             Reason: {}\n\
             Final score: {}\n\
             Iterations: {}\n\
             Total cost: ${:.4}\n\n\
             -- Ralph",
            self.run_id,
            self.slot,
            self.status,
            self.reason,
            score,
            self.iterations,
            self.total_cost_usd,
        )
    }
}

#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn notify(&self, note: &RunNotification) -> Result<(), RalphError>;
}

/// Used when no alert channel is configured.
pub struct NoopNotifier;

#[async_trait]
impl NotificationPort for NoopNotifier {
    async fn notify(&self, note: &RunNotification) -> Result<(), RalphError> {
        tracing::debug!(run_id = %note.run_id, status = %note.status, "notification suppressed (no channel configured)");
        Ok(())
    }
}

/// SMTP email notifications.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn from_config(cfg: &EmailConfig) -> Result<Self, RalphError> {
        let host = cfg
            .smtp_host
            .as_deref()
            .ok_or_else(|| RalphError::Config("email.smtp_host is required".into()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| RalphError::Config(format!("invalid SMTP relay '{host}': {e}")))?
            .port(cfg.smtp_port);

        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let parse_mailbox = |field: &str, value: Option<&str>| -> Result<Mailbox, RalphError> {
            value
                .ok_or_else(|| RalphError::Config(format!("email.{field} is required")))?
                .parse()
                .map_err(|e| RalphError::Config(format!("invalid email.{field}: {e}")))
        };

        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox("from", cfg.from.as_deref())?,
            to: parse_mailbox("to", cfg.to.as_deref())?,
        })
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), RalphError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| RalphError::Other(anyhow::anyhow!("failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| RalphError::Other(anyhow::anyhow!("SMTP send failed: {e}")))?;
        Ok(())
    }

    /// Configuration-verification email for `ralph test-email`.
    pub async fn send_test_email(&self) -> Result<(), RalphError> {
        let body = format!(
            "This is a test email from the Ralph content generator.\n\n\
             If you received this, your email configuration is working.\n\n\
             From: {}\nTo: {}\n\n-- Ralph",
            self.from, self.to
        );
        self.send("[Ralph] Test email - configuration verified", &body)
            .await
    }
}

#[async_trait]
impl NotificationPort for EmailNotifier {
    async fn notify(&self, note: &RunNotification) -> Result<(), RalphError> {
        self.send(&note.subject(), &note.body()).await
    }
}
