// src/cli/test_email.rs — SMTP configuration check

use crate::infra::config::Config;
use crate::notify::EmailNotifier;

/// Send a test alert so SMTP settings can be verified before a real run
/// needs them.
pub async fn send_test_email(config: &Config) -> anyhow::Result<()> {
    if !config.email.enabled {
        anyhow::bail!("email notifications are disabled; set email.enabled = true in config");
    }

    let notifier = EmailNotifier::from_config(&config.email)?;
    notifier.send_test_email().await?;

    let to = config.email.to.as_deref().unwrap_or("(unknown)");
    println!("Test email sent to {to}.");
    Ok(())
}
