//! Notification boundary.
//!
//! Delivery itself belongs to an external collaborator; this module only
//! defines the gateway trait and the wrapper that converts transport
//! errors into operator-readable strings. `deliver` never propagates a
//! failure — callers always get a message back.

pub trait NotificationGateway {
    fn send_email(&self, recipient: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

/// Send through the gateway, catching any transport error.
pub fn deliver(
    gateway: &dyn NotificationGateway,
    recipient: &str,
    subject: &str,
    html_body: &str,
) -> String {
    match gateway.send_email(recipient, subject, html_body) {
        Ok(()) => format!("Email sent successfully to {recipient}"),
        Err(e) => format!("Error sending email: {e}"),
    }
}

/// Gateway that records the message in the log instead of sending it.
/// Used when no external transport is wired up.
pub struct LogGateway;

impl NotificationGateway for LogGateway {
    fn send_email(&self, recipient: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        log::info!(
            "notification to {recipient}: {subject} ({} bytes of html)",
            html_body.len()
        );
        Ok(())
    }
}
