//! Notification boundary: transport errors come back as strings,
//! never as propagated failures.

use bankmart_core::notify::{deliver, LogGateway, NotificationGateway};

struct FailingGateway;

impl NotificationGateway for FailingGateway {
    fn send_email(&self, _recipient: &str, _subject: &str, _html_body: &str) -> anyhow::Result<()> {
        anyhow::bail!("smtp relay refused the connection")
    }
}

#[test]
fn success_returns_a_confirmation_string() {
    let message = deliver(
        &LogGateway,
        "ops@example.com",
        "Load summary",
        "<p>done</p>",
    );
    assert_eq!(message, "Email sent successfully to ops@example.com");
}

#[test]
fn transport_failure_is_caught_and_described() {
    let message = deliver(
        &FailingGateway,
        "ops@example.com",
        "Load summary",
        "<p>done</p>",
    );
    assert_eq!(
        message,
        "Error sending email: smtp relay refused the connection",
        "errors must surface as a descriptive string, not an Err"
    );
}
