//! Integration tests for templated email sending
//!
//! Exercises the full pipeline with templates on disk, real attachment
//! files, and an in-memory transport.

use std::sync::Arc;

use email_sender::prelude::*;
use email_sender::testing::{LogCapture, RecordingTransport};
use serde_json::json;
use tempfile::TempDir;

/// Template directory with a welcome email
fn template_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("welcome.html"),
        "<html>\n<body>\n<h1>Welcome, {{ name }}!</h1>\n<p>Your plan: {{ plan }}</p>\n</body>\n</html>\n",
    )
    .unwrap();
    temp
}

fn welcome_context() -> Context {
    let mut context = Context::new();
    context.insert("name".to_string(), json!("Ann"));
    context.insert("plan".to_string(), json!("Pro"));
    context
}

#[tokio::test]
async fn test_welcome_email_is_sent_and_logged() {
    let templates = template_dir();
    let outbox = RecordingTransport::new();
    let sender = EmailSender::new(
        Arc::new(TemplateDirectory::new(templates.path()).unwrap()),
        Arc::new(outbox.clone()),
        "noreply@myapp.com",
    );
    let (logs, _guard) = LogCapture::start();

    let sent = sender
        .send_email(MessageRequest::new(
            "Welcome",
            "welcome.html",
            welcome_context(),
            "ann@example.com",
        ))
        .await
        .unwrap();

    assert!(sent);
    assert_eq!(
        logs.at("INFO"),
        vec!["Email sent to ann@example.com with subject: 'Welcome'"]
    );

    assert_eq!(outbox.sent_count(), 1);
    let email = outbox.last_sent().unwrap();
    assert_eq!(email.to, vec!["ann@example.com"]);
    assert!(email.html.as_deref().unwrap().contains("<h1>Welcome, Ann!</h1>"));

    let text = email.text.as_deref().unwrap();
    assert!(text.contains("Welcome, Ann!"));
    assert!(text.contains("Your plan: Pro"));
    assert!(!text.contains('<'));
}

#[tokio::test]
async fn test_readable_text_extractor() {
    let templates = template_dir();
    let outbox = RecordingTransport::new();
    let sender = EmailSender::new(
        Arc::new(TemplateDirectory::new(templates.path()).unwrap()),
        Arc::new(outbox.clone()),
        "noreply@myapp.com",
    )
    .with_text_extractor(Arc::new(TagStripper::readable()));

    sender
        .send_email(MessageRequest::new(
            "Welcome",
            "welcome.html",
            welcome_context(),
            "ann@example.com",
        ))
        .await
        .unwrap();

    let email = outbox.last_sent().unwrap();
    assert_eq!(email.text.as_deref(), Some("Welcome, Ann!\n\nYour plan: Pro"));
}

#[tokio::test]
async fn test_attachments_from_disk() {
    let templates = template_dir();
    let files = TempDir::new().unwrap();
    let invoice = files.path().join("invoice.pdf");
    std::fs::write(&invoice, b"%PDF-1.7 invoice").unwrap();
    let missing = files.path().join("terms.pdf");

    let outbox = RecordingTransport::new();
    let sender = EmailSender::new(
        Arc::new(TemplateDirectory::new(templates.path()).unwrap()),
        Arc::new(outbox.clone()),
        "billing@myapp.com",
    );
    let (logs, _guard) = LogCapture::start();

    let report = sender
        .deliver(
            MessageRequest::new("Invoice", "welcome.html", welcome_context(), "ann@example.com")
                .cc("accounts@example.com")
                .attachment(&invoice)
                .attachment(&missing),
        )
        .await
        .unwrap();

    assert_eq!(report.outcome, DeliveryOutcome::Sent);
    assert_eq!(report.skipped_attachments, vec![missing.clone()]);

    let email = outbox.last_sent().unwrap();
    assert_eq!(email.attachments.len(), 1);
    assert_eq!(email.attachments[0].filename, "invoice.pdf");
    assert_eq!(email.attachments[0].content_type, "application/pdf");
    assert_eq!(email.cc, vec!["accounts@example.com"]);

    assert_eq!(
        logs.at("WARN"),
        vec![format!("Attachment {} does not exist.", missing.display())]
    );
    assert!(logs.at("INFO").contains(&r#"CC: ["accounts@example.com"]"#.to_string()));
}

#[tokio::test]
async fn test_transport_failure_returns_false() {
    let templates = template_dir();
    let outbox = RecordingTransport::failing("connection refused");
    let sender = EmailSender::new(
        Arc::new(TemplateDirectory::new(templates.path()).unwrap()),
        Arc::new(outbox.clone()),
        "noreply@myapp.com",
    );
    let (logs, _guard) = LogCapture::start();

    let report = sender
        .deliver(MessageRequest::new(
            "Welcome",
            "welcome.html",
            welcome_context(),
            "ann@example.com",
        ))
        .await
        .unwrap();

    assert!(!report.is_sent());
    assert_eq!(
        report.outcome,
        DeliveryOutcome::Failed("SMTP error: connection refused".to_string())
    );

    assert_eq!(outbox.attempts(), 1);
    assert_eq!(
        logs.at("ERROR"),
        vec![
            "Failed to send email to ann@example.com with subject 'Welcome': \
             SMTP error: connection refused"
        ]
    );
    assert!(logs.at("INFO").is_empty());
}

#[tokio::test]
async fn test_invalid_recipient_is_a_transport_failure() {
    let templates = template_dir();
    let sender = EmailSender::new(
        Arc::new(TemplateDirectory::new(templates.path()).unwrap()),
        Arc::new(SmtpBackend::new(SmtpConfig::default())),
        "noreply@myapp.com",
    );

    let sent = sender
        .send_email(MessageRequest::new(
            "Welcome",
            "welcome.html",
            welcome_context(),
            "not an address",
        ))
        .await
        .unwrap();

    assert!(!sent);
}

#[tokio::test]
async fn test_console_backend_from_config() {
    let templates = template_dir();
    let config = MailerConfig {
        default_from_email: "dev@myapp.com".to_string(),
        backend: BackendKind::Console,
        templates: email_sender::config::TemplateSettings {
            template_dir: templates.path().to_path_buf(),
        },
        ..MailerConfig::default()
    };

    let sender = EmailSender::from_config(&config).unwrap();
    let (logs, _guard) = LogCapture::start();
    let sent = sender
        .send_email(
            MessageRequest::new("Welcome", "welcome.html", welcome_context(), "ann@example.com")
                .bcc("audit@myapp.com"),
        )
        .await
        .unwrap();

    assert!(sent);
    let naming_recipient: Vec<_> = logs
        .at("INFO")
        .into_iter()
        .filter(|line| line.contains("ann@example.com"))
        .collect();
    assert_eq!(
        naming_recipient,
        vec!["Email sent to ann@example.com with subject: 'Welcome'"]
    );
}
