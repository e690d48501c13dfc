use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use pulldown_cmark::{Parser, html};
use tracing::info;

use super::DeliveryError;
use crate::config::EmailConfig;

/// Sends the report as an HTML email over an authenticated STARTTLS session.
pub fn send(report: &str, settings: &EmailConfig) -> Result<(), DeliveryError> {
    let from: Mailbox = settings.from_email.parse()?;
    let to: Mailbox = settings.to_email.parse()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(settings.subject.clone())
        .multipart(MultiPart::alternative().singlepart(SinglePart::html(render_html(report))))?;

    let mailer = SmtpTransport::starttls_relay(&settings.smtp_server)?
        .port(settings.smtp_port)
        .credentials(Credentials::new(
            settings.from_email.clone(),
            settings.password.clone(),
        ))
        .build();

    mailer.send(&message)?;
    info!("report emailed to {}", settings.to_email);

    Ok(())
}

pub fn render_html(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(markdown));
    out
}
