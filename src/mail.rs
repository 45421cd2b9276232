//! Outbound mail: order receipts and contact messages over SMTP.

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{cart::LineItem, config::Config, error::AppError};

/// Placeholder receipt recipient; a per-user email field is future work.
pub const RECEIPT_RECIPIENT: &str = "recipient@example.com";

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_relay)?
            .credentials(Credentials::new(
                config.mail_username.clone(),
                config.mail_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender: config.mail_username.clone(),
        })
    }

    /// Plain connection to an arbitrary host, for exercising send failures
    /// without a relay.
    #[cfg(test)]
    pub fn unencrypted(host: &str, port: u16, sender: &str) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            transport,
            sender: sender.to_string(),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub async fn send(&self, to: &str, subject: &str, body: String) -> Result<(), AppError> {
        let message = Message::builder()
            .from(self.sender.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

pub fn receipt_body(username: &str, items: &[LineItem], total: f64) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("{} (x{}) - ${:.2}", item.product.name, item.quantity, item.total))
        .collect();

    format!(
        "Hi {username},\n\nThanks for your order!\n\nYour items:\n{}\n\nTotal: ${total:.2}\n\n— Malvern Store",
        lines.join("\n")
    )
}

pub fn contact_body(name: &str, email: &str, message: &str) -> String {
    format!("Message from {name} <{email}>:\n\n{message}")
}
