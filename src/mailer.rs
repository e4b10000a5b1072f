//! SMTP transmission of the rendered digest.
//!
//! One message per run, sent to the whole recipient list over an
//! implicit-TLS authenticated session. The transport opens a connection for
//! the send and closes it when the send finishes, on success and on error
//! alike. A send failure propagates: the caller must not record any
//! source's latest post when the digest did not go out.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::MailerSettings;
use crate::error::Result;

/// Display name used in the `From` header and the subject line.
const DISPLAY_NAME: &str = "Floydian Newsletter";

/// Sends the digest through the configured relay.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl Mailer {
    /// Build a transport for the configured relay.
    ///
    /// The connection itself is only opened when a message is sent; the
    /// password is used as the login secret for the sender address and is
    /// never persisted.
    pub fn new(settings: &MailerSettings, password: String) -> Result<Self> {
        let tls = TlsParameters::new(settings.server.clone())?;
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.server.as_str())
            .port(settings.port)
            .tls(Tls::Wrapper(tls))
            .credentials(Credentials::new(settings.sender.clone(), password))
            .build();
        Ok(Self {
            transport,
            sender: settings.sender.clone(),
        })
    }

    /// Send the rendered digest to every recipient as one message.
    #[instrument(level = "info", skip_all, fields(recipients = recipients.len()))]
    pub async fn send_digest(
        &self,
        html: String,
        recipients: &[String],
        send_date: &str,
    ) -> Result<()> {
        let message = build_message(&self.sender, recipients, send_date, html)?;
        self.transport.send(message).await?;
        info!("digest sent");
        Ok(())
    }
}

/// Assemble the digest message.
///
/// Kept separate from the transport so header construction is testable
/// without a relay.
fn build_message(
    sender: &str,
    recipients: &[String],
    send_date: &str,
    html: String,
) -> Result<Message> {
    let from: Mailbox = format!("{DISPLAY_NAME} <{sender}>").parse()?;
    let mut builder = Message::builder()
        .from(from)
        .subject(format!("{DISPLAY_NAME} {send_date}"))
        .header(ContentType::TEXT_HTML);
    for recipient in recipients {
        builder = builder.to(recipient.parse()?);
    }
    Ok(builder.body(html)?)
}
