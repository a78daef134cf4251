//! SMTP notifier
//!
//! Implicit-TLS SMTP with login credentials. Transport settings are
//! all-or-nothing: without a complete [`SmtpConfig`] the notifier is built
//! disabled and every send reports [`NotifyError::NotConfigured`].

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;
use crate::error::NotifyError;
use crate::types::Notifier;

struct Transport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

/// Email [`Notifier`] over SMTP
pub struct SmtpNotifier {
    transport: Option<Transport>,
}

impl SmtpNotifier {
    /// Build from resolved settings; `None` yields a disabled notifier
    pub fn new(config: Option<SmtpConfig>) -> Self {
        let Some(config) = config else {
            error!("SMTP configuration is incomplete. Email notifications disabled.");
            return Self::disabled();
        };

        match Self::build_transport(&config) {
            Ok(transport) => {
                info!(server = %config.server, port = config.port, "SMTP notifier configured");
                Self {
                    transport: Some(transport),
                }
            }
            Err(e) => {
                error!("SMTP transport setup failed: {}. Email notifications disabled.", e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    fn build_transport(config: &SmtpConfig) -> Result<Transport, NotifyError> {
        let from = parse_mailbox(&config.from_address)?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Transport { mailer, from })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::Address(address.to_string(), e.to_string()))
}

/// Plain-text message from `from` to `to`
pub fn build_message(from: Mailbox, to: &str, subject: &str, body: &str) -> Result<Message, NotifyError> {
    Message::builder()
        .from(from)
        .to(parse_mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| NotifyError::Build(e.to_string()))
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, address: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let transport = self.transport.as_ref().ok_or(NotifyError::NotConfigured)?;
        let message = build_message(transport.from.clone(), address, subject, body)?;

        transport
            .mailer
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!("Email sent to {}", address);
        Ok(())
    }
}
