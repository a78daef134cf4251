//! Concrete external collaborators
//!
//! - Monday.com board (scheduling records)
//! - Kaltura (video hosting and ownership)
//! - SMTP (owner notification)

pub mod kaltura_client;
pub mod monday_client;
pub mod smtp_notifier;

pub use kaltura_client::KalturaClient;
pub use monday_client::MondayClient;
pub use smtp_notifier::SmtpNotifier;
