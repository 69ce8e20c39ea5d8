//! Outbound integrations.
//!
//! Each external system sits behind a trait. The shipped implementations
//! stay local: SMS and orders are logged, spreadsheets are read from JSON
//! exports on disk.

mod orders;
mod sheets;
mod sms;

pub use orders::{LoggingOrderForwarder, OrderForwarder};
pub use sheets::{JsonFileSheets, Sheet, SheetSource};
pub use sms::{LoggingSmsSender, SmsSender};

#[cfg(any(test, feature = "test-utils"))]
pub use orders::MockOrderForwarder;
#[cfg(any(test, feature = "test-utils"))]
pub use sheets::MockSheetSource;
#[cfg(any(test, feature = "test-utils"))]
pub use sms::MockSmsSender;
