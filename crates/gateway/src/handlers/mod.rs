//! HTTP handlers grouped by area.

pub mod admin_handler;
pub mod auth_handler;
pub mod config_handler;
pub mod health_handler;
pub mod ledger_handler;
pub mod notification_handler;
pub mod profile_handler;
pub mod records_handler;
pub mod reservation_handler;

use serde::Serialize;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use config_handler::public_routes;
pub use health_handler::health_routes;
pub use ledger_handler::ledger_routes;
pub use notification_handler::notification_routes;
pub use profile_handler::profile_routes;
pub use records_handler::records_routes;
pub use reservation_handler::reservation_routes;

/// `{success: true, data}` body used by list endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{success: true, message}` body for commands with nothing to return.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
