//! Hand-off of paid app orders to the web shop.

use async_trait::async_trait;

use common::AppResult;
use domain::{LoyaltyUser, OrderRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderForwarder: Send + Sync {
    /// Submit the order and return the shop's order reference.
    async fn forward(&self, user: &LoyaltyUser, order: &OrderRequest) -> AppResult<String>;
}

/// Logs the order and hands back a locally generated reference.
#[derive(Default)]
pub struct LoggingOrderForwarder;

#[async_trait]
impl OrderForwarder for LoggingOrderForwarder {
    async fn forward(&self, user: &LoyaltyUser, order: &OrderRequest) -> AppResult<String> {
        let reference = format!("APP-{}", uuid::Uuid::new_v4().simple());
        let customer = order.customer_info.clone().unwrap_or_default();

        for item in order.line_items() {
            tracing::debug!(
                reference = %reference,
                product_id = item.product_id,
                quantity = item.quantity,
                total = %item.total,
                "Order line"
            );
        }
        tracing::info!(
            reference = %reference,
            rfid = user.rfid,
            customer = %customer.name,
            city = %customer.city,
            final_price = order.final_price_after_points,
            points_used = order.points_used,
            "Order forwarded"
        );
        Ok(reference)
    }
}
