//! Points history and settling points on shop orders.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::bonus_service::USER_NOT_FOUND;
use super::settings_service::DiscountService;
use crate::integrations::OrderForwarder;
use crate::repository::{LedgerRepository, UserRepository};
use common::{AppError, AppResult};
use domain::points::cashback;
use domain::{vrsta_cashback, LoyaltyUser, OrderPointsOutcome, OrderRequest, Points, TransactionView};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Rows shown on the home screen
const LAST_TRANSACTIONS: u64 = 3;

pub const POINTS_PAYMENT_DISABLED: &str = "Plaćanje sa računa trenutno nije omogućeno.";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderPlaced {
    pub message: String,
    pub order_id: String,
    pub points_used: f64,
    pub cashback_earned: f64,
    pub new_balance: f64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LedgerService: Send + Sync {
    async fn last_transactions(&self, user_id: i64) -> AppResult<Vec<TransactionView>>;

    async fn all_transactions(&self, user_id: i64) -> AppResult<Vec<TransactionView>>;

    /// Debit the points spent and credit cashback on the order total (KM).
    async fn process_order_points(
        &self,
        user_id: i64,
        points_used_km: f64,
        order_total_km: f64,
    ) -> AppResult<OrderPointsOutcome>;

    /// Settle points, then hand the order to the shop.
    ///
    /// When the shop does not take the order the settled points are reversed.
    async fn send_order(&self, user_id: i64, order: OrderRequest) -> AppResult<OrderPlaced>;
}

pub struct LedgerManager {
    users: Arc<dyn UserRepository>,
    ledger: Arc<dyn LedgerRepository>,
    discounts: Arc<dyn DiscountService>,
    orders: Arc<dyn OrderForwarder>,
}

impl LedgerManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        ledger: Arc<dyn LedgerRepository>,
        discounts: Arc<dyn DiscountService>,
        orders: Arc<dyn OrderForwarder>,
    ) -> Self {
        Self {
            users,
            ledger,
            discounts,
            orders,
        }
    }

    async fn member(&self, user_id: i64) -> AppResult<LoyaltyUser> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    async fn history(&self, user_id: i64, limit: Option<u64>) -> AppResult<Vec<TransactionView>> {
        let user = self.member(user_id).await?;
        let rows = self.ledger.recent(user.rfid, limit).await?;
        Ok(rows.into_iter().map(TransactionView::from).collect())
    }

    async fn settle(
        &self,
        user: &LoyaltyUser,
        points_used_km: f64,
        order_total_km: f64,
    ) -> AppResult<Settlement> {
        let spend = Points::from_km(points_used_km)?;
        if !order_total_km.is_finite() || order_total_km < 0.0 {
            return Err(AppError::validation("Iznos narudžbe mora biti pozitivan broj."));
        }

        let discount = self.discounts.get().await?;
        if spend.is_positive() && !discount.allow_points_payment {
            return Err(AppError::validation(POINTS_PAYMENT_DISABLED));
        }
        let earned = cashback(order_total_km, discount.cashback_percentage);

        let balance = if spend.is_positive() || earned.is_positive() {
            self.ledger
                .settle_order(
                    user,
                    spend,
                    earned,
                    vrsta_cashback(discount.cashback_percentage),
                )
                .await?
        } else {
            user.points
        };

        tracing::info!(
            user_id = user.id,
            points_used = spend.as_km(),
            cashback_earned = earned.as_km(),
            new_balance = balance.as_km(),
            "Points processed for order"
        );

        Ok(Settlement {
            spend,
            cashback: earned,
            balance,
        })
    }

    /// Put the points back after the shop refused the order.
    async fn reverse(&self, user: &LoyaltyUser, settled: &Settlement) {
        if !settled.spend.is_positive() && !settled.cashback.is_positive() {
            return;
        }
        match self
            .ledger
            .reverse_order(user, settled.spend, settled.cashback)
            .await
        {
            Ok(balance) => tracing::warn!(
                user_id = user.id,
                points_returned = settled.spend.as_km(),
                cashback_removed = settled.cashback.as_km(),
                new_balance = balance.as_km(),
                "Order not placed, points reversed"
            ),
            Err(e) => tracing::error!(
                user_id = user.id,
                points_used = settled.spend.as_km(),
                cashback_earned = settled.cashback.as_km(),
                "Order not placed and reversing points failed: {e}"
            ),
        }
    }
}

/// Points moved by one order, kept so a failed hand-off can be undone.
struct Settlement {
    spend: Points,
    cashback: Points,
    balance: Points,
}

impl Settlement {
    fn outcome(&self) -> OrderPointsOutcome {
        OrderPointsOutcome {
            points_used: self.spend.as_km(),
            cashback_earned: self.cashback.as_km(),
            new_balance: self.balance.as_km(),
        }
    }
}

#[async_trait]
impl LedgerService for LedgerManager {
    async fn last_transactions(&self, user_id: i64) -> AppResult<Vec<TransactionView>> {
        self.history(user_id, Some(LAST_TRANSACTIONS)).await
    }

    async fn all_transactions(&self, user_id: i64) -> AppResult<Vec<TransactionView>> {
        self.history(user_id, None).await
    }

    async fn process_order_points(
        &self,
        user_id: i64,
        points_used_km: f64,
        order_total_km: f64,
    ) -> AppResult<OrderPointsOutcome> {
        let user = self.member(user_id).await?;
        self.settle(&user, points_used_km, order_total_km)
            .await
            .map(|settled| settled.outcome())
    }

    async fn send_order(&self, user_id: i64, order: OrderRequest) -> AppResult<OrderPlaced> {
        order.validate()?;
        let user = self.member(user_id).await?;
        let settled = self
            .settle(&user, order.points_used, order.order_total)
            .await?;

        let order_id = match self.orders.forward(&user, &order).await {
            Ok(order_id) => order_id,
            Err(e) => {
                tracing::error!(user_id, "Order forwarding failed: {e}");
                self.reverse(&user, &settled).await;
                return Err(e);
            }
        };
        let outcome = settled.outcome();

        Ok(OrderPlaced {
            message: "Narudžba uspješno kreirana.".to_string(),
            order_id,
            points_used: outcome.points_used,
            cashback_earned: outcome.cashback_earned,
            new_balance: outcome.new_balance,
        })
    }
}
