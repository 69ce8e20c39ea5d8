//! Points ledger repository.
//!
//! Balance changes and their ledger rows are written in one database
//! transaction. Debits are conditional updates, so a balance can never be
//! driven below zero by concurrent requests.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::transaction::{self, Entity as TransactionEntity};
use super::entities::user::{self, Entity as UserEntity};
use super::tx::{begin, finish};
use common::{AppError, AppResult, OptionExt};
use domain::{
    LedgerAction, LoyaltyUser, NewTransaction, Points, Transaction, BRANCH_LOYALTY_APP,
    BRANCH_ONLINE, VRSTA_ORDER_REVERSAL, VRSTA_SHOP_PAYMENT, VRSTA_WELCOME_BONUS,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Ledger rows for a card, newest first.
    async fn recent(&self, rfid: i32, limit: Option<u64>) -> AppResult<Vec<Transaction>>;

    /// Debit `spend`, credit `cashback` and record both, atomically.
    ///
    /// Returns the new balance. Fails with `InsufficientPoints` and changes
    /// nothing when the balance does not cover `spend`.
    async fn settle_order(
        &self,
        user: &LoyaltyUser,
        spend: Points,
        cashback: Points,
        cashback_vrsta: String,
    ) -> AppResult<Points>;

    /// Undo a settled order: credit `spend` back and take `cashback` out again.
    ///
    /// Cashback already spent elsewhere is removed only down to a zero balance.
    async fn reverse_order(
        &self,
        user: &LoyaltyUser,
        spend: Points,
        cashback: Points,
    ) -> AppResult<Points>;

    /// Credit the app welcome bonus once per member.
    ///
    /// Returns the new balance, or `None` when the bonus was already granted.
    async fn grant_welcome_bonus(
        &self,
        user: &LoyaltyUser,
        points: Points,
    ) -> AppResult<Option<Points>>;
}

pub struct LedgerStore {
    db: DatabaseConnection,
}

impl LedgerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn record(txn: &DatabaseTransaction, entry: NewTransaction) -> AppResult<()> {
        transaction::ActiveModel {
            poslovnica: Set(entry.poslovnica),
            rfid: Set(entry.rfid),
            user: Set(entry.user),
            date: Set(Utc::now().naive_utc()),
            points: Set(entry.points.tenths()),
            action: Set(entry.action.as_str().to_string()),
            vrsta: Set(entry.vrsta),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn balance(txn: &DatabaseTransaction, user_id: i64) -> AppResult<Points> {
        let model = UserEntity::find_by_id(user_id)
            .one(txn)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()?;
        Ok(Points::from_tenths(model.points))
    }

    async fn settle_in(
        txn: &DatabaseTransaction,
        user: &LoyaltyUser,
        spend: Points,
        cashback: Points,
        cashback_vrsta: String,
    ) -> AppResult<Points> {
        if spend.is_positive() {
            let debited = UserEntity::update_many()
                .col_expr(
                    user::Column::Points,
                    Expr::col(user::Column::Points).sub(spend.tenths()),
                )
                .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(user::Column::Id.eq(user.id))
                .filter(user::Column::Points.gte(spend.tenths()))
                .exec(txn)
                .await
                .map_err(AppError::from)?;

            if debited.rows_affected == 0 {
                let available = Self::balance(txn, user.id).await?;
                return Err(AppError::InsufficientPoints {
                    available: available.as_km(),
                    requested: spend.as_km(),
                });
            }

            Self::record(
                txn,
                NewTransaction {
                    poslovnica: BRANCH_LOYALTY_APP.to_string(),
                    rfid: user.rfid,
                    user: user.username.clone(),
                    points: spend,
                    action: LedgerAction::Removed,
                    vrsta: VRSTA_SHOP_PAYMENT.to_string(),
                },
            )
            .await?;
        }

        if cashback.is_positive() {
            UserEntity::update_many()
                .col_expr(
                    user::Column::Points,
                    Expr::col(user::Column::Points).add(cashback.tenths()),
                )
                .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(user::Column::Id.eq(user.id))
                .exec(txn)
                .await
                .map_err(AppError::from)?;

            Self::record(
                txn,
                NewTransaction {
                    poslovnica: BRANCH_LOYALTY_APP.to_string(),
                    rfid: user.rfid,
                    user: user.username.clone(),
                    points: cashback,
                    action: LedgerAction::Added,
                    vrsta: cashback_vrsta,
                },
            )
            .await?;
        }

        Self::balance(txn, user.id).await
    }

    async fn reverse_in(
        txn: &DatabaseTransaction,
        user: &LoyaltyUser,
        spend: Points,
        cashback: Points,
    ) -> AppResult<Points> {
        if spend.is_positive() {
            UserEntity::update_many()
                .col_expr(
                    user::Column::Points,
                    Expr::col(user::Column::Points).add(spend.tenths()),
                )
                .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(user::Column::Id.eq(user.id))
                .exec(txn)
                .await
                .map_err(AppError::from)?;

            Self::record(
                txn,
                NewTransaction {
                    poslovnica: BRANCH_LOYALTY_APP.to_string(),
                    rfid: user.rfid,
                    user: user.username.clone(),
                    points: spend,
                    action: LedgerAction::Added,
                    vrsta: VRSTA_ORDER_REVERSAL.to_string(),
                },
            )
            .await?;
        }

        if cashback.is_positive() {
            let available = Self::balance(txn, user.id).await?;
            let removed = Points::from_tenths(cashback.tenths().min(available.tenths()));
            if removed.is_positive() {
                let debited = UserEntity::update_many()
                    .col_expr(
                        user::Column::Points,
                        Expr::col(user::Column::Points).sub(removed.tenths()),
                    )
                    .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(user::Column::Id.eq(user.id))
                    .filter(user::Column::Points.gte(removed.tenths()))
                    .exec(txn)
                    .await
                    .map_err(AppError::from)?;

                if debited.rows_affected == 0 {
                    return Err(AppError::internal("Balance changed while reversing an order"));
                }

                Self::record(
                    txn,
                    NewTransaction {
                        poslovnica: BRANCH_LOYALTY_APP.to_string(),
                        rfid: user.rfid,
                        user: user.username.clone(),
                        points: removed,
                        action: LedgerAction::Removed,
                        vrsta: VRSTA_ORDER_REVERSAL.to_string(),
                    },
                )
                .await?;
            }
        }

        Self::balance(txn, user.id).await
    }

    async fn grant_in(
        txn: &DatabaseTransaction,
        user: &LoyaltyUser,
        points: Points,
    ) -> AppResult<Option<Points>> {
        // The is_app guard makes a second concurrent grant a no-op
        let granted = UserEntity::update_many()
            .col_expr(user::Column::IsApp, Expr::value(true))
            .col_expr(
                user::Column::Points,
                Expr::col(user::Column::Points).add(points.tenths()),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(user.id))
            .filter(user::Column::IsApp.eq(false))
            .exec(txn)
            .await
            .map_err(AppError::from)?;

        if granted.rows_affected == 0 {
            return Ok(None);
        }

        if points.is_positive() {
            Self::record(
                txn,
                NewTransaction {
                    poslovnica: BRANCH_ONLINE.to_string(),
                    rfid: user.rfid,
                    user: user.username.clone(),
                    points,
                    action: LedgerAction::Added,
                    vrsta: VRSTA_WELCOME_BONUS.to_string(),
                },
            )
            .await?;
        }

        Self::balance(txn, user.id).await.map(Some)
    }
}

#[async_trait]
impl LedgerRepository for LedgerStore {
    async fn recent(&self, rfid: i32, limit: Option<u64>) -> AppResult<Vec<Transaction>> {
        let models = TransactionEntity::find()
            .filter(transaction::Column::Rfid.eq(rfid))
            .order_by_desc(transaction::Column::Date)
            .order_by_desc(transaction::Column::TransactionId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }

    async fn settle_order(
        &self,
        user: &LoyaltyUser,
        spend: Points,
        cashback: Points,
        cashback_vrsta: String,
    ) -> AppResult<Points> {
        let txn = begin(&self.db, IsolationLevel::ReadCommitted).await?;
        let result = Self::settle_in(&txn, user, spend, cashback, cashback_vrsta).await;
        finish(txn, result).await
    }

    async fn reverse_order(
        &self,
        user: &LoyaltyUser,
        spend: Points,
        cashback: Points,
    ) -> AppResult<Points> {
        let txn = begin(&self.db, IsolationLevel::ReadCommitted).await?;
        let result = Self::reverse_in(&txn, user, spend, cashback).await;
        finish(txn, result).await
    }

    async fn grant_welcome_bonus(
        &self,
        user: &LoyaltyUser,
        points: Points,
    ) -> AppResult<Option<Points>> {
        let txn = begin(&self.db, IsolationLevel::ReadCommitted).await?;
        let result = Self::grant_in(&txn, user, points).await;
        finish(txn, result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DiopterData, UserRole};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn member() -> LoyaltyUser {
        LoyaltyUser {
            id: 7,
            username: "Amra Hodžić".to_string(),
            email: "amra@example.ba".to_string(),
            phone: "061201891".to_string(),
            rfid: 20000007,
            points: Points::from_tenths(125),
            has_diopter: false,
            diopter: DiopterData::default(),
            is_app: false,
            role: UserRole::User,
            notification_settings: None,
            push_token: None,
            registered_at: Utc::now(),
        }
    }

    fn user_row(tenths: i64) -> user::Model {
        user::Model {
            id: 7,
            username: "Amra Hodžić".to_string(),
            useremail: "amra@example.ba".to_string(),
            userphone: "061201891".to_string(),
            dt: Utc::now().naive_utc(),
            rfid: 20000007,
            points: tenths,
            count: 0,
            dioptrija: 0,
            dsph: String::new(),
            dcyl: String::new(),
            daxa: String::new(),
            lsph: String::new(),
            lcyl: String::new(),
            laxa: String::new(),
            ldadd: String::new(),
            bonus_status: 0,
            is_app: false,
            role: "user".to_string(),
            notification_settings: None,
            push_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ledger_row(tenths: i64, action: LedgerAction, vrsta: &str) -> transaction::Model {
        transaction::Model {
            transaction_id: 1,
            poslovnica: BRANCH_LOYALTY_APP.to_string(),
            rfid: 20000007,
            user: "Amra Hodžić".to_string(),
            date: Utc::now().naive_utc(),
            points: tenths,
            action: action.as_str().to_string(),
            vrsta: vrsta.to_string(),
        }
    }

    fn affected(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[tokio::test]
    async fn test_debit_not_covered_reports_insufficient_points() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(0)])
            .append_query_results([vec![user_row(125)]])
            .into_connection();
        let store = LedgerStore::new(db);

        let err = store
            .settle_order(
                &member(),
                Points::from_tenths(200),
                Points::ZERO,
                VRSTA_SHOP_PAYMENT.to_string(),
            )
            .await
            .unwrap_err();

        match err {
            AppError::InsufficientPoints {
                available,
                requested,
            } => {
                assert_eq!(available, 12.5);
                assert_eq!(requested, 20.0);
            }
            other => panic!("expected InsufficientPoints, got {other:?}"),
        }

        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains(">= $"), "debit must be conditional on the balance: {log}");
    }

    #[tokio::test]
    async fn test_covered_debit_records_payment_and_returns_balance() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(1)])
            .append_query_results([vec![ledger_row(
                100,
                LedgerAction::Removed,
                VRSTA_SHOP_PAYMENT,
            )]])
            .append_query_results([vec![user_row(25)]])
            .into_connection();
        let store = LedgerStore::new(db);

        let balance = store
            .settle_order(
                &member(),
                Points::from_tenths(100),
                Points::ZERO,
                VRSTA_SHOP_PAYMENT.to_string(),
            )
            .await
            .unwrap();

        assert_eq!(balance, Points::from_tenths(25));
    }

    #[tokio::test]
    async fn test_welcome_bonus_already_granted_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(0)])
            .into_connection();
        let store = LedgerStore::new(db);

        let granted = store
            .grant_welcome_bonus(&member(), Points::from_tenths(100))
            .await
            .unwrap();

        assert_eq!(granted, None);
        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains("is_app"), "grant must be guarded by is_app: {log}");
    }

    #[tokio::test]
    async fn test_welcome_bonus_first_grant_credits() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(1)])
            .append_query_results([vec![ledger_row(
                100,
                LedgerAction::Added,
                VRSTA_WELCOME_BONUS,
            )]])
            .append_query_results([vec![user_row(225)]])
            .into_connection();
        let store = LedgerStore::new(db);

        let granted = store
            .grant_welcome_bonus(&member(), Points::from_tenths(100))
            .await
            .unwrap();

        assert_eq!(granted, Some(Points::from_tenths(225)));
    }

    #[tokio::test]
    async fn test_reversal_removes_cashback_only_down_to_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // spend credited back
            .append_exec_results([affected(1)])
            .append_query_results([vec![ledger_row(
                100,
                LedgerAction::Added,
                VRSTA_ORDER_REVERSAL,
            )]])
            // only 3.0 KM left of the 10.0 KM cashback
            .append_query_results([vec![user_row(30)]])
            .append_exec_results([affected(1)])
            .append_query_results([vec![ledger_row(
                30,
                LedgerAction::Removed,
                VRSTA_ORDER_REVERSAL,
            )]])
            .append_query_results([vec![user_row(0)]])
            .into_connection();
        let store = LedgerStore::new(db);

        let balance = store
            .reverse_order(&member(), Points::from_tenths(100), Points::from_tenths(100))
            .await
            .unwrap();

        assert_eq!(balance, Points::ZERO);
    }
}
