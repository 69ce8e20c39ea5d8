//! Transaction helpers shared by the stores.

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, DbErr, IsolationLevel, SqlErr,
    TransactionTrait,
};

use common::{AppError, AppResult};

pub(crate) async fn begin(
    db: &DatabaseConnection,
    isolation: IsolationLevel,
) -> AppResult<DatabaseTransaction> {
    db.begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
        .await
        .map_err(AppError::from)
}

/// Commit on success, roll back on error.
pub(crate) async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
