//! Loyalty member repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::tx::is_unique_violation;
use common::{AppError, AppResult, OptionExt};
use domain::{
    DiopterData, LoyaltyUser, NewLoyaltyUser, NotificationSettings, ProfileUpdate, ROLE_USER,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const EMAIL_TAKEN: &str = "Email adresa je već registrovana.";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<LoyaltyUser>>;

    /// Lowest-id user whose stored phone equals any of `variants`.
    async fn find_by_phone_variants(&self, variants: &[String]) -> AppResult<Option<LoyaltyUser>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<LoyaltyUser>>;

    async fn rfid_exists(&self, rfid: i32) -> AppResult<bool>;

    /// Insert a member with a zero balance.
    async fn create(&self, user: NewLoyaltyUser) -> AppResult<LoyaltyUser>;

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> AppResult<LoyaltyUser>;

    /// Replace the prescription; the diopter flag follows whether any value is set.
    async fn update_diopter(&self, id: i64, diopter: DiopterData) -> AppResult<LoyaltyUser>;

    async fn set_notification_settings(
        &self,
        id: i64,
        settings: NotificationSettings,
    ) -> AppResult<()>;

    async fn set_push_token(&self, id: i64, token: String) -> AppResult<()>;
}

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn model(&self, id: i64) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<LoyaltyUser>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LoyaltyUser::from))
    }

    async fn find_by_phone_variants(&self, variants: &[String]) -> AppResult<Option<LoyaltyUser>> {
        if variants.is_empty() {
            return Ok(None);
        }

        let result = UserEntity::find()
            .filter(user::Column::Userphone.is_in(variants.iter().cloned()))
            .order_by_asc(user::Column::Id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LoyaltyUser::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<LoyaltyUser>> {
        let result = UserEntity::find()
            .filter(user::Column::Useremail.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LoyaltyUser::from))
    }

    async fn rfid_exists(&self, rfid: i32) -> AppResult<bool> {
        let found = UserEntity::find()
            .filter(user::Column::Rfid.eq(rfid))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(found.is_some())
    }

    async fn create(&self, new_user: NewLoyaltyUser) -> AppResult<LoyaltyUser> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            username: Set(new_user.username),
            useremail: Set(new_user.email),
            userphone: Set(new_user.phone),
            dt: Set(now.naive_utc()),
            rfid: Set(new_user.rfid),
            points: Set(0),
            count: Set(0),
            dioptrija: Set(0),
            dsph: Set(String::new()),
            dcyl: Set(String::new()),
            daxa: Set(String::new()),
            lsph: Set(String::new()),
            lcyl: Set(String::new()),
            laxa: Set(String::new()),
            ldadd: Set(String::new()),
            bonus_status: Set(0),
            is_app: Set(false),
            role: Set(ROLE_USER.to_string()),
            notification_settings: Set(None),
            push_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(LoyaltyUser::from(model)),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict(EMAIL_TAKEN)),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> AppResult<LoyaltyUser> {
        let mut active: ActiveModel = self.model(id).await?.into();

        if let Some(username) = update.username {
            active.username = Set(username);
        }
        if let Some(email) = update.email {
            active.useremail = Set(email);
        }
        if let Some(phone) = update.phone {
            active.userphone = Set(phone);
        }
        active.updated_at = Set(chrono::Utc::now());

        match active.update(&self.db).await {
            Ok(model) => Ok(LoyaltyUser::from(model)),
            Err(e) if is_unique_violation(&e) => Err(AppError::conflict(EMAIL_TAKEN)),
            Err(e) => Err(AppError::from(e)),
        }
    }

    async fn update_diopter(&self, id: i64, diopter: DiopterData) -> AppResult<LoyaltyUser> {
        let mut active: ActiveModel = self.model(id).await?.into();

        active.dioptrija = Set(if diopter.is_empty() { 0 } else { 1 });
        active.dsph = Set(diopter.dsph);
        active.dcyl = Set(diopter.dcyl);
        active.daxa = Set(diopter.daxa);
        active.lsph = Set(diopter.lsph);
        active.lcyl = Set(diopter.lcyl);
        active.laxa = Set(diopter.laxa);
        active.ldadd = Set(diopter.ldadd);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(LoyaltyUser::from(model))
    }

    async fn set_notification_settings(
        &self,
        id: i64,
        settings: NotificationSettings,
    ) -> AppResult<()> {
        let value = serde_json::to_value(settings)
            .map_err(|e| AppError::internal(format!("Settings serialization error: {e}")))?;

        let mut active: ActiveModel = self.model(id).await?.into();
        active.notification_settings = Set(Some(value));
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn set_push_token(&self, id: i64, token: String) -> AppResult<()> {
        let mut active: ActiveModel = self.model(id).await?.into();
        active.push_token = Set(Some(token));
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn row(dioptrija: i16, dsph: &str) -> user::Model {
        user::Model {
            id: 3,
            username: "Lejla Begić".to_string(),
            useremail: "lejla@example.ba".to_string(),
            userphone: "062267066".to_string(),
            dt: Utc::now().naive_utc(),
            rfid: 20000003,
            points: 0,
            count: 0,
            dioptrija,
            dsph: dsph.to_string(),
            dcyl: String::new(),
            daxa: String::new(),
            lsph: String::new(),
            lcyl: String::new(),
            laxa: String::new(),
            ldadd: String::new(),
            bonus_status: 0,
            is_app: true,
            role: ROLE_USER.to_string(),
            notification_settings: None,
            push_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_prescription_sets_diopter_flag() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(0, "")], vec![row(1, "-1.25")]])
            .into_connection();
        let store = UserStore::new(db);

        let user = store
            .update_diopter(
                3,
                DiopterData {
                    dsph: "-1.25".to_string(),
                    ..DiopterData::default()
                },
            )
            .await
            .unwrap();

        assert!(user.has_diopter);
        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains("SmallInt(Some(1))"), "{log}");
    }

    #[tokio::test]
    async fn test_cleared_prescription_resets_diopter_flag() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "-1.25")], vec![row(0, "")]])
            .into_connection();
        let store = UserStore::new(db);

        let user = store
            .update_diopter(3, DiopterData::default())
            .await
            .unwrap();

        assert!(!user.has_diopter);
        let log = format!("{:?}", store.db.into_transaction_log());
        assert!(log.contains("SmallInt(Some(0))"), "{log}");
    }
}
