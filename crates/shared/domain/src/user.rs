//! Loyalty member entity and its client-facing profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_USER};
use crate::notification::NotificationSettings;
use crate::points::Points;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => f.write_str(ROLE_ADMIN),
            UserRole::User => f.write_str(ROLE_USER),
        }
    }
}

/// Spectacle prescription kept on the member record.
///
/// Values are free text exactly as entered at the counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DiopterData {
    pub dsph: String,
    pub dcyl: String,
    pub daxa: String,
    pub lsph: String,
    pub lcyl: String,
    pub laxa: String,
    pub ldadd: String,
}

impl DiopterData {
    pub fn is_empty(&self) -> bool {
        [
            &self.dsph, &self.dcyl, &self.daxa, &self.lsph, &self.lcyl, &self.laxa, &self.ldadd,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}

/// Partial prescription update; `None` leaves a value untouched.
#[derive(Debug, Clone, Default)]
pub struct DiopterUpdate {
    pub dsph: Option<String>,
    pub dcyl: Option<String>,
    pub daxa: Option<String>,
    pub lsph: Option<String>,
    pub lcyl: Option<String>,
    pub laxa: Option<String>,
    pub ldadd: Option<String>,
}

impl DiopterUpdate {
    /// Apply onto an existing prescription.
    pub fn apply(self, current: &DiopterData) -> DiopterData {
        DiopterData {
            dsph: self.dsph.unwrap_or_else(|| current.dsph.clone()),
            dcyl: self.dcyl.unwrap_or_else(|| current.dcyl.clone()),
            daxa: self.daxa.unwrap_or_else(|| current.daxa.clone()),
            lsph: self.lsph.unwrap_or_else(|| current.lsph.clone()),
            lcyl: self.lcyl.unwrap_or_else(|| current.lcyl.clone()),
            laxa: self.laxa.unwrap_or_else(|| current.laxa.clone()),
            ldadd: self.ldadd.unwrap_or_else(|| current.ldadd.clone()),
        }
    }
}

/// Loyalty member as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Phone as entered; never assume canonical form
    pub phone: String,
    pub rfid: i32,
    pub points: Points,
    pub has_diopter: bool,
    pub diopter: DiopterData,
    pub is_app: bool,
    pub role: UserRole,
    pub notification_settings: Option<NotificationSettings>,
    pub push_token: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl LoyaltyUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }
}

/// New member data handed to persistence.
#[derive(Debug, Clone)]
pub struct NewLoyaltyUser {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub rfid: i32,
}

/// Profile changes; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Member profile as the mobile app consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Loyalty card number, printed as a barcode
    #[serde(rename = "barcodeId")]
    pub barcode_id: String,
    /// Balance in whole KM
    pub points: i64,
    pub is_app: u8,
    pub dioptrija: u8,
    #[serde(rename = "diopterData")]
    pub diopter_data: DiopterData,
}

impl From<&LoyaltyUser> for UserProfile {
    fn from(user: &LoyaltyUser) -> Self {
        Self {
            id: user.id,
            name: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            barcode_id: user.rfid.to_string(),
            points: user.points.whole_km(),
            is_app: u8::from(user.is_app),
            dioptrija: u8::from(user.has_diopter),
            diopter_data: user.diopter.clone(),
        }
    }
}

impl From<LoyaltyUser> for UserProfile {
    fn from(user: LoyaltyUser) -> Self {
        UserProfile::from(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> LoyaltyUser {
        LoyaltyUser {
            id: 7,
            username: "Amra Hodžić".to_string(),
            email: "amra@example.com".to_string(),
            phone: "062267066".to_string(),
            rfid: 12345678,
            points: Points::from_tenths(259),
            has_diopter: false,
            diopter: DiopterData::default(),
            is_app: true,
            role: UserRole::User,
            notification_settings: None,
            push_token: None,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_shows_whole_km_and_barcode() {
        let profile = UserProfile::from(&member());
        assert_eq!(profile.points, 25);
        assert_eq!(profile.barcode_id, "12345678");
        assert_eq!(profile.is_app, 1);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["barcodeId"], "12345678");
        assert!(json["diopterData"].is_object());
    }

    #[test]
    fn test_diopter_update_keeps_untouched_fields() {
        let current = DiopterData {
            dsph: "-1.25".to_string(),
            ..Default::default()
        };
        let updated = DiopterUpdate {
            lsph: Some("-1.00".to_string()),
            ..Default::default()
        }
        .apply(&current);
        assert_eq!(updated.dsph, "-1.25");
        assert_eq!(updated.lsph, "-1.00");
        assert!(!updated.is_empty());
        assert!(DiopterData::default().is_empty());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("anything"), UserRole::User);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }
}
