//! In-app notifications and per-member notification preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notification preferences, stored as JSON on the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub push_notifications: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub appointment_reminders: bool,
    pub loyalty_updates: bool,
    pub promotional_offers: bool,
    pub order_updates: bool,
    pub health_reminders: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            push_notifications: true,
            email_notifications: true,
            sms_notifications: false,
            appointment_reminders: true,
            loyalty_updates: true,
            promotional_offers: false,
            order_updates: true,
            health_reminders: true,
        }
    }
}

/// Submitted preferences. Omitted flags fall back to the defaults, not to
/// the previously stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsInput {
    pub push_notifications: Option<bool>,
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub appointment_reminders: Option<bool>,
    pub loyalty_updates: Option<bool>,
    pub promotional_offers: Option<bool>,
    pub order_updates: Option<bool>,
    pub health_reminders: Option<bool>,
}

impl NotificationSettingsInput {
    pub fn resolve(self) -> NotificationSettings {
        let d = NotificationSettings::default();
        NotificationSettings {
            push_notifications: self.push_notifications.unwrap_or(d.push_notifications),
            email_notifications: self.email_notifications.unwrap_or(d.email_notifications),
            sms_notifications: self.sms_notifications.unwrap_or(d.sms_notifications),
            appointment_reminders: self.appointment_reminders.unwrap_or(d.appointment_reminders),
            loyalty_updates: self.loyalty_updates.unwrap_or(d.loyalty_updates),
            promotional_offers: self.promotional_offers.unwrap_or(d.promotional_offers),
            order_updates: self.order_updates.unwrap_or(d.order_updates),
            health_reminders: self.health_reminders.unwrap_or(d.health_reminders),
        }
    }
}

/// A notification delivered to a member's inbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub post: Option<NotificationPost>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Optional article attached to a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPost {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Inbox entry as the app renders it.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationView {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    /// RFC 3339 creation time
    pub timestamp: String,
    pub read: bool,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub has_post: bool,
    pub post_title: Option<String>,
    pub post_description: Option<String>,
    pub post_image: Option<String>,
}

impl From<Notification> for NotificationView {
    fn from(n: Notification) -> Self {
        let (has_post, post_title, post_description, post_image) = match n.post {
            Some(post) => (true, post.title, post.description, post.image),
            None => (false, None, None, None),
        };
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title,
            message: n.message,
            timestamp: n.created_at.to_rfc3339(),
            read: n.read,
            icon: n.icon,
            color: n.color,
            has_post,
            post_title,
            post_description,
            post_image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_flags_use_defaults() {
        let input: NotificationSettingsInput =
            serde_json::from_str(r#"{"promotionalOffers": true, "pushNotifications": false}"#).unwrap();
        let settings = input.resolve();
        assert!(settings.promotional_offers);
        assert!(!settings.push_notifications);
        assert!(!settings.sms_notifications);
        assert!(settings.health_reminders);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let json = serde_json::to_value(NotificationSettings::default()).unwrap();
        assert_eq!(json["appointmentReminders"], true);
        assert_eq!(json["smsNotifications"], false);
    }
}
