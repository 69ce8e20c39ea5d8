//! Featured promotion shown on the app home screen.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedContent {
    pub title: String,
    pub subtitle: String,
    pub badge_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedBrand {
    pub brand_name: String,
    pub description: String,
    pub meta_text: String,
    pub logo_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedDesign {
    pub gradient_start: String,
    pub gradient_end: String,
    pub badge_gradient_start: String,
    pub badge_gradient_end: String,
}

/// Campaign window. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedTiming {
    #[serde(default, with = "moment")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, with = "moment")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedActionConfig {
    pub enabled: bool,
    pub content: FeaturedContent,
    pub action: FeaturedBrand,
    pub design: FeaturedDesign,
    pub timing: FeaturedTiming,
}

impl Default for FeaturedActionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            content: FeaturedContent {
                title: "Istaknuta akcija".to_string(),
                subtitle: "Za naše cijenjene loyalty članove pripremili smo posebnu ponudu koju ne želite propustiti!".to_string(),
                badge_text: "NOVO".to_string(),
            },
            action: FeaturedBrand {
                brand_name: "Polaroid brend".to_string(),
                description: "15% popusta + 5% na karticu".to_string(),
                meta_text: "Ograničeno vrijeme".to_string(),
                logo_path: "polaroid-logo.png".to_string(),
            },
            design: FeaturedDesign {
                gradient_start: "#667eea".to_string(),
                gradient_end: "#764ba2".to_string(),
                badge_gradient_start: "#4facfe".to_string(),
                badge_gradient_end: "#00f2fe".to_string(),
            },
            timing: FeaturedTiming::default(),
        }
    }
}

impl FeaturedActionConfig {
    /// Whether `now` falls inside the campaign window.
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        if matches!(self.timing.start_date, Some(start) if now < start) {
            return false;
        }
        if matches!(self.timing.end_date, Some(end) if now > end) {
            return false;
        }
        true
    }

    /// Public view at `now`.
    pub fn view(&self, now: NaiveDateTime) -> FeaturedActionView {
        let is_active = self.is_active(now);
        FeaturedActionView {
            enabled: self.enabled && is_active,
            content: self.content.clone(),
            action: self.action.clone(),
            design: self.design.clone(),
            is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedActionView {
    pub enabled: bool,
    pub content: FeaturedContent,
    pub action: FeaturedBrand,
    pub design: FeaturedDesign,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedContentUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub badge_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedBrandUpdate {
    pub brand_name: Option<String>,
    pub description: Option<String>,
    pub meta_text: Option<String>,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedDesignUpdate {
    pub gradient_start: Option<String>,
    pub gradient_end: Option<String>,
    pub badge_gradient_start: Option<String>,
    pub badge_gradient_end: Option<String>,
}

/// Admin update. Present sections are merged field by field; timing is
/// replaced as a whole when given.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FeaturedActionUpdate {
    pub enabled: Option<bool>,
    pub content: Option<FeaturedContentUpdate>,
    pub action: Option<FeaturedBrandUpdate>,
    pub design: Option<FeaturedDesignUpdate>,
    pub timing: Option<FeaturedTiming>,
}

fn check_len(field: &str, value: &Option<String>, max: usize) -> DomainResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::validation(format!(
            "{field} may not be longer than {max} characters"
        ))),
        _ => Ok(()),
    }
}

impl FeaturedActionUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(c) = &self.content {
            check_len("content.title", &c.title, 100)?;
            check_len("content.subtitle", &c.subtitle, 500)?;
            check_len("content.badge_text", &c.badge_text, 20)?;
        }
        if let Some(a) = &self.action {
            check_len("action.brand_name", &a.brand_name, 100)?;
            check_len("action.description", &a.description, 200)?;
            check_len("action.meta_text", &a.meta_text, 100)?;
            check_len("action.logo_path", &a.logo_path, 100)?;
        }
        if let Some(d) = &self.design {
            check_len("design.gradient_start", &d.gradient_start, 20)?;
            check_len("design.gradient_end", &d.gradient_end, 20)?;
            check_len("design.badge_gradient_start", &d.badge_gradient_start, 20)?;
            check_len("design.badge_gradient_end", &d.badge_gradient_end, 20)?;
        }
        if let Some(FeaturedTiming {
            start_date: Some(start),
            end_date: Some(end),
        }) = &self.timing
        {
            if end <= start {
                return Err(DomainError::validation(
                    "timing.end_date must be after timing.start_date",
                ));
            }
        }
        Ok(())
    }

    pub fn apply(self, mut config: FeaturedActionConfig) -> DomainResult<FeaturedActionConfig> {
        self.validate()?;
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(c) = self.content {
            merge(&mut config.content.title, c.title);
            merge(&mut config.content.subtitle, c.subtitle);
            merge(&mut config.content.badge_text, c.badge_text);
        }
        if let Some(a) = self.action {
            merge(&mut config.action.brand_name, a.brand_name);
            merge(&mut config.action.description, a.description);
            merge(&mut config.action.meta_text, a.meta_text);
            merge(&mut config.action.logo_path, a.logo_path);
        }
        if let Some(d) = self.design {
            merge(&mut config.design.gradient_start, d.gradient_start);
            merge(&mut config.design.gradient_end, d.gradient_end);
            merge(&mut config.design.badge_gradient_start, d.badge_gradient_start);
            merge(&mut config.design.badge_gradient_end, d.badge_gradient_end);
        }
        if let Some(timing) = self.timing {
            config.timing = timing;
        }
        Ok(config)
    }
}

fn merge(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Parse a campaign bound. A bare date means midnight.
pub fn parse_moment(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Serde adapter accepting dates or date-times, written back as ISO date-times.
mod moment {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&v.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_moment(s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_moment(s).unwrap()
    }

    #[test]
    fn test_window() {
        let config = FeaturedActionConfig {
            enabled: true,
            timing: FeaturedTiming {
                start_date: Some(at("2025-03-01")),
                end_date: Some(at("2025-03-31 23:59:59")),
            },
            ..Default::default()
        };
        assert!(!config.is_active(at("2025-02-28 12:00")));
        assert!(config.is_active(at("2025-03-15")));
        assert!(!config.is_active(at("2025-04-01")));

        let view = config.view(at("2025-04-01"));
        assert!(!view.enabled);
        assert!(!view.is_active);
    }

    #[test]
    fn test_open_window_is_active() {
        assert!(FeaturedActionConfig::default().is_active(at("2030-01-01")));
        assert!(!FeaturedActionConfig::default().view(at("2030-01-01")).enabled);
    }

    #[test]
    fn test_update_merges_fields() {
        let update: FeaturedActionUpdate = serde_json::from_value(serde_json::json!({
            "enabled": true,
            "content": { "title": "Jesenja akcija" },
            "timing": { "start_date": "2025-09-01", "end_date": "2025-09-30" }
        }))
        .unwrap();
        let config = update.apply(FeaturedActionConfig::default()).unwrap();
        assert!(config.enabled);
        assert_eq!(config.content.title, "Jesenja akcija");
        assert_eq!(config.content.badge_text, "NOVO");
        assert_eq!(config.timing.start_date, Some(at("2025-09-01")));
    }

    #[test]
    fn test_update_rejects_reversed_window_and_long_badge() {
        let update: FeaturedActionUpdate = serde_json::from_value(serde_json::json!({
            "timing": { "start_date": "2025-09-30", "end_date": "2025-09-01" }
        }))
        .unwrap();
        assert!(update.validate().is_err());

        let update = FeaturedActionUpdate {
            content: Some(FeaturedContentUpdate {
                badge_text: Some("X".repeat(21)),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = FeaturedActionConfig {
            timing: FeaturedTiming {
                start_date: Some(at("2025-01-01")),
                end_date: None,
            },
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timing"]["start_date"], "2025-01-01T00:00:00");
        let back: FeaturedActionConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
