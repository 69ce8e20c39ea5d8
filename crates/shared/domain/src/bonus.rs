//! Welcome bonus configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::points::Points;

pub const DEFAULT_BONUS_POINTS: i64 = 200;
pub const DEFAULT_BONUS_TITLE: &str = "Dobrodošli!";
pub const DEFAULT_BONUS_MESSAGE: &str = "Dobili ste 20 KM kao dobrodošlicu!";

const MAX_TITLE_LENGTH: usize = 255;
const MAX_MESSAGE_LENGTH: usize = 500;

/// Welcome bonus granted once per member on first app sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BonusConfig {
    pub enabled: bool,
    /// Stored units (tenths of a KM)
    pub bonus_points: i64,
    pub bonus_title: String,
    pub bonus_message: String,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bonus_points: DEFAULT_BONUS_POINTS,
            bonus_title: DEFAULT_BONUS_TITLE.to_string(),
            bonus_message: DEFAULT_BONUS_MESSAGE.to_string(),
        }
    }
}

impl BonusConfig {
    pub fn points(&self) -> Points {
        Points::from_tenths(self.bonus_points)
    }

    /// Grant payload, or `None` when the bonus is switched off.
    pub fn grant(&self) -> Option<BonusGrant> {
        self.enabled.then(|| BonusGrant {
            title: self.bonus_title.clone(),
            message: self.bonus_message.clone(),
            points: self.points().as_km(),
        })
    }
}

/// Partial admin update.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BonusUpdate {
    pub enabled: Option<bool>,
    pub bonus_points: Option<i64>,
    pub bonus_title: Option<String>,
    pub bonus_message: Option<String>,
}

impl BonusUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if matches!(self.bonus_points, Some(p) if p < 0) {
            return Err(DomainError::validation("bonus_points must not be negative"));
        }
        if matches!(&self.bonus_title, Some(t) if t.chars().count() > MAX_TITLE_LENGTH) {
            return Err(DomainError::validation("bonus_title is too long"));
        }
        if matches!(&self.bonus_message, Some(m) if m.chars().count() > MAX_MESSAGE_LENGTH) {
            return Err(DomainError::validation("bonus_message is too long"));
        }
        Ok(())
    }

    pub fn apply(self, mut config: BonusConfig) -> DomainResult<BonusConfig> {
        self.validate()?;
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(points) = self.bonus_points {
            config.bonus_points = points;
        }
        if let Some(title) = self.bonus_title {
            config.bonus_title = title;
        }
        if let Some(message) = self.bonus_message {
            config.bonus_message = message;
        }
        Ok(config)
    }
}

/// Bonus shown to the member right after it is credited. Points are in KM.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BonusGrant {
    pub title: String,
    pub message: String,
    pub points: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_twenty_km() {
        let config = BonusConfig::default();
        assert!(config.enabled);
        assert_eq!(config.points().as_km(), 20.0);
        assert_eq!(config.grant().unwrap().title, "Dobrodošli!");
    }

    #[test]
    fn test_disabled_config_grants_nothing() {
        let config = BonusConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(config.grant().is_none());
    }

    #[test]
    fn test_update_merges_and_validates() {
        let updated = BonusUpdate {
            bonus_points: Some(50),
            ..Default::default()
        }
        .apply(BonusConfig::default())
        .unwrap();
        assert_eq!(updated.bonus_points, 50);
        assert_eq!(updated.bonus_title, DEFAULT_BONUS_TITLE);

        let bad = BonusUpdate {
            bonus_points: Some(-1),
            ..Default::default()
        };
        assert!(bad.apply(BonusConfig::default()).is_err());
    }
}
