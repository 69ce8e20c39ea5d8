//! Eye-exam reservations and the daily slot grid.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::constants::{SLOT_FIRST_HOUR, SLOT_LAST_HOUR, SLOT_STEP_MINUTES};
use crate::error::{DomainError, DomainResult};

pub const SLOT_TAKEN_MESSAGE: &str = "Ovaj termin je već zauzet";
pub const RESERVATION_NOT_FOUND_MESSAGE: &str = "Rezervacija nije pronađena";

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Reservation {
    pub id_rezervacije: i32,
    pub poslovnica: String,
    pub datum: NaiveDate,
    #[serde(with = "slot_time")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "10:30:00"))]
    pub vrijeme: NaiveTime,
    pub ime: String,
    pub prezime: String,
    pub telefon: String,
    pub email: String,
}

/// Reservation request before an id is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub poslovnica: String,
    pub datum: NaiveDate,
    pub vrijeme: NaiveTime,
    pub ime: String,
    pub prezime: String,
    pub telefon: String,
    pub email: String,
}

/// Identity of a bookable slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotKey {
    pub poslovnica: String,
    pub datum: NaiveDate,
    pub vrijeme: NaiveTime,
}

/// A slot as shown in the booking picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeSlot {
    pub time: String,
    pub time_display: String,
    pub available: bool,
    pub booked: bool,
    pub is_admin_slot: bool,
}

/// Regular slots of a day: every half hour from opening until the last
/// slot, both ends included.
pub fn regular_slots() -> Vec<NaiveTime> {
    let (Some(mut t), Some(last)) = (
        NaiveTime::from_hms_opt(SLOT_FIRST_HOUR, 0, 0),
        NaiveTime::from_hms_opt(SLOT_LAST_HOUR, 0, 0),
    ) else {
        return Vec::new();
    };
    let mut slots = Vec::new();
    while t <= last {
        slots.push(t);
        t += Duration::minutes(SLOT_STEP_MINUTES);
    }
    slots
}

/// Build the slot grid for one branch and day.
///
/// Admin openings outside the regular grid are added and flagged. A slot is
/// booked when any reservation holds its time.
pub fn build_time_slots(booked: &[NaiveTime], admin_openings: &[NaiveTime]) -> Vec<TimeSlot> {
    let mut grid: BTreeMap<NaiveTime, bool> = regular_slots().into_iter().map(|t| (t, false)).collect();
    for opening in admin_openings {
        grid.entry(truncate(*opening)).or_insert(true);
    }

    grid.into_iter()
        .map(|(time, is_admin_slot)| {
            let is_booked = booked.iter().any(|b| truncate(*b) == time);
            TimeSlot {
                time: time.format("%H:%M:%S").to_string(),
                time_display: time.format("%H:%M").to_string(),
                available: !is_booked,
                booked: is_booked,
                is_admin_slot,
            }
        })
        .collect()
}

/// Parse a slot time given as `HH:MM:SS`.
pub fn parse_slot_time(raw: &str) -> DomainResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S")
        .map_err(|_| DomainError::validation("Vrijeme mora biti u formatu HH:MM:SS."))
}

fn truncate(t: NaiveTime) -> NaiveTime {
    t.with_nanosecond(0).unwrap_or(t)
}

mod slot_time {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_slot_time(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_regular_grid_has_23_slots() {
        let slots = regular_slots();
        assert_eq!(slots.len(), 23);
        assert_eq!(slots.first(), Some(&t(10, 0)));
        assert_eq!(slots.last(), Some(&t(21, 0)));
    }

    #[test]
    fn test_booked_slots_are_unavailable() {
        let slots = build_time_slots(&[t(10, 30)], &[]);
        let slot = slots.iter().find(|s| s.time == "10:30:00").unwrap();
        assert!(slot.booked);
        assert!(!slot.available);
        assert_eq!(slot.time_display, "10:30");
        assert!(slots.iter().filter(|s| s.booked).count() == 1);
    }

    #[test]
    fn test_admin_openings_are_merged_and_sorted() {
        let slots = build_time_slots(&[t(9, 15)], &[t(9, 15), t(11, 0), t(21, 45)]);
        assert_eq!(slots.len(), 25);
        assert_eq!(slots[0].time, "09:15:00");
        assert!(slots[0].is_admin_slot);
        assert!(slots[0].booked);
        assert_eq!(slots.last().unwrap().time, "21:45:00");

        let eleven = slots.iter().find(|s| s.time == "11:00:00").unwrap();
        assert!(!eleven.is_admin_slot);
    }

    #[test]
    fn test_parse_slot_time() {
        assert_eq!(parse_slot_time("14:30:00").unwrap(), t(14, 30));
        assert!(parse_slot_time("14:30").is_err());
    }
}
