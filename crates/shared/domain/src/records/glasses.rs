//! Glasses purchase history from the optician's order sheet.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use super::linkage::{full_name, is_same_person};
use super::{is_filled, loose_float, SheetRecord, SheetTable};

const FRAME_BRANDS: [&str; 6] = ["RAY-BAN", "OAKLEY", "TOM FORD", "ZANZARA", "RIO", "LES HOMES"];
const UNKNOWN_BRAND: &str = "Nepoznato";
const DATE_FORMAT: &str = "%d.%m.%Y";
const WARRANTY_YEARS: u32 = 2;
const WARRANTY_NOTICE_DAYS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum WarrantyStatus {
    Active,
    Warranty,
    Expired,
}

/// A pair of glasses bought by the member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Glasses {
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub purchase_date: String,
    pub warranty_end: String,
    pub frame_brand: String,
    pub lens_type: String,
    pub prescription: String,
    pub status: WarrantyStatus,
    pub doctor: String,
    pub store: String,
    pub lens_description: String,
    pub row_number: usize,
}

/// Every glasses row that belongs to the member.
pub fn glasses_for(table: &SheetTable, user_phone: &str, user_name: &str, today: NaiveDate) -> Vec<Glasses> {
    table
        .records()
        .filter(|(_, r)| {
            let row_name = full_name(r.get("IME"), r.get("PREZIME"));
            is_same_person(user_phone, user_name, r.get("BR TEL"), &row_name)
        })
        .map(|(index, r)| format_glasses(index, &r, today))
        .collect()
}

fn format_glasses(index: usize, r: &SheetRecord<'_>, today: NaiveDate) -> Glasses {
    let right_sphere = r.get("D SPH");
    let left_sphere = r.get("L SPH");
    let cylinder = r.get("CYL");
    let axis = r.get("AXA");
    let addition = r.get("ADD");
    let frame = r.get("OKVIR OPIS");

    let purchase_date = format_purchase_date(r.get("DATUM"), today);
    let warranty_end = warranty_end(&purchase_date, today);

    Glasses {
        id: index,
        name: if frame.is_empty() { "Naočale".to_string() } else { frame.to_string() },
        kind: glasses_kind(right_sphere, left_sphere, addition).to_string(),
        frame_brand: frame_brand(frame).to_string(),
        lens_type: if is_progressive(addition) { "Progresivne" } else { "Standardne" }.to_string(),
        prescription: prescription(
            (right_sphere, cylinder, axis),
            (left_sphere, cylinder, axis),
            addition,
            r.get("PD"),
        ),
        status: warranty_status(warranty_end, today),
        purchase_date,
        warranty_end: warranty_end.format(DATE_FORMAT).to_string(),
        doctor: r.get("DOKTOR").to_string(),
        store: r.get("RADNJA").to_string(),
        lens_description: r.get("STAKLA OPIS").to_string(),
        row_number: index + 1,
    }
}

fn is_progressive(addition: &str) -> bool {
    is_filled(addition) && loose_float(addition) > 0.0
}

fn glasses_kind(right_sphere: &str, left_sphere: &str, addition: &str) -> &'static str {
    let corrective = |s: &str| is_filled(s) && loose_float(s) != 0.0;
    if is_progressive(addition) {
        "Progresivne naočale"
    } else if corrective(right_sphere) || corrective(left_sphere) {
        "Dioptrijske naočale"
    } else {
        "Suncane naočale"
    }
}

/// "OD: … | OS: … | ADD: … | PD: …", each part only when filled.
pub fn prescription(
    right: (&str, &str, &str),
    left: (&str, &str, &str),
    addition: &str,
    pd: &str,
) -> String {
    let mut parts = Vec::new();
    for (label, (sphere, cylinder, axis)) in [("OD", right), ("OS", left)] {
        if !is_filled(sphere) && !is_filled(cylinder) {
            continue;
        }
        let mut eye = format!("{label}: {}", if is_filled(sphere) { sphere } else { "0.00" });
        if is_filled(cylinder) {
            eye.push_str(&format!(", {cylinder}"));
            if is_filled(axis) {
                eye.push_str(&format!(" x {axis}"));
            }
        }
        parts.push(eye);
    }
    if is_filled(addition) {
        parts.push(format!("ADD: {addition}"));
    }
    if is_filled(pd) {
        parts.push(format!("PD: {pd}"));
    }
    if parts.is_empty() {
        "Bez dioptrije".to_string()
    } else {
        parts.join(" | ")
    }
}

fn frame_brand(description: &str) -> &'static str {
    let upper = description.to_uppercase();
    FRAME_BRANDS
        .iter()
        .find(|brand| upper.contains(*brand))
        .copied()
        .unwrap_or(UNKNOWN_BRAND)
}

/// Purchase date as DD.MM.YYYY. US-style M/D/YYYY is converted, an empty
/// cell means today, anything else is passed through.
pub fn format_purchase_date(raw: &str, today: NaiveDate) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return today.format(DATE_FORMAT).to_string();
    }
    if NaiveDate::parse_from_str(raw, DATE_FORMAT).is_ok() && raw.len() == 10 {
        return raw.to_string();
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if let [month, day, year] = parts.as_slice() {
        let digits = |s: &str, lo: usize, hi: usize| {
            (lo..=hi).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit())
        };
        if digits(month, 1, 2) && digits(day, 1, 2) && digits(year, 4, 4) {
            return format!("{day:0>2}.{month:0>2}.{year}");
        }
    }
    raw.to_string()
}

fn warranty_end(purchase_date: &str, today: NaiveDate) -> NaiveDate {
    let start = NaiveDate::parse_from_str(purchase_date, DATE_FORMAT).unwrap_or(today);
    start
        .checked_add_months(Months::new(12 * WARRANTY_YEARS))
        .unwrap_or(start)
}

fn warranty_status(end: NaiveDate, today: NaiveDate) -> WarrantyStatus {
    let notice = today
        .checked_add_days(Days::new(WARRANTY_NOTICE_DAYS))
        .unwrap_or(today);
    if end < today {
        WarrantyStatus::Expired
    } else if end <= notice {
        WarrantyStatus::Warranty
    } else {
        WarrantyStatus::Active
    }
}
