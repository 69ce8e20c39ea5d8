//! Deciding whether a sheet row belongs to a member.

use crate::phone;

/// Phone match first; when the phones disagree, fall back to exact
/// case-folded full-name equality.
pub fn is_same_person(user_phone: &str, user_name: &str, row_phone: &str, row_full_name: &str) -> bool {
    phone::matches(user_phone, row_phone) || names_match(user_name, row_full_name)
}

/// Trimmed, case-folded equality. Blank names never match.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && a == b
}

/// "first last", trimmed, as sheets split names across two columns.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}
