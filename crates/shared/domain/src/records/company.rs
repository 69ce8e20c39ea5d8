//! Partner companies whose employees get the loyalty discount.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::SheetTable;

pub const PARTNER_DISCOUNT: &str = "10%";
const DEFAULT_LOCATION: &str = "Sarajevo";
const DEFAULT_INDUSTRY: &str = "Ostalo";

/// Checked in order; the first hit wins.
const LOCATIONS: [&str; 12] = [
    "Sarajevo",
    "Istočno Sarajevo",
    "Ilidža",
    "Ilijaš",
    "Vogošća",
    "Hrasnica",
    "Breza",
    "Kiseljak",
    "Sokolje",
    "Tarčin",
    "Pale",
    "Šip",
];

/// Keyword rules over the lower-cased company name, in priority order.
static INDUSTRY_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"agencija|ministarstvo|općina|grad|parlament|sud|tužilaštvo|policij|granič|institucija|komisija|zavod|uprava", "Državna služba"),
        (r"škola|gimnazija|fakultet|univerzitet|akademija|obrazovan", "Obrazovanje"),
        (r"bolnic|zdravstv|medicin|psihijatrij|apoteke|dom zdravlja", "Zdravstvo"),
        (r"software|tech|digital|info|ping|atlantbh|softhouse|bloomteq|alen\.ba|vortt", "IT"),
        (r"aerodrom|autoceste|centrotrans|prijevoz|želje|gas promet", "Transport"),
        (r"avaz|tv|medij|radio|oslobođenje|nova bh|universal media", "Mediji"),
        (r"osiguranje|osiguranj|grawe|uniqa|adriatic", "Osiguranje"),
        (r"bank|privredna banka", "Bankarstvo"),
        (r"gas|energo|elektro|toplane", "Energetika"),
        (r"trade|trgovin|market|konzum|globus|pelikan|epicentar|nelt", "Trgovina"),
        (r"pozorište|teatar|bibloteka|kultura", "Kultura"),
        (r"sport|fk |rekreacij", "Sport"),
        (r"vodovod|kanalizacija|pokop|park d\.o\.o", "Komunalne usluge"),
        (r"klas|hayat|proizvodn", "Proizvodnja"),
        (r"bosnalijek|farmaceutski", "Farmacija"),
        (r"pošte|pošta", "Pošta"),
        (r"bamcard|finansij", "Finansije"),
        (r"consulting|konsalting|gms", "Konsalting"),
        (r"mccann|marketing", "Marketing"),
        (r"telecom|telekom|telekomunikacij", "Telekomunikacije"),
        (r"logistic|logistik", "Logistika"),
        (r"sindikat", "Sindikati"),
        (r"legalis|pravni", "Pravo"),
        (r"ugostiteljsk", "Ugostiteljstvo"),
        (r"engineering|inženjer", "Inženjering"),
        (r"servis|usluge", "Usluge"),
    ]
    .into_iter()
    .filter_map(|(pattern, industry)| Regex::new(pattern).ok().map(|re| (re, industry)))
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Company {
    pub id: usize,
    pub name: String,
    pub address: String,
    pub location: String,
    pub industry: String,
    pub discount: String,
}

/// Companies from a two-column sheet (name, address). Rows missing either
/// cell or with a blank name are skipped.
pub fn companies(table: &SheetTable) -> Vec<Company> {
    table
        .rows()
        .filter(|(_, row)| row.len() >= 2)
        .filter_map(|(index, row)| {
            let name = row[0].trim();
            let address = row[1].trim();
            (!name.is_empty()).then(|| Company {
                id: index,
                name: name.to_string(),
                address: address.to_string(),
                location: location(address).to_string(),
                industry: industry(name).to_string(),
                discount: PARTNER_DISCOUNT.to_string(),
            })
        })
        .collect()
}

pub fn location(address: &str) -> &'static str {
    let address = address.to_lowercase();
    LOCATIONS
        .iter()
        .find(|l| address.contains(&l.to_lowercase()))
        .copied()
        .unwrap_or(DEFAULT_LOCATION)
}

pub fn industry(name: &str) -> &'static str {
    let name = name.to_lowercase();
    INDUSTRY_RULES
        .iter()
        .find(|(re, _)| re.is_match(&name))
        .map(|(_, industry)| *industry)
        .unwrap_or(DEFAULT_INDUSTRY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_compile() {
        assert_eq!(INDUSTRY_RULES.len(), 26);
    }

    #[test]
    fn test_industry_rule_order() {
        assert_eq!(industry("Ministarstvo finansija KS"), "Državna služba");
        assert_eq!(industry("Atlantbh d.o.o."), "IT");
        assert_eq!(industry("Sarajevo-gas d.o.o."), "Energetika");
        assert_eq!(industry("BH Gas Promet"), "Transport");
        assert_eq!(industry("UniCredit Bank"), "Bankarstvo");
        assert_eq!(industry("FK Željezničar"), "Transport");
        assert_eq!(industry("Pekara Edin"), "Ostalo");
    }

    #[test]
    fn test_location() {
        assert_eq!(location("Zmaja od Bosne 7, SARAJEVO"), "Sarajevo");
        assert_eq!(location("Butmirska cesta 18, Ilidža"), "Ilidža");
        assert_eq!(location(""), "Sarajevo");
        assert_eq!(location("Tuzla"), "Sarajevo");
    }

    #[test]
    fn test_companies_skip_incomplete_rows() {
        let raw = vec![
            vec!["IME FIRME".to_string(), "Adresa".to_string()],
            vec!["Bosnalijek d.d.".to_string(), "Jukićeva 53, Sarajevo".to_string()],
            vec!["Samo ime".to_string()],
            vec!["  ".to_string(), "Pale".to_string()],
            vec!["Hayat TV".to_string(), "Vogošća".to_string()],
        ];
        let list = companies(&SheetTable::new(raw, false));
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 1);
        assert_eq!(list[0].industry, "Farmacija");
        assert_eq!(list[1].id, 4);
        assert_eq!(list[1].industry, "Mediji");
        assert_eq!(list[1].location, "Vogošća");
        assert_eq!(list[1].discount, "10%");
    }
}
