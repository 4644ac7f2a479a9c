// ==========================================
// Agro Asociados - member (asociado) model
// ==========================================
// MemberRecord is the canonical import target: every header variant,
// JSON key and manual-entry form ends up in these fixed keys.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// MemberField - fixed canonical keys
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberField {
    Name,
    Surname,
    NationalId,
    Phone,
    Address,
    SectorOrNeighborhood,
    LandArea,       // numeric-as-string (tareas)
    LivestockCount, // numeric-as-string
}

impl MemberField {
    /// Default column ordering used when a file carries no header line
    pub const DEFAULT_ORDER: [MemberField; 8] = [
        MemberField::Name,
        MemberField::Surname,
        MemberField::NationalId,
        MemberField::Phone,
        MemberField::Address,
        MemberField::SectorOrNeighborhood,
        MemberField::LandArea,
        MemberField::LivestockCount,
    ];

    /// Canonical record key
    pub fn key(&self) -> &'static str {
        match self {
            MemberField::Name => "name",
            MemberField::Surname => "surname",
            MemberField::NationalId => "nationalId",
            MemberField::Phone => "phone",
            MemberField::Address => "address",
            MemberField::SectorOrNeighborhood => "sectorOrNeighborhood",
            MemberField::LandArea => "landArea",
            MemberField::LivestockCount => "livestockCount",
        }
    }

    /// Column name in the `asociados` table
    pub fn column(&self) -> &'static str {
        match self {
            MemberField::Name => "name",
            MemberField::Surname => "surname",
            MemberField::NationalId => "national_id",
            MemberField::Phone => "phone",
            MemberField::Address => "address",
            MemberField::SectorOrNeighborhood => "sector_or_neighborhood",
            MemberField::LandArea => "land_area",
            MemberField::LivestockCount => "livestock_count",
        }
    }

    /// Reverse of `key()`
    pub fn from_key(key: &str) -> Option<Self> {
        Self::DEFAULT_ORDER.iter().copied().find(|f| f.key() == key)
    }

    /// Like `from_key`, ignoring case and surrounding blanks ("NationalID", " name ")
    pub fn from_key_ignore_case(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::DEFAULT_ORDER
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for MemberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==========================================
// CanonicalField - output of the field mapper
// ==========================================
// Unrecognised headers are kept verbatim as free-form keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Known(MemberField),
    Passthrough(String),
}

impl CanonicalField {
    /// Free-form key, promoted to a fixed field when it spells a canonical key
    pub fn passthrough(key: &str) -> Self {
        match MemberField::from_key_ignore_case(key) {
            Some(field) => CanonicalField::Known(field),
            None => CanonicalField::Passthrough(key.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CanonicalField::Known(field) => field.key(),
            CanonicalField::Passthrough(raw) => raw.as_str(),
        }
    }
}

impl From<MemberField> for CanonicalField {
    fn from(field: MemberField) -> Self {
        CanonicalField::Known(field)
    }
}

// ==========================================
// MemberRecord - canonical member mapping
// ==========================================
// Absent fields are empty strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub sector_or_neighborhood: String,
    #[serde(default)]
    pub land_area: String,
    #[serde(default)]
    pub livestock_count: String,

    /// Passthrough columns from unrecognised headers/keys
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl MemberRecord {
    pub fn new(name: &str, surname: &str, national_id: &str) -> Self {
        Self {
            name: name.to_string(),
            surname: surname.to_string(),
            national_id: national_id.to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: MemberField) -> &str {
        match field {
            MemberField::Name => &self.name,
            MemberField::Surname => &self.surname,
            MemberField::NationalId => &self.national_id,
            MemberField::Phone => &self.phone,
            MemberField::Address => &self.address,
            MemberField::SectorOrNeighborhood => &self.sector_or_neighborhood,
            MemberField::LandArea => &self.land_area,
            MemberField::LivestockCount => &self.livestock_count,
        }
    }

    fn slot_mut(&mut self, field: MemberField) -> &mut String {
        match field {
            MemberField::Name => &mut self.name,
            MemberField::Surname => &mut self.surname,
            MemberField::NationalId => &mut self.national_id,
            MemberField::Phone => &mut self.phone,
            MemberField::Address => &mut self.address,
            MemberField::SectorOrNeighborhood => &mut self.sector_or_neighborhood,
            MemberField::LandArea => &mut self.land_area,
            MemberField::LivestockCount => &mut self.livestock_count,
        }
    }

    /// Assign a value; a later assignment to the same key wins.
    ///
    /// A passthrough key that spells a fixed key lands in the fixed field,
    /// so `extra` never shadows one.
    pub fn set(&mut self, field: &CanonicalField, value: impl Into<String>) {
        match field {
            CanonicalField::Known(known) => *self.slot_mut(*known) = value.into(),
            CanonicalField::Passthrough(key) => match MemberField::from_key_ignore_case(key) {
                Some(known) => *self.slot_mut(known) = value.into(),
                None => {
                    self.extra.insert(key.clone(), value.into());
                }
            },
        }
    }

    /// At least one of name / surname / national ID carries data
    pub fn has_key_fields(&self) -> bool {
        [&self.name, &self.surname, &self.national_id]
            .iter()
            .any(|v| !v.trim().is_empty())
    }

    /// Any field (fixed or passthrough) carries data
    pub fn has_any_value(&self) -> bool {
        MemberField::DEFAULT_ORDER
            .iter()
            .any(|f| !self.get(*f).trim().is_empty())
            || self.extra.values().any(|v| !v.trim().is_empty())
    }

    /// Copy with every value trimmed
    pub fn trimmed(&self) -> Self {
        let mut out = self.clone();
        for field in MemberField::DEFAULT_ORDER {
            let slot = out.slot_mut(field);
            *slot = slot.trim().to_string();
        }
        for value in out.extra.values_mut() {
            *value = value.trim().to_string();
        }
        out
    }

    /// Case-insensitive substring match on the searchable columns
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.name,
            &self.surname,
            &self.national_id,
            &self.sector_or_neighborhood,
        ]
        .iter()
        .any(|v| v.to_lowercase().contains(&needle))
    }
}

// ==========================================
// StoredMember - persisted member with identity
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMember {
    pub id: String,
    #[serde(flatten)]
    pub record: MemberRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_and_passthrough() {
        let mut record = MemberRecord::default();
        record.set(&CanonicalField::Known(MemberField::Name), "Juan");
        record.set(&CanonicalField::Passthrough("finca".to_string()), "La Loma");

        assert_eq!(record.name, "Juan");
        assert_eq!(record.extra.get("finca"), Some(&"La Loma".to_string()));
        assert_eq!(record.surname, "");
    }

    #[test]
    fn test_passthrough_never_shadows_fixed_field() {
        let mut record = MemberRecord::default();
        record.set(&CanonicalField::Passthrough("name".to_string()), "Ana");
        record.set(&CanonicalField::Passthrough("nationalid".to_string()), "001-1");

        assert_eq!(record.name, "Ana");
        assert_eq!(record.national_id, "001-1");
        assert!(record.extra.is_empty());

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json.matches("\"name\"").count(), 1);
    }

    #[test]
    fn test_canonical_key_lookup_ignores_case() {
        assert_eq!(
            MemberField::from_key_ignore_case("NationalID"),
            Some(MemberField::NationalId)
        );
        assert_eq!(MemberField::from_key_ignore_case("finca"), None);
        assert_eq!(
            CanonicalField::passthrough("landarea"),
            CanonicalField::Known(MemberField::LandArea)
        );
    }

    #[test]
    fn test_key_fields_invariant() {
        let mut record = MemberRecord::default();
        record.phone = "809-555-0000".to_string();
        assert!(record.has_any_value());
        assert!(!record.has_key_fields());

        record.national_id = "001-1".to_string();
        assert!(record.has_key_fields());
    }

    #[test]
    fn test_serialize_uses_canonical_keys() {
        let mut record = MemberRecord::new("Ana", "Ruiz", "");
        record.extra.insert("finca".to_string(), "x".to_string());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["name"], "Ana");
        assert_eq!(value["nationalId"], "");
        assert_eq!(value["sectorOrNeighborhood"], "");
        assert_eq!(value["finca"], "x");
    }

    #[test]
    fn test_matches_search() {
        let mut record = MemberRecord::new("Juan", "Perez", "001-1");
        record.sector_or_neighborhood = "Los Indios".to_string();

        assert!(record.matches_search("indios"));
        assert!(record.matches_search("PER"));
        assert!(record.matches_search(""));
        assert!(!record.matches_search("maria"));
    }

    #[test]
    fn test_from_key_roundtrip() {
        for field in MemberField::DEFAULT_ORDER {
            assert_eq!(MemberField::from_key(field.key()), Some(field));
        }
        assert_eq!(MemberField::from_key("nombre"), None);
    }
}
