// ==========================================
// Agro Asociados - board officers (directiva)
// ==========================================
// Responsibility: board member entity and the fixed position catalogue
// Stored position = display title of the position
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// BoardPosition - position catalogue (slug <-> title)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoardPosition {
    Presidente,
    Vicepresidente,
    SecretarioGeneral,
    SecretarioActa,
    SecretarioFinanzas,
    SecretarioOrganizacion,
    PrimerVocal,
    SegundoVocal,
    Informatica,
    PrensaPropaganda,
    SecretarioDeporte,
    Medioambiente,
    RelacionesPublicas,
    Disciplina,
    SecretarioSalud,
}

impl BoardPosition {
    pub const ALL: [BoardPosition; 15] = [
        BoardPosition::Presidente,
        BoardPosition::Vicepresidente,
        BoardPosition::SecretarioGeneral,
        BoardPosition::SecretarioActa,
        BoardPosition::SecretarioFinanzas,
        BoardPosition::SecretarioOrganizacion,
        BoardPosition::PrimerVocal,
        BoardPosition::SegundoVocal,
        BoardPosition::Informatica,
        BoardPosition::PrensaPropaganda,
        BoardPosition::SecretarioDeporte,
        BoardPosition::Medioambiente,
        BoardPosition::RelacionesPublicas,
        BoardPosition::Disciplina,
        BoardPosition::SecretarioSalud,
    ];

    /// URL slug
    pub fn slug(&self) -> &'static str {
        match self {
            BoardPosition::Presidente => "presidente",
            BoardPosition::Vicepresidente => "vicepresidente",
            BoardPosition::SecretarioGeneral => "secretario-general",
            BoardPosition::SecretarioActa => "secretario-acta",
            BoardPosition::SecretarioFinanzas => "secretario-finanzas",
            BoardPosition::SecretarioOrganizacion => "secretario-organizacion",
            BoardPosition::PrimerVocal => "primer-vocal",
            BoardPosition::SegundoVocal => "segundo-vocal",
            BoardPosition::Informatica => "informatica",
            BoardPosition::PrensaPropaganda => "prensa-propaganda",
            BoardPosition::SecretarioDeporte => "secretario-deporte",
            BoardPosition::Medioambiente => "medioambiente",
            BoardPosition::RelacionesPublicas => "relaciones-publicas",
            BoardPosition::Disciplina => "disciplina",
            BoardPosition::SecretarioSalud => "secretario-salud",
        }
    }

    /// Display title (this is what gets stored)
    pub fn title(&self) -> &'static str {
        match self {
            BoardPosition::Presidente => "Presidente",
            BoardPosition::Vicepresidente => "Vice Presidente",
            BoardPosition::SecretarioGeneral => "Secretario General",
            BoardPosition::SecretarioActa => "Secretario de Acta",
            BoardPosition::SecretarioFinanzas => "Secretario de Finanzas",
            BoardPosition::SecretarioOrganizacion => "Secretario de Organizacion",
            BoardPosition::PrimerVocal => "Primer Vocal",
            BoardPosition::SegundoVocal => "Segundo Vocal",
            BoardPosition::Informatica => "Informatica",
            BoardPosition::PrensaPropaganda => "Secretario de Prensa y Propaganda",
            BoardPosition::SecretarioDeporte => "Secretario de Deporte",
            BoardPosition::Medioambiente => "Secretario de Medioambiente",
            BoardPosition::RelacionesPublicas => "Secretario de Relaciones Públicas",
            BoardPosition::Disciplina => "Secretario de Disciplina",
            BoardPosition::SecretarioSalud => "Secretario de Salud",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.slug() == slug.trim())
    }

    /// Accepts either a slug or a display title
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::from_slug(value).or_else(|| Self::ALL.iter().copied().find(|p| p.title() == value))
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ==========================================
// BoardMember - one officer
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    #[serde(default)]
    pub id: String, // empty until stored
    pub name: String,
    pub surname: String,
    pub national_id: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    pub photo: Option<String>,       // URL
    pub position: String,            // display title
    pub start_date: Option<NaiveDate>, // defaults to today on save
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub biography: Option<String>,
}

fn default_active() -> bool {
    true
}

impl BoardMember {
    pub fn new(name: &str, surname: &str, national_id: &str, position: BoardPosition) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            surname: surname.to_string(),
            national_id: national_id.to_string(),
            phone: String::new(),
            email: None,
            photo: None,
            position: position.title().to_string(),
            start_date: None,
            end_date: None,
            active: true,
            biography: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }

    /// Names of required fields that are blank
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.surname.trim().is_empty() {
            missing.push("surname");
        }
        if self.national_id.trim().is_empty() {
            missing.push("nationalId");
        }
        if self.position.trim().is_empty() {
            missing.push("position");
        }
        missing
    }
}
