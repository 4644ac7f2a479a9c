// ==========================================
// Agro Asociados - field mapper
// ==========================================
// Responsibility: header token -> canonical member field
// First matching trigger substring wins (priority order below).
// Otherwise a token spelling a canonical key ("name", "nationalid")
// maps to that field; anything else passes through verbatim
// ==========================================

use crate::domain::member::{CanonicalField, MemberField};
use crate::importer::member_importer_trait::FieldMapper as FieldMapperTrait;

/// Trigger substrings, in priority order
const TRIGGERS: [(&str, MemberField); 9] = [
    ("nombre", MemberField::Name),
    ("apellido", MemberField::Surname),
    ("cedula", MemberField::NationalId),
    ("telefono", MemberField::Phone),
    ("direccion", MemberField::Address),
    ("sector", MemberField::SectorOrNeighborhood),
    ("barrio", MemberField::SectorOrNeighborhood),
    ("tarea", MemberField::LandArea),
    ("animal", MemberField::LivestockCount),
];

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_header(&self, header: &str) -> CanonicalField {
        TRIGGERS
            .iter()
            .find(|(trigger, _)| header.contains(trigger))
            .map(|(_, field)| CanonicalField::Known(*field))
            .unwrap_or_else(|| CanonicalField::passthrough(header))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(field: MemberField) -> CanonicalField {
        CanonicalField::Known(field)
    }

    #[test]
    fn test_common_header_variants() {
        let mapper = FieldMapper;
        assert_eq!(mapper.map_header("nombre"), known(MemberField::Name));
        assert_eq!(mapper.map_header("nombres"), known(MemberField::Name));
        assert_eq!(mapper.map_header("apellidos"), known(MemberField::Surname));
        assert_eq!(mapper.map_header("no. cedula"), known(MemberField::NationalId));
        assert_eq!(mapper.map_header("telefono movil"), known(MemberField::Phone));
        assert_eq!(mapper.map_header("direccion"), known(MemberField::Address));
        assert_eq!(
            mapper.map_header("sectorbarrio"),
            known(MemberField::SectorOrNeighborhood)
        );
        assert_eq!(
            mapper.map_header("barrio"),
            known(MemberField::SectorOrNeighborhood)
        );
        assert_eq!(mapper.map_header("cantidadtareas"), known(MemberField::LandArea));
        assert_eq!(
            mapper.map_header("criaanimales"),
            known(MemberField::LivestockCount)
        );
    }

    #[test]
    fn test_priority_order() {
        // "nombre" is tested before "apellido"
        assert_eq!(
            FieldMapper.map_header("nombre y apellido"),
            known(MemberField::Name)
        );
    }

    #[test]
    fn test_accented_tokens_pass_through() {
        assert_eq!(
            FieldMapper.map_header("cédula"),
            CanonicalField::Passthrough("cédula".to_string())
        );
    }

    #[test]
    fn test_unknown_header_passes_through() {
        let mapped = FieldMapper.map_header("finca");
        assert_eq!(mapped, CanonicalField::Passthrough("finca".to_string()));
        assert_eq!(mapped.key(), "finca");
    }

    #[test]
    fn test_canonical_keys_map_to_fixed_fields() {
        assert_eq!(FieldMapper.map_header("name"), known(MemberField::Name));
        assert_eq!(FieldMapper.map_header("surname"), known(MemberField::Surname));
        assert_eq!(FieldMapper.map_header("nationalid"), known(MemberField::NationalId));
        assert_eq!(FieldMapper.map_header("phone"), known(MemberField::Phone));
        assert_eq!(
            FieldMapper.map_header("livestockcount"),
            known(MemberField::LivestockCount)
        );
    }

    #[test]
    fn test_mapping_is_idempotent() {
        for header in ["nombre", "x", "sector", ""] {
            assert_eq!(FieldMapper.map_header(header), FieldMapper.map_header(header));
        }
    }
}
