//! Organisation category classification
//!
//! Derives an organisation's category from its CURIE prefix, refined by the
//! declared `local-authority-type` code where the prefix alone is not enough.
//! The classifier is a pure, total function: identifiers outside the known
//! prefix set fall into [`Category::Unclassified`], which carries the weakest
//! validation profile rather than failing.

use crate::app::models::{Curie, Organisation};
use crate::constants::prefixes;

/// Organisation category, derived from the identifier prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// English local authority; the type code selects the validation profile
    LocalAuthorityEng { authority_type: AuthorityType },
    /// National park authority
    NationalParkAuthority,
    /// Development corporation
    DevelopmentCorporation,
    /// Waste disposal authority (no geographic extent)
    WasteAuthority,
    /// Passenger transport authority (no geographic extent)
    TransportAuthority,
    /// Regional park authority (no geographic extent)
    RegionalParkAuthority,
    /// Prefix not recognised; weakest validation profile applies
    Unclassified,
}

/// Local authority type codes from the local-authority-eng register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityType {
    /// Combined authority
    Combined,
    /// County council
    County,
    /// Non-metropolitan district council
    District,
    /// Metropolitan district council
    MetropolitanDistrict,
    /// London borough council
    LondonBorough,
    /// City of London Corporation
    CityCorporation,
    /// Unitary authority
    UnitaryAuthority,
    /// Council of the Isles of Scilly
    CouncilOfTheIsles,
    /// Strategic regional authority (the GLA)
    StrategicRegionalAuthority,
    /// Type code missing or not recognised
    Unknown,
}

impl AuthorityType {
    /// Parse a register type code
    pub fn from_code(code: &str) -> Self {
        match code {
            "COMB" => Self::Combined,
            "CTY" => Self::County,
            "DIS" | "NMD" => Self::District,
            "MD" => Self::MetropolitanDistrict,
            "LBO" => Self::LondonBorough,
            "CC" => Self::CityCorporation,
            "UA" => Self::UnitaryAuthority,
            "COI" => Self::CouncilOfTheIsles,
            "SRA" => Self::StrategicRegionalAuthority,
            _ => Self::Unknown,
        }
    }

    /// Whether this is a combined authority
    pub fn is_combined(&self) -> bool {
        matches!(self, Self::Combined)
    }
}

impl Category {
    /// Whether the category describes a body with a geographic extent.
    ///
    /// Bodies without one must not carry a statistical geography code at all.
    pub fn has_geographic_extent(&self) -> bool {
        !matches!(
            self,
            Self::WasteAuthority | Self::TransportAuthority | Self::RegionalParkAuthority
        )
    }
}

/// Classify an organisation from its identifier and record.
///
/// Side-effect free and total: every input yields a category.
pub fn classify(curie: &Curie, record: &Organisation) -> Category {
    match curie.prefix() {
        Some(prefixes::LOCAL_AUTHORITY_ENG) => Category::LocalAuthorityEng {
            authority_type: AuthorityType::from_code(record.local_authority_type()),
        },
        Some(prefixes::NATIONAL_PARK_AUTHORITY) => Category::NationalParkAuthority,
        Some(prefixes::DEVELOPMENT_CORPORATION) => Category::DevelopmentCorporation,
        Some(prefixes::WASTE_AUTHORITY) => Category::WasteAuthority,
        Some(prefixes::TRANSPORT_AUTHORITY) => Category::TransportAuthority,
        Some(prefixes::REGIONAL_PARK_AUTHORITY) => Category::RegionalParkAuthority,
        _ => Category::Unclassified,
    }
}
