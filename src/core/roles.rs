use serde::{Deserialize, Serialize};

use super::types::ItemCategory;

/// Resolved role of the logged-in user.
///
/// Roles only decide which catalogs a user may order from; authentication
/// happens elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserRole {
    /// Distributor staff: every catalog.
    #[default]
    Cardancorp,
    /// Dealership: third-axle kits only.
    Concessionaria,
    /// Sales representative: slack adjusters, brake kits, components, driveshafts.
    Representante,
    /// Unrecognized role, treated like distributor staff.
    Desconhecido,
}

impl UserRole {
    /// Whether this role may add lines of `category` to the cart.
    pub fn can_order(&self, category: ItemCategory) -> bool {
        match self {
            Self::Cardancorp | Self::Desconhecido => true,
            Self::Concessionaria => category == ItemCategory::ThirdAxleKitPart,
            Self::Representante => category != ItemCategory::ThirdAxleKitPart,
        }
    }

    /// Parse the role column of the credential sheet; unknown text maps to
    /// [`UserRole::Desconhecido`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "cardancorp" => Self::Cardancorp,
            "concessionaria" | "concessionária" => Self::Concessionaria,
            "representante" => Self::Representante,
            _ => Self::Desconhecido,
        }
    }
}
