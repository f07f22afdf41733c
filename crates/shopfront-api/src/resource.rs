// ── REST resources exposed by the back-office API ──

use std::fmt;

/// A collection endpoint under `/api/v1/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Products,
    Categories,
    Customers,
    Reservations,
    Sales,
    /// Storefront catalog, readable without a session token.
    PublicProducts,
    PublicCategories,
    PublicReservations,
}

impl Resource {
    /// Path relative to the API base URL, without leading or trailing slash.
    pub fn path(self) -> &'static str {
        match self {
            Self::Products => "api/v1/products",
            Self::Categories => "api/v1/categories",
            Self::Customers => "api/v1/customers",
            Self::Reservations => "api/v1/reservations",
            Self::Sales => "api/v1/sales",
            Self::PublicProducts => "api/v1/public/products",
            Self::PublicCategories => "api/v1/public/categories",
            Self::PublicReservations => "api/v1/public/reservations",
        }
    }

    /// Path of a single record, with the id percent-encoded as one segment.
    pub fn item_path(self, id: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
        format!("{}/{}", self.path(), encoded.replace('+', "%20"))
    }

    pub fn is_public(self) -> bool {
        matches!(
            self,
            Self::PublicProducts | Self::PublicCategories | Self::PublicReservations
        )
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.path().trim_start_matches("api/v1/");
        f.write_str(name)
    }
}
