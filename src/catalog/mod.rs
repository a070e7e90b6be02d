//! Static lookup tables: appliance catalog and regional tariffs.

/// Appliance definitions keyed by identifier.
pub mod appliance;
/// Chilean region codes and per-region tariffs.
pub mod region;

pub use appliance::{ApplianceDefinition, Catalog, CatalogProvider};
pub use region::{RegionCode, RegionTariff, TariffProvider, TariffTable};
