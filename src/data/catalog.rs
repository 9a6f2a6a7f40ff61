use serde::Deserialize;

use crate::models::hotel::Hotel;

/// The embedded, versioned hotel list. Treated as an external collaborator:
/// the rest of the crate only ever reads from it.
const CATALOG_JSON: &str = include_str!("hotels.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    hotels: Vec<Hotel>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    version: u32,
    hotels: Vec<Hotel>,
}

impl Catalog {
    /// Parse the embedded catalog. Fails only if the fixture itself is
    /// malformed.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let file: CatalogFile = serde_json::from_str(CATALOG_JSON)
            .map_err(|e| format!("Failed to parse hotel catalog: {}", e))?;
        log::debug!(
            "Loaded hotel catalog v{} with {} hotels",
            file.version,
            file.hotels.len()
        );
        Ok(Self {
            version: file.version,
            hotels: file.hotels,
        })
    }

    /// Build a catalog from an explicit hotel list (fixtures, tests).
    pub fn from_hotels(hotels: Vec<Hotel>) -> Self {
        Self { version: 0, hotels }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    pub fn by_id(&self, id: u32) -> Option<&Hotel> {
        self.hotels.iter().find(|h| h.id == id)
    }

    pub fn len(&self) -> usize {
        self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty()
    }
}
