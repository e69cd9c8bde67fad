//! Display catalogue for the materials page.
//!
//! Values are shown as written, so ranges and approximations stay strings.

use serde::Serialize;

/// One card of the materials page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogueCard {
    pub name: &'static str,
    pub young_modulus: &'static str,
    pub yield_strength: &'static str,
    pub density: &'static str,
}

impl CatalogueCard {
    const fn new(
        name: &'static str,
        young_modulus: &'static str,
        yield_strength: &'static str,
        density: &'static str,
    ) -> Self {
        CatalogueCard {
            name,
            young_modulus,
            yield_strength,
            density,
        }
    }

    /// Multi-line card body.
    pub fn body(&self) -> String {
        format!(
            "E = {}\nRe = {}\nρ = {}",
            self.young_modulus, self.yield_strength, self.density
        )
    }
}

pub const CATALOGUE: [CatalogueCard; 10] = [
    CatalogueCard::new("Acier S235", "210 GPa", "235 MPa", "7.85 g/cm³"),
    CatalogueCard::new("Acier Inox 304", "193 GPa", "215 MPa", "8.0 g/cm³"),
    CatalogueCard::new("Aluminium 6061-T6", "69 GPa", "276 MPa", "2.70 g/cm³"),
    CatalogueCard::new("Titane Grade 5", "114 GPa", "880 MPa", "4.43 g/cm³"),
    CatalogueCard::new("ABS", "2.1 GPa", "≈ 40 MPa", "1.04 g/cm³"),
    CatalogueCard::new("Nylon (PA)", "2.5 GPa", "≈ 70 MPa", "1.15 g/cm³"),
    CatalogueCard::new("PEEK", "3.6 GPa", "100 MPa", "1.3 g/cm³"),
    CatalogueCard::new("Bakelite", "≈ 3.5 GPa", "≈ 60 MPa", "1.3 g/cm³"),
    CatalogueCard::new("Carbone époxy", "70–135 GPa", "600+ MPa", "1.5 g/cm³"),
    CatalogueCard::new("Cuivre", "110 GPa", "70 MPa", "8.96 g/cm³"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_body() {
        let body = CATALOGUE[0].body();
        assert_eq!(body, "E = 210 GPa\nRe = 235 MPa\nρ = 7.85 g/cm³");
    }
}
