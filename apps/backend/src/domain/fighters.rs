use serde::{Deserialize, Serialize};

/// Number of equipment items dealt to each participant at pairing.
pub const EQUIPMENT_SLOTS: usize = 3;

/// Read-only reference data describing a selectable fighter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FighterCatalogEntry {
    pub name: String,
    /// Cosmetic asset reference, opaque to the server.
    pub image: String,
}

impl FighterCatalogEntry {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

/// The full set of fighters plus the equipment pool dealt from at pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterCatalog {
    pub fighters: Vec<FighterCatalogEntry>,
    pub equipment: Vec<String>,
}

impl FighterCatalog {
    pub fn builtin() -> Self {
        let fighters = [
            ("Knight", "knight.png"),
            ("Ronin", "ronin.png"),
            ("Valkyrie", "valkyrie.png"),
            ("Brute", "brute.png"),
            ("Shadow", "shadow.png"),
            ("Monk", "monk.png"),
        ]
        .into_iter()
        .map(|(name, image)| FighterCatalogEntry::new(name, image))
        .collect();

        let equipment = [
            "sword.png",
            "shield.png",
            "helmet.png",
            "gauntlets.png",
            "boots.png",
            "amulet.png",
            "axe.png",
            "cloak.png",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            fighters,
            equipment,
        }
    }

    pub fn find(&self, name: &str) -> Option<&FighterCatalogEntry> {
        self.fighters.iter().find(|f| f.name == name)
    }

    /// Structural checks; returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.fighters.is_empty() {
            return Err("catalog has no fighters".to_string());
        }
        for (i, fighter) in self.fighters.iter().enumerate() {
            if fighter.name.trim().is_empty() {
                return Err(format!("fighter #{i} has an empty name"));
            }
            if self.fighters[..i].iter().any(|f| f.name == fighter.name) {
                return Err(format!("duplicate fighter name '{}'", fighter.name));
            }
        }
        if self.equipment.len() < EQUIPMENT_SLOTS {
            return Err(format!(
                "equipment pool needs at least {EQUIPMENT_SLOTS} items, got {}",
                self.equipment.len()
            ));
        }
        Ok(())
    }
}

impl Default for FighterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
