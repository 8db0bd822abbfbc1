//! Bundled texture catalog and skin-tone recommendation
//!
//! The try-on surface ships a fixed set of saree patterns and a small
//! fair/medium/dusky lookup suggesting which bundled pattern flatters a given
//! skin tone. User uploads bypass the catalog entirely through
//! [`crate::assets::ImageData::from_bytes`].

/// A bundled garment pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display label, e.g. "red"
    pub label: String,
    /// Texture file name relative to the texture directory
    pub file: String,
}

/// Skin tone choices offered by the recommender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinTone {
    /// Fair complexion
    Fair,
    /// Medium complexion
    Medium,
    /// Dusky complexion
    Dusky,
}

/// Fixed list of bundled garment patterns with a tone recommender
#[derive(Debug, Clone)]
pub struct TextureCatalog {
    entries: Vec<CatalogEntry>,
}

impl TextureCatalog {
    /// Catalog of the bundled saree patterns
    pub fn bundled() -> Self {
        let entries = [
            "red-saree.jpg",
            "yellow-saree.jpg",
            "orange-saree.png",
            "blue-saree.jpg",
        ]
        .into_iter()
        .map(|file| CatalogEntry {
            // "red-saree.jpg" -> "red"
            label: file.split('-').next().unwrap_or(file).to_string(),
            file: file.to_string(),
        })
        .collect();

        Self { entries }
    }

    /// All catalog entries in display order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by display label
    pub fn by_label(&self, label: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.label == label)
    }

    /// The bundled pattern recommended for a skin tone
    pub fn recommend(&self, tone: SkinTone) -> Option<&CatalogEntry> {
        let file = match tone {
            SkinTone::Fair => "red-saree.jpg",
            SkinTone::Medium => "blue-saree.jpg",
            SkinTone::Dusky => "yellow-saree.jpg",
        };
        self.entries.iter().find(|entry| entry.file == file)
    }
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_labels() {
        let catalog = TextureCatalog::bundled();
        let labels: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.label.as_str())
            .collect();

        assert_eq!(labels, ["red", "yellow", "orange", "blue"]);
    }

    #[test]
    fn test_recommendations_cover_every_tone() {
        let catalog = TextureCatalog::bundled();

        assert_eq!(catalog.recommend(SkinTone::Fair).unwrap().file, "red-saree.jpg");
        assert_eq!(catalog.recommend(SkinTone::Medium).unwrap().file, "blue-saree.jpg");
        assert_eq!(catalog.recommend(SkinTone::Dusky).unwrap().file, "yellow-saree.jpg");
    }

    #[test]
    fn test_lookup_by_label() {
        let catalog = TextureCatalog::bundled();
        assert_eq!(catalog.by_label("orange").unwrap().file, "orange-saree.png");
        assert!(catalog.by_label("green").is_none());
    }
}
