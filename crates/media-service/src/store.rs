//! In-memory media store.

use dashmap::DashMap;
use shared_types::Media;

/// Media records keyed by id.
pub struct MediaStore {
    media: DashMap<String, Media>,
}

impl MediaStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            media: DashMap::new(),
        }
    }

    pub fn insert(&self, media: Media) -> Media {
        self.media.insert(media.id.clone(), media.clone());
        media
    }

    #[must_use]
    pub fn for_product(&self, product_id: &str) -> Vec<Media> {
        self.media
            .iter()
            .filter(|entry| entry.product_id == product_id)
            .map(|entry| entry.clone())
            .collect()
    }

    /// Remove every record belonging to the given products.
    ///
    /// Returns how many records were removed.
    pub fn remove_for_products(&self, product_ids: &[String]) -> usize {
        let doomed: Vec<String> = self
            .media
            .iter()
            .filter(|entry| product_ids.contains(&entry.product_id))
            .map(|entry| entry.id.clone())
            .collect();

        doomed
            .iter()
            .filter(|id| self.media.remove(*id).is_some())
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.media.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

impl Default for MediaStore {
    fn default() -> Self {
        Self::new()
    }
}
