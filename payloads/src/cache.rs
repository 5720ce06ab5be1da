use std::collections::HashMap;

use crate::{Page, Property, PropertyFilters, PropertyId};

/// Client-side copies of fetched data. List pages are keyed by the full
/// filter tuple; writes invalidate rather than patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyCache {
    pages: HashMap<PropertyFilters, Page<Property>>,
    details: HashMap<PropertyId, Property>,
}

impl PropertyCache {
    pub fn page(&self, filters: &PropertyFilters) -> Option<&Page<Property>> {
        self.pages.get(filters)
    }

    pub fn store_page(&mut self, filters: PropertyFilters, page: Page<Property>) {
        self.pages.insert(filters, page);
    }

    pub fn property(&self, id: PropertyId) -> Option<&Property> {
        self.details.get(&id)
    }

    pub fn store_property(&mut self, property: Property) {
        if let Some(id) = property.id {
            self.details.insert(id, property);
        }
    }

    /// A property was created or updated: every list page may be stale.
    pub fn saved(&mut self, property: &Property) {
        self.pages.clear();
        if let Some(id) = property.id {
            self.details.remove(&id);
        }
    }

    /// The property was deleted, or changed other than through a save.
    pub fn invalidate(&mut self, id: PropertyId) {
        self.pages.clear();
        self.details.remove(&id);
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.details.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterField;

    fn property(id: i64) -> Property {
        Property {
            id: Some(PropertyId(id)),
            address: format!("{id} Acacia Avenue"),
            ..Default::default()
        }
    }

    #[test]
    fn pages_are_keyed_by_the_whole_filter_tuple() {
        let mut cache = PropertyCache::default();
        let filters =
            PropertyFilters::default().with_field(FilterField::Bedrooms, "3");
        cache.store_page(filters.clone(), Page::single(vec![property(1)]));

        assert!(cache.page(&filters).is_some());
        assert!(cache.page(&filters.with_page(1)).is_none());
        assert!(cache.page(&PropertyFilters::default()).is_none());
    }

    #[test]
    fn saving_invalidates_lists_and_the_saved_record() {
        let mut cache = PropertyCache::default();
        cache.store_page(PropertyFilters::default(), Page::single(vec![]));
        cache.store_property(property(1));
        cache.store_property(property(2));

        cache.saved(&property(1));
        assert!(cache.page(&PropertyFilters::default()).is_none());
        assert!(cache.property(PropertyId(1)).is_none());
        assert!(cache.property(PropertyId(2)).is_some());

        cache.invalidate(PropertyId(2));
        assert_eq!(cache, PropertyCache::default());
    }
}
