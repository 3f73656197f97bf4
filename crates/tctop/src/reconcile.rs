//! Joining filter addresses onto classes.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::net::IpAddr;

use crate::handle::ClassId;
use crate::record::{ClassRecord, FilterRecord};

/// Class id to address lookup built from one filter dump.
///
/// When several filters target the same class, the first one wins.
#[derive(Debug, Clone, Default)]
pub struct FilterIndex {
    by_class: HashMap<ClassId, IpAddr>,
}

impl FilterIndex {
    /// Build the index from filters in dump order.
    pub fn new(filters: &[FilterRecord]) -> Self {
        let mut by_class = HashMap::with_capacity(filters.len());
        for filter in filters {
            if let Entry::Vacant(entry) = by_class.entry(filter.class_id) {
                entry.insert(filter.ip_addr);
            }
        }
        Self { by_class }
    }

    /// Address of the first filter targeting `class_id`.
    pub fn get(&self, class_id: &ClassId) -> Option<IpAddr> {
        self.by_class.get(class_id).copied()
    }

    /// Number of distinct classes with a filter.
    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    /// Whether no filter was indexed.
    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

/// Attach filter addresses to `classes`.
///
/// Classes without a filter get [`ClassRecord::UNSPECIFIED_ADDR`].
pub fn reconcile(filters: &[FilterRecord], classes: Vec<ClassRecord>) -> Vec<ClassRecord> {
    let index = FilterIndex::new(filters);
    classes
        .into_iter()
        .map(|mut class| {
            class.ip_addr = index
                .get(&class.class_id)
                .unwrap_or(ClassRecord::UNSPECIFIED_ADDR);
            class
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::parse::{parse_classes, parse_filters};
    use crate::record::ClassStats;

    #[test]
    fn test_first_filter_wins() {
        let filters = vec![
            FilterRecord {
                class_id: ClassId::new(1, 0x10),
                ip_addr: "10.0.0.1".parse().unwrap(),
            },
            FilterRecord {
                class_id: ClassId::new(1, 0x10),
                ip_addr: "10.0.0.2".parse().unwrap(),
            },
        ];
        let index = FilterIndex::new(&filters);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&ClassId::new(1, 0x10)), Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_unmatched_class_gets_unspecified() {
        let classes = vec![ClassRecord::new(ClassId::new(1, 5), None, ClassStats::default())];
        let joined = reconcile(&[], classes);
        assert_eq!(joined[0].ip_addr, ClassRecord::UNSPECIFIED_ADDR);
    }

    #[test]
    fn test_fixture_join() {
        let filters = parse_filters(fixtures::FILTER_DUMP);
        let classes = reconcile(&filters, parse_classes(fixtures::CLASS_DUMP_FIRST));

        let addr = |id: ClassId| {
            classes
                .iter()
                .find(|c| c.class_id == id)
                .map(|c| c.ip_addr.to_string())
        };
        assert_eq!(addr(ClassId::new(1, 0x10)).as_deref(), Some("10.0.0.10"));
        assert_eq!(addr(ClassId::new(1, 0x11)).as_deref(), Some("10.0.0.11"));
        assert_eq!(addr(ClassId::new(1, 0x20)).as_deref(), Some("2001:db8:0:1::"));
        assert_eq!(addr(ClassId::new(1, 1)).as_deref(), Some("0.0.0.0"));
    }
}
