//! Add-only map from original materials to their baked replacements.

use std::collections::HashMap;

use crate::types::MaterialId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialSubstitution {
    index: HashMap<MaterialId, usize>,
    /// Entries in insertion order
    entries: Vec<(MaterialId, MaterialId)>,
}

impl MaterialSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original -> baked`
    ///
    /// Entries are never replaced: returns false and keeps the existing
    /// entry if `original` is already mapped.
    pub fn insert(&mut self, original: MaterialId, baked: MaterialId) -> bool {
        if self.index.contains_key(&original) {
            return false;
        }
        self.index.insert(original.clone(), self.entries.len());
        self.entries.push((original, baked));
        true
    }

    pub fn get(&self, original: &MaterialId) -> Option<&MaterialId> {
        self.index.get(original).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, original: &MaterialId) -> bool {
        self.index.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(original, baked)` pairs in the order they were recorded
    pub fn iter(&self) -> impl Iterator<Item = (&MaterialId, &MaterialId)> {
        self.entries.iter().map(|(o, b)| (o, b))
    }

    /// Substitute every mapped slot; returns the new slot set and how many
    /// slots changed
    pub fn apply_to_slots(&self, slots: &[Option<MaterialId>]) -> (Vec<Option<MaterialId>>, usize) {
        let mut replaced = 0;
        let slots = slots
            .iter()
            .map(|slot| match slot.as_ref().and_then(|m| self.get(m)) {
                Some(baked) => {
                    replaced += 1;
                    Some(baked.clone())
                }
                None => slot.clone(),
            })
            .collect();
        (slots, replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_only() {
        let mut map = MaterialSubstitution::new();
        assert!(map.insert(MaterialId::new("a.mat"), MaterialId::new("a_baked.mat")));
        assert!(!map.insert(MaterialId::new("a.mat"), MaterialId::new("other.mat")));
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&MaterialId::new("a.mat")),
            Some(&MaterialId::new("a_baked.mat"))
        );
    }

    #[test]
    fn test_iter_keeps_insertion_order() {
        let mut map = MaterialSubstitution::new();
        map.insert(MaterialId::new("z.mat"), MaterialId::new("z2.mat"));
        map.insert(MaterialId::new("a.mat"), MaterialId::new("a2.mat"));
        let originals: Vec<_> = map.iter().map(|(o, _)| o.to_string()).collect();
        assert_eq!(originals, vec!["z.mat", "a.mat"]);
    }

    #[test]
    fn test_apply_to_slots() {
        let a = MaterialId::new("a.mat");
        let b = MaterialId::new("b.mat");
        let mut map = MaterialSubstitution::new();
        map.insert(a.clone(), MaterialId::new("a_baked.mat"));

        let (slots, replaced) = map.apply_to_slots(&[Some(a.clone()), None, Some(b.clone()), Some(a)]);
        assert_eq!(replaced, 2);
        assert_eq!(
            slots,
            vec![
                Some(MaterialId::new("a_baked.mat")),
                None,
                Some(b),
                Some(MaterialId::new("a_baked.mat")),
            ]
        );
    }
}
