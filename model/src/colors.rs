use std::collections::BTreeMap;

/// Display colors for one loaded dataset. Build a new one for every load; the same ID keeps its
/// color for as long as this lives.
#[derive(Clone, Debug)]
pub struct Colors<K> {
    by_id: BTreeMap<K, String>,
}

impl<K: Ord + Clone> Colors<K> {
    /// IDs get colors in the order they're first seen, cycling through a categorical scheme.
    pub fn assign<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let scheme = colorous::TABLEAU10;
        let mut by_id = BTreeMap::new();
        for id in ids {
            if by_id.contains_key(id) {
                continue;
            }
            let color = scheme[by_id.len() % scheme.len()];
            by_id.insert(
                id.clone(),
                format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b),
            );
        }
        Self { by_id }
    }

    pub fn get(&self, id: &K) -> Option<&str> {
        self.by_id.get(id).map(|color| color.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
