use compare::Compare;
use quickcheck::{Arbitrary, Gen};
use super::Map;

/// Maps are generated from, and shrink through, a vector of entries.
impl<K, V, C> Arbitrary for Map<K, V, C>
    where K: Arbitrary, V: Arbitrary, C: 'static + Clone + Compare<K> + Default {

    fn arbitrary(gen: &mut Gen) -> Self {
        let entries: Vec<(K, V)> = Arbitrary::arbitrary(gen);
        entries.into_iter().collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item=Self>> {
        let entries: Vec<(K, V)> = self.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        Box::new(entries.shrink().map(Map::from_iter))
    }
}
