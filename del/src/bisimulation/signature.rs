//! Canonical bounded contraction via interned world signatures.
//!
//! The depth-`h` signature of a world is its label together with, for each
//! agent, the collection of depth-`h-1` signatures of its successors.
//! Signatures are interned in two levels, so equality at any depth is a
//! comparison of dense ids, and ids are shared across states: a world of
//! one state and a world of another receive the same id exactly when their
//! signatures are structurally identical. The committed canonical form is
//! the sorted successor-signature set per agent, then the agent-indexed
//! tuple.

use super::Partition;
use crate::ids::dense_id;
use crate::label::LabelId;
use crate::state::{State, WorldId};
use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use smallvec::SmallVec;

dense_id!(
    /// Identifier of an interned world signature.
    SignatureId
);
dense_id!(
    /// Identifier of an interned per-agent information state (the sorted
    /// successor-signature set).
    InfoId
);

type InfoTuple = SmallVec<[InfoId; 4]>;

/// Two-level interning table for world signatures.
///
/// The inner level interns sorted successor-signature sets; the outer
/// level interns `(label, information states)` tuples. Both levels hand
/// out dense ids and never evict.
#[derive(Default, Clone)]
pub struct SignatureStore {
    infos: Vec<Box<[SignatureId]>>,
    info_index: HashMap<Box<[SignatureId]>, InfoId>,
    signatures: Vec<(LabelId, InfoTuple)>,
    signature_index: HashMap<(LabelId, InfoTuple), SignatureId>,
}

impl SignatureStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Interns a sorted successor-signature set.
    pub fn intern_info(&mut self, members: Box<[SignatureId]>) -> InfoId {
        debug_assert!(members.windows(2).all(|pair| pair[0] < pair[1]));
        if let Some(&id) = self.info_index.get(&members) {
            return id;
        }
        let id = InfoId::new(self.infos.len());
        self.info_index.insert(members.clone(), id);
        self.infos.push(members);
        id
    }

    /// Interns a `(label, information states)` tuple.
    pub fn intern_signature(&mut self, label: LabelId, infos: InfoTuple) -> SignatureId {
        let key = (label, infos);
        if let Some(&id) = self.signature_index.get(&key) {
            return id;
        }
        let id = SignatureId::new(self.signatures.len());
        self.signature_index.insert(key.clone(), id);
        self.signatures.push(key);
        id
    }

    pub fn label_of(&self, signature: SignatureId) -> LabelId {
        self.signatures[signature].0
    }

    /// Information state of `signature` for the given agent index.
    pub fn info_of(&self, signature: SignatureId, agent: usize) -> InfoId {
        self.signatures[signature].1[agent]
    }

    pub fn info_members(&self, info: InfoId) -> &[SignatureId] {
        &self.infos[info]
    }

    pub fn signatures_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn infos_count(&self) -> usize {
        self.infos.len()
    }
}

/// Partitions the worlds of `universe` by their depth-`bound` signatures,
/// reporting whether the signature partition had stabilized by the bound.
pub(crate) fn canonical_partition(
    s: &State,
    universe: &FixedBitSet,
    bound: usize,
    store: &mut SignatureStore,
) -> (Partition, bool) {
    // Depth 0: the signature is the label alone.
    let mut signatures: Vec<Option<SignatureId>> = vec![None; s.worlds_count()];
    for w in universe.ones() {
        let label = s.label_of(WorldId::new(w));
        signatures[w] = Some(store.intern_signature(label, InfoTuple::new()));
    }
    let mut count = distinct_count(&signatures);

    // Successive depths refine the partition; an unchanged class count
    // therefore means an unchanged partition, which is a fixpoint.
    let mut stable = false;
    for depth in 1..=bound {
        let next = deepen(s, universe, &signatures, store);
        let next_count = distinct_count(&next);
        signatures = next;
        if next_count == count {
            stable = true;
            tracing::trace!(depth, classes = count, "signatures stabilized");
            break;
        }
        count = next_count;
    }

    if !stable {
        let probe = deepen(s, universe, &signatures, store);
        stable = distinct_count(&probe) == count;
    }

    (normalize(s, &signatures, count), stable)
}

/// Computes the depth-`h` signatures from the depth-`h-1` ones.
fn deepen(
    s: &State,
    universe: &FixedBitSet,
    signatures: &[Option<SignatureId>],
    store: &mut SignatureStore,
) -> Vec<Option<SignatureId>> {
    let mut next: Vec<Option<SignatureId>> = vec![None; s.worlds_count()];
    for w in universe.ones() {
        let world = WorldId::new(w);
        let mut infos = InfoTuple::with_capacity(s.language().agents_count());
        for agent in s.language().agent_ids() {
            let mut members: Vec<SignatureId> = s
                .successors(agent, world)
                .map(|w2| signatures[w2.index()].expect("successor outside universe"))
                .collect();
            members.sort_unstable();
            members.dedup();
            infos.push(store.intern_info(members.into_boxed_slice()));
        }
        next[w] = Some(store.intern_signature(s.label_of(world), infos));
    }
    next
}

fn distinct_count(signatures: &[Option<SignatureId>]) -> usize {
    let mut seen: Vec<SignatureId> = signatures.iter().filter_map(|s| *s).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Renumbers signature classes in first-occurrence order.
fn normalize(s: &State, signatures: &[Option<SignatureId>], count: usize) -> Partition {
    let mut remap: HashMap<SignatureId, u32> = HashMap::with_capacity(count);
    let mut classes: Vec<Option<u32>> = vec![None; s.worlds_count()];
    for w in s.worlds() {
        if let Some(signature) = signatures[w.index()] {
            let next = remap.len() as u32;
            classes[w.index()] = Some(*remap.entry(signature).or_insert(next));
        }
    }
    debug_assert_eq!(remap.len(), count);
    Partition::new(classes, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bisimulation::tests::{chain, singleton};
    use crate::bisimulation::{contract_canonical, contract_rooted, reachable};
    use crate::label::LabelStore;

    #[test]
    fn chain_tightness_matches_the_bound() {
        let mut labels = LabelStore::new();
        let mut store = SignatureStore::new();
        let length = 4;
        let s = chain(length, false, &mut labels);

        for k in 0..length {
            let contraction = contract_canonical(&s, k, &mut store);
            assert!(!contraction.is_true_bisimulation);
        }
        for k in length..length + 3 {
            let contraction = contract_canonical(&s, k, &mut store);
            assert!(contraction.is_true_bisimulation);
            assert_eq!(contraction.state.worlds_count(), length + 1);
        }
    }

    #[test]
    fn canonical_and_rooted_agree_on_the_quotient_width() {
        let mut labels = LabelStore::new();
        let mut store = SignatureStore::new();
        let s = chain(5, false, &mut labels);

        for k in 0..8 {
            let canonical = contract_canonical(&s, k, &mut store);
            let rooted = contract_rooted(&s, k);
            assert_eq!(canonical.state.worlds_count(), rooted.state.worlds_count());
            assert_eq!(canonical.is_true_bisimulation, rooted.is_true_bisimulation);
        }
    }

    #[test]
    fn looping_singleton_is_a_fixpoint_at_depth_one() {
        let mut labels = LabelStore::new();
        let mut store = SignatureStore::new();
        let s = singleton(true, &mut labels);

        let contraction = contract_canonical(&s, 1, &mut store);
        assert!(contraction.is_true_bisimulation);
        assert_eq!(contraction.state.worlds_count(), 1);

        let again = contract_canonical(&contraction.state, 1, &mut store);
        assert!(again.is_true_bisimulation);
        assert_eq!(again.state.worlds_count(), 1);
    }

    #[test]
    fn signature_ids_are_shared_across_states() {
        let mut labels = LabelStore::new();
        let mut store = SignatureStore::new();

        // Two separately built but identical singletons: their worlds must
        // intern to the same signature at every depth.
        let s1 = singleton(true, &mut labels);
        let s2 = singleton(true, &mut labels);

        let u1 = reachable(&s1);
        let u2 = reachable(&s2);

        let sig0_1 = {
            let label = s1.label_of(WorldId::new(0));
            store.intern_signature(label, InfoTuple::new())
        };
        let mut sigs1 = vec![Some(sig0_1)];
        let mut sigs2 = vec![Some(store.intern_signature(s2.label_of(WorldId::new(0)), InfoTuple::new()))];
        assert_eq!(sigs1, sigs2);

        for _ in 0..3 {
            sigs1 = deepen(&s1, &u1, &sigs1, &mut store);
            sigs2 = deepen(&s2, &u2, &sigs2, &mut store);
            assert_eq!(sigs1, sigs2);
        }
    }

    #[test]
    fn equal_signatures_mean_bounded_bisimilarity() {
        let mut labels = LabelStore::new();
        let mut store = SignatureStore::new();

        // In the 2-chain, worlds 0 and 1 are 1-distinguishable but
        // 0-equivalent; world 2 differs from both at depth 1.
        let s = chain(2, false, &mut labels);
        let universe = reachable(&s);
        let (partition, _) = canonical_partition(&s, &universe, 1, &mut store);

        assert_eq!(partition.count(), 2);
        assert_eq!(partition.class_of(WorldId::new(0)), partition.class_of(WorldId::new(1)));
        assert_ne!(partition.class_of(WorldId::new(0)), partition.class_of(WorldId::new(2)));
    }
}
