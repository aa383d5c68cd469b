//! Partition-refinement contraction.
//!
//! `full_partition` refines to the coarsest stable partition with a
//! splitter queue; `bounded_partition` refines round by round up to a
//! depth bound, where the partition after round `h` equates worlds exactly
//! when they are `h`-bisimilar.

use super::Partition;
use crate::state::{State, WorldId};
use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use std::collections::VecDeque;

/// Coarsest stable partition of the whole model, starting from label
/// equality. Designated worlds play no role here.
pub(crate) fn full_partition(s: &State) -> Partition {
    let n = s.worlds_count();

    // Initial blocks by label, in first-occurrence order.
    let mut block_of_label: HashMap<crate::label::LabelId, usize> = HashMap::new();
    let mut blocks: Vec<FixedBitSet> = Vec::new();
    let mut class: Vec<u32> = vec![0; n];
    for w in s.worlds() {
        let next = blocks.len();
        let b = *block_of_label.entry(s.label_of(w)).or_insert(next);
        if b == blocks.len() {
            blocks.push(FixedBitSet::with_capacity(n));
        }
        blocks[b].insert(w.index());
        class[w.index()] = b as u32;
    }

    // Predecessor sets per agent, for computing pre-images of splitters.
    let mut predecessors: Vec<Vec<FixedBitSet>> = Vec::with_capacity(s.language().agents_count());
    for agent in s.language().agent_ids() {
        let mut pred = vec![FixedBitSet::with_capacity(n); n];
        for w in s.worlds() {
            for w2 in s.successors(agent, w) {
                pred[w2.index()].insert(w.index());
            }
        }
        predecessors.push(pred);
    }

    let mut queue: VecDeque<usize> = (0..blocks.len()).collect();
    let mut queued: Vec<bool> = vec![true; blocks.len()];

    while let Some(b) = queue.pop_front() {
        queued[b] = false;
        let splitter = blocks[b].clone();

        for pred in &predecessors {
            // Worlds with at least one successor inside the splitter.
            let mut pre = FixedBitSet::with_capacity(n);
            for target in splitter.ones() {
                pre.union_with(&pred[target]);
            }

            for c in 0..blocks.len() {
                let mut inside = blocks[c].clone();
                inside.intersect_with(&pre);
                if inside.is_clear() || inside == blocks[c] {
                    continue;
                }

                // Split c: keep the part intersecting the pre-image, move
                // the rest to a fresh block.
                let mut outside = blocks[c].clone();
                outside.difference_with(&pre);
                let fresh = blocks.len();
                for w in outside.ones() {
                    class[w] = fresh as u32;
                }
                blocks[c] = inside;
                blocks.push(outside);

                queued.push(true);
                queue.push_back(fresh);
                if !queued[c] {
                    queued[c] = true;
                    queue.push_back(c);
                }
            }
        }
    }

    tracing::trace!(worlds = n, blocks = blocks.len(), "full refinement done");
    normalize(s, |w| Some(class[w.index()]))
}

/// Refines the worlds of `universe` for at most `bound` rounds, then
/// probes one extra round to decide whether the partition is already a
/// true bisimulation.
pub(crate) fn bounded_partition(
    s: &State,
    universe: &FixedBitSet,
    bound: usize,
) -> (Partition, bool) {
    // Round 0: label equality.
    let mut label_class: HashMap<crate::label::LabelId, u32> = HashMap::new();
    let mut classes: Vec<Option<u32>> = vec![None; s.worlds_count()];
    for w in universe.ones() {
        let next = label_class.len() as u32;
        let class = *label_class.entry(s.label_of(WorldId::new(w))).or_insert(next);
        classes[w] = Some(class);
    }
    let mut count = label_class.len();

    let mut stable = false;
    for round in 1..=bound {
        let (next, next_count) = refine_round(s, universe, &classes);
        if next_count == count {
            stable = true;
            tracing::trace!(round, blocks = count, "bounded refinement stabilized");
            break;
        }
        classes = next;
        count = next_count;
    }

    if !stable {
        // One probe round: a stable partition cannot split further.
        let (_, probe_count) = refine_round(s, universe, &classes);
        stable = probe_count == count;
    }

    (Partition::new(classes, count), stable)
}

/// One refinement round: worlds stay together iff they were together and
/// have the same set of successor classes for every agent.
fn refine_round(
    s: &State,
    universe: &FixedBitSet,
    classes: &[Option<u32>],
) -> (Vec<Option<u32>>, usize) {
    type Key = (u32, Vec<Vec<u32>>);
    let mut index: HashMap<Key, u32> = HashMap::new();
    let mut next: Vec<Option<u32>> = vec![None; s.worlds_count()];

    for w in universe.ones() {
        let world = WorldId::new(w);
        let mut per_agent = Vec::with_capacity(s.language().agents_count());
        for agent in s.language().agent_ids() {
            let mut successor_classes: Vec<u32> = s
                .successors(agent, world)
                .map(|w2| classes[w2.index()].expect("successor outside universe"))
                .collect();
            successor_classes.sort_unstable();
            successor_classes.dedup();
            per_agent.push(successor_classes);
        }

        let key = (classes[w].expect("world outside universe"), per_agent);
        let fresh = index.len() as u32;
        next[w] = Some(*index.entry(key).or_insert(fresh));
    }

    let count = index.len();
    (next, count)
}

/// Renumbers classes in first-occurrence order over ascending world ids.
fn normalize(s: &State, class_of: impl Fn(WorldId) -> Option<u32>) -> Partition {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut classes: Vec<Option<u32>> = vec![None; s.worlds_count()];
    for w in s.worlds() {
        if let Some(raw) = class_of(w) {
            let next = remap.len() as u32;
            classes[w.index()] = Some(*remap.entry(raw).or_insert(next));
        }
    }
    let count = remap.len();
    Partition::new(classes, count)
}
