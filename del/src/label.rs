use crate::ids::dense_id;
use crate::language::AtomId;
use fixedbitset::FixedBitSet;
use hashbrown::HashMap;

dense_id!(
    /// Identifier of an interned label.
    LabelId
);

/// Propositional valuation of a single world: one bit per atom of the
/// language.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Label {
    bits: FixedBitSet,
}

impl Label {
    /// All-false valuation over `atoms_count` atoms.
    pub fn new(atoms_count: usize) -> Self {
        Label {
            bits: FixedBitSet::with_capacity(atoms_count),
        }
    }

    pub fn with_true_atoms(atoms_count: usize, atoms: impl IntoIterator<Item = AtomId>) -> Self {
        let mut label = Label::new(atoms_count);
        for atom in atoms {
            label.set(atom, true);
        }
        label
    }

    pub fn atoms_count(&self) -> usize {
        self.bits.len()
    }

    pub fn contains(&self, atom: AtomId) -> bool {
        self.bits.contains(atom.index())
    }

    pub fn set(&mut self, atom: AtomId, value: bool) {
        self.bits.set(atom.index(), value);
    }

    /// Atoms that are true under this valuation, in ascending id order.
    pub fn true_atoms(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.bits.ones().map(AtomId::new)
    }
}

/// Process-lifetime interning table for labels.
///
/// Two worlds with the same valuation share one `LabelId`, in this state or
/// any other drawn from the same store. Entries are never evicted.
#[derive(Default, Clone)]
pub struct LabelStore {
    labels: Vec<Label>,
    index: HashMap<Label, LabelId>,
}

impl LabelStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn intern(&mut self, label: Label) -> LabelId {
        if let Some(&id) = self.index.get(&label) {
            return id;
        }
        let id = LabelId::new(self.labels.len());
        self.index.insert(label.clone(), id);
        self.labels.push(label);
        id
    }

    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id]
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
