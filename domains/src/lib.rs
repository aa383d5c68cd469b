//! Reference domains and model builders.
//!
//! These are the external collaborators of the engine: they construct
//! languages, states, actions and planning tasks, and the end-to-end test
//! suites are written against them. Nothing here is required by the
//! planner itself.

pub mod actions;
pub mod coin_in_the_box;
pub mod consecutive_numbers;
pub mod fixtures;

use anyhow::Result;
use daedalus::Language;
use fixedbitset::FixedBitSet;

/// Builds the agent set containing the named agents.
pub fn agent_set(language: &Language, names: &[&str]) -> Result<FixedBitSet> {
    let mut set = FixedBitSet::with_capacity(language.agents_count());
    for name in names {
        set.insert(language.agent_id(name)?.index());
    }
    Ok(set)
}
