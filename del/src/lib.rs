//! Core engine for epistemic planning in Dynamic Epistemic Logic: Kripke
//! states and event models over a shared language, a modal-formula
//! evaluator, the product-update operator, and bounded-bisimulation
//! contraction backed by interning stores.
//!
//! The engine is single-threaded and returns values rather than logging;
//! the planner built on top lives in a separate crate.

pub mod action;
pub mod bisimulation;
pub mod error;
pub mod formula;
mod ids;
pub mod label;
pub mod language;
pub mod state;
pub mod storages;
pub mod update;

pub use action::{Action, EventId, Postconditions};
pub use bisimulation::{contract, Contraction, ContractionType};
pub use error::ValidationError;
pub use formula::{Formula, FormulaRef};
pub use label::{Label, LabelId, LabelStore};
pub use language::{AgentId, AtomId, Language};
pub use state::{AgentRelation, Relations, State, WorldId};
pub use storages::{StateId, StateStore, Storages};
pub use update::product_update;
