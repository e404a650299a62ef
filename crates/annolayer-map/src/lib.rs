//! Layer matching and reordering.
//!
//! The flow for one file is:
//!
//! 1. [`match_layers`] assigns records to schema slots (first match wins,
//!    earlier slots claim first) and collects the leftovers.
//! 2. [`classify`] turns the match into an [`Outcome`].
//! 3. [`resolve`] applies the outcome's policy, consulting a
//!    [`DecisionProvider`] when the operator has to decide.
//! 4. [`reorder`] or [`reorder_with_fill`] produces the new sequence:
//!    claimed records in slot order, then leftovers in their original order.
//!
//! [`swap_layers`] is the older positional variant: move named layers to
//! fixed indices and shift everything else down.

#![deny(unsafe_code)]

mod classify;
mod decision;
mod error;
mod matcher;
mod swap;
mod synthesize;

pub use classify::{FillMode, Outcome, Policy, classify};
pub use decision::{
    Choice, DecisionError, DecisionProvider, NoticePolicy, PolicyDecisions, Prompt, PromptKind,
    Resolution, resolve,
};
pub use error::{MapError, Result};
pub use matcher::{MatchResult, match_layers, reorder};
pub use swap::{LayerMove, MoveReport, MoveStatus, SwapResult, moves_from_lists, swap_layers};
pub use synthesize::{
    IdPool, PlaceholderPayload, Reassembled, SynthesizedLayer, reorder_with_fill, synthesize,
};
