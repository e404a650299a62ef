//! Operator decisions for ambiguous files.
//!
//! A [`DecisionProvider`] answers [`Prompt`]s synchronously; the batch waits
//! for it. [`resolve`] maps an [`Outcome`] plus the provider's answer onto a
//! [`Resolution`] for the file.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::classify::{Outcome, Policy};

/// Shape of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// Continue with the next file, or stop.
    YesNo,
    /// Save and continue, continue without saving, or stop.
    ThreeWay,
}

impl PromptKind {
    /// Answers valid for this kind of prompt.
    pub fn choices(self) -> &'static [Choice] {
        match self {
            Self::YesNo => &[Choice::Continue, Choice::Stop],
            Self::ThreeWay => &[Choice::Save, Choice::Skip, Choice::Stop],
        }
    }

    pub fn allows(self, choice: Choice) -> bool {
        self.choices().contains(&choice)
    }
}

/// An operator's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Continue,
    Save,
    Skip,
    Stop,
}

impl Choice {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Save => "save",
            Self::Skip => "skip",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question put to the operator about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub title: String,
    pub message: String,
    /// File name the prompt is about.
    pub file: String,
}

/// Errors from asking for a decision.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The provider answered with a choice the prompt does not offer.
    #[error("'{choice}' is not a valid answer to a {kind:?} prompt")]
    UnexpectedChoice { kind: PromptKind, choice: Choice },

    /// The provider could not obtain an answer.
    #[error("failed to read decision: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of operator decisions.
pub trait DecisionProvider {
    /// Ask `prompt` and block until an answer is available.
    fn ask(&mut self, prompt: &Prompt) -> Result<Choice, DecisionError>;
}

impl<T: DecisionProvider + ?Sized> DecisionProvider for &mut T {
    fn ask(&mut self, prompt: &Prompt) -> Result<Choice, DecisionError> {
        (**self).ask(prompt)
    }
}

impl<T: DecisionProvider + ?Sized> DecisionProvider for Box<T> {
    fn ask(&mut self, prompt: &Prompt) -> Result<Choice, DecisionError> {
        (**self).ask(prompt)
    }
}

/// Non-interactive provider answering every prompt of a kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecisions {
    yes_no: Choice,
    three_way: Choice,
}

impl PolicyDecisions {
    /// Provider with fixed answers per prompt kind.
    pub fn new(yes_no: Choice, three_way: Choice) -> Result<Self, DecisionError> {
        for (kind, choice) in [
            (PromptKind::YesNo, yes_no),
            (PromptKind::ThreeWay, three_way),
        ] {
            if !kind.allows(choice) {
                return Err(DecisionError::UnexpectedChoice { kind, choice });
            }
        }
        Ok(Self { yes_no, three_way })
    }

    /// Stop the batch at the first ambiguous file.
    pub fn halt_on_ambiguity() -> Self {
        Self {
            yes_no: Choice::Stop,
            three_way: Choice::Stop,
        }
    }
}

impl DecisionProvider for PolicyDecisions {
    fn ask(&mut self, prompt: &Prompt) -> Result<Choice, DecisionError> {
        let choice = match prompt.kind {
            PromptKind::YesNo => self.yes_no,
            PromptKind::ThreeWay => self.three_way,
        };
        info!(file = %prompt.file, prompt = %prompt.title, %choice, "answered by policy");
        Ok(choice)
    }
}

/// Whether an auto-filled file whose layer count changed is shown to the
/// operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticePolicy {
    /// Log a warning and carry on.
    #[default]
    Log,
    /// Ask whether to continue after saving.
    Prompt,
}

/// Final decision for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Write the reassembled file and move on.
    Save,
    /// Leave the file alone and move on.
    Skip,
    /// Leave the file alone and end the batch.
    Stop,
    /// Write the reassembled file, then end the batch.
    SaveThenStop,
}

impl Resolution {
    pub fn writes(self) -> bool {
        matches!(self, Self::Save | Self::SaveThenStop)
    }

    pub fn halts(self) -> bool {
        matches!(self, Self::Stop | Self::SaveThenStop)
    }
}

/// Apply the policy of `outcome`, asking `provider` when needed.
///
/// `counts_differ` tells whether the file's original layer count differs
/// from the schema length; it only matters for auto-filled files.
/// `build_prompt` is called at most once, with the kind of prompt required.
pub fn resolve<D, F>(
    outcome: Outcome,
    counts_differ: bool,
    notice: NoticePolicy,
    provider: &mut D,
    build_prompt: F,
) -> Result<Resolution, DecisionError>
where
    D: DecisionProvider + ?Sized,
    F: FnOnce(PromptKind) -> Prompt,
{
    let resolution = match outcome.policy() {
        Policy::AutoSave => Resolution::Save,
        Policy::Confirm => match ask(provider, build_prompt(PromptKind::YesNo))? {
            Choice::Stop => Resolution::Stop,
            _ => Resolution::Skip,
        },
        Policy::Choose => match ask(provider, build_prompt(PromptKind::ThreeWay))? {
            Choice::Save => Resolution::Save,
            Choice::Stop => Resolution::Stop,
            _ => Resolution::Skip,
        },
        Policy::SaveWithNotice => {
            if counts_differ && notice == NoticePolicy::Prompt {
                match ask(provider, build_prompt(PromptKind::YesNo))? {
                    Choice::Stop => Resolution::SaveThenStop,
                    _ => Resolution::Save,
                }
            } else {
                Resolution::Save
            }
        }
    };
    debug!(%outcome, ?resolution, "file resolved");
    Ok(resolution)
}

fn ask<D: DecisionProvider + ?Sized>(provider: &mut D, prompt: Prompt) -> Result<Choice, DecisionError> {
    let choice = provider.ask(&prompt)?;
    if !prompt.kind.allows(choice) {
        return Err(DecisionError::UnexpectedChoice {
            kind: prompt.kind,
            choice,
        });
    }
    Ok(choice)
}
