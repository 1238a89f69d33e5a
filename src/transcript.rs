//! Transcript view model — partitions a session's raw message stream
//! into the groups the detail sheet renders.
//!
//! IVR navigation collapses into one group, the first IVR summary becomes
//! an outcome banner, transfer events become distinct banners, and the
//! conversational turns alternate sides by speaker role.

use serde::{Deserialize, Serialize};

use crate::models::{MessageKind, MessageRole, TranscriptMessage};

/// Which side of the thread a turn renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnSide {
    Left,
    Right,
    Center,
}

impl TurnSide {
    fn for_role(role: MessageRole) -> Self {
        match role {
            MessageRole::Assistant => Self::Left,
            MessageRole::User => Self::Right,
            MessageRole::System => Self::Center,
        }
    }
}

/// One conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub side: TurnSide,
    pub content: String,
    pub timestamp: String,
}

/// How the IVR navigation phase ended, read off the summary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvrOutcome {
    Completed,
    Failed,
    Unknown,
}

/// Banner for the IVR phase: outcome plus the summary text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IvrSummary {
    pub outcome: IvrOutcome,
    pub content: String,
}

/// A transcript partitioned for rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptView {
    /// IVR navigation steps, rendered as one collapsible group.
    pub ivr_steps: Vec<TranscriptMessage>,
    /// First summary message, if the IVR phase reported one.
    pub ivr_summary: Option<IvrSummary>,
    /// Transfer events, each rendered as a distinct banner.
    pub transfers: Vec<TranscriptMessage>,
    /// The conversational turn sequence.
    pub turns: Vec<Turn>,
}

impl TranscriptView {
    pub fn is_empty(&self) -> bool {
        self.ivr_steps.is_empty()
            && self.ivr_summary.is_none()
            && self.transfers.is_empty()
            && self.turns.is_empty()
    }
}

fn classify_outcome(content: &str) -> IvrOutcome {
    let lower = content.to_lowercase();
    if ["fail", "error", "unable", "could not"].iter().any(|s| lower.contains(s)) {
        IvrOutcome::Failed
    } else if ["complete", "success", "reached"].iter().any(|s| lower.contains(s)) {
        IvrOutcome::Completed
    } else {
        IvrOutcome::Unknown
    }
}

/// Partition a message stream into the rendering groups.
pub fn partition_transcript(messages: &[TranscriptMessage]) -> TranscriptView {
    let mut view = TranscriptView::default();

    for message in messages {
        match message.kind {
            MessageKind::Ivr | MessageKind::IvrAction => {
                view.ivr_steps.push(message.clone());
            }
            MessageKind::IvrSummary => {
                if view.ivr_summary.is_none() {
                    view.ivr_summary = Some(IvrSummary {
                        outcome: classify_outcome(&message.content),
                        content: message.content.clone(),
                    });
                }
            }
            MessageKind::Transfer => {
                view.transfers.push(message.clone());
            }
            MessageKind::Transcript => {
                view.turns.push(Turn {
                    role: message.role,
                    side: TurnSide::for_role(message.role),
                    content: message.content.clone(),
                    timestamp: message.timestamp.clone(),
                });
            }
        }
    }

    view
}
