//! Flow node vocabulary — prompts, replies, transitions.

use prospecto_catalog::ProgramKind;
use prospecto_core::delivery::Media;

/// Node identifier. Nodes are declared statically in `script`.
pub type NodeId = &'static str;

/// One outbound message: text, optionally with a document or image.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub media: Option<Media>,
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: None,
        }
    }

    pub fn with_media(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media: Some(Media::from_url(url.into())),
        }
    }
}

/// How a captured free-text answer is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Trim surrounding whitespace only.
    Keep,
    /// Trim and lowercase (email addresses).
    TrimLower,
}

/// What a capturing node does with the user's reply.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// Fixed-choice menu: the input must equal one of the declared
    /// options; anything else re-prompts.
    Menu {
        options: &'static [(&'static str, NodeId)],
    },

    /// Yes/no question over the normalized affirmative/negative sets.
    Confirm { yes: NodeId, no: NodeId },

    /// Faculty selection for a program kind. A valid choice persists
    /// `facultadId`, emits the faculty's program list, and parks at
    /// `next`. `0` goes to `back`.
    FacultyPick {
        kind: ProgramKind,
        choices: &'static [(&'static str, &'static str)],
        back: NodeId,
        next: NodeId,
    },

    /// Program selection by 1-based index into the stored faculty's
    /// kind partition. Emits the program detail and brochure, clears
    /// the stored faculty, and parks at `next`. `0` clears and goes to
    /// `back`; lost faculty state redirects to `back`.
    ProgramPick {
        kind: ProgramKind,
        back: NodeId,
        next: NodeId,
    },

    /// Free-text capture into the session scratch under `name`. When
    /// `allowed` is set the input must be one of the listed values; an
    /// invalid answer re-prompts without rejection copy.
    Field {
        name: &'static str,
        transform: Transform,
        allowed: Option<&'static [&'static str]>,
        next: NodeId,
    },

    /// Build the contact request from the scratch, store it, confirm
    /// with the assigned id, and end the session.
    Submit,
}

impl Reply {
    /// Every node this reply can route to. Used for graph validation.
    pub fn edges(&self) -> Vec<NodeId> {
        match self {
            Reply::Menu { options } => options.iter().map(|(_, target)| *target).collect(),
            Reply::Confirm { yes, no } => vec![yes, no],
            Reply::FacultyPick { back, next, .. } => vec![back, next],
            Reply::ProgramPick { back, next, .. } => vec![back, next],
            Reply::Field { next, .. } => vec![next],
            Reply::Submit => vec![],
        }
    }
}

/// One node of the conversation graph.
///
/// Exactly one of `reply`, `next`, `terminal` is set: a node either
/// waits for input, chains into another node after its prompt, or ends
/// the session.
#[derive(Debug, Clone)]
pub struct FlowNode {
    pub id: NodeId,
    pub prompt: Vec<Segment>,
    pub reply: Option<Reply>,
    pub next: Option<NodeId>,
    pub terminal: bool,
}

impl FlowNode {
    /// A node that emits its prompt and waits for the reply.
    pub fn ask(id: NodeId, prompt: Vec<Segment>, reply: Reply) -> Self {
        Self {
            id,
            prompt,
            reply: Some(reply),
            next: None,
            terminal: false,
        }
    }

    /// A node that emits its prompt and chains into `next`.
    pub fn tell(id: NodeId, prompt: Vec<Segment>, next: NodeId) -> Self {
        Self {
            id,
            prompt,
            reply: None,
            next: Some(next),
            terminal: false,
        }
    }

    /// A node that emits its prompt and ends the session.
    pub fn end(id: NodeId, prompt: Vec<Segment>) -> Self {
        Self {
            id,
            prompt,
            reply: None,
            next: None,
            terminal: true,
        }
    }
}
