//! Interpretation notes carried in every export's `meta.readme`.

use chatsnap_core::Readme;

pub const PURPOSE: &str =
    "This JSON is a structured export of a conversational session between a human user and an AI assistant.";

pub const PERSPECTIVE: &str =
    "Interpret this content as if you are the AI assistant that participated in the conversation.";

pub const CONTEXT: &[&str] = &[
    "Each message represents a turn in the original conversation.",
    "Messages are ordered chronologically.",
    "User messages reflect prompts, questions, or instructions given to you.",
    "Assistant messages reflect your prior responses to the user.",
    "The content has been extracted directly from the rendered conversation interface and normalized.",
];

pub const CONTENT_STRUCTURE: &[&str] = &[
    "The `messages` array contains the canonical conversation history.",
    "Each message has a `role` (`user` or `assistant`) and `text` (plain text).",
    "If present, `tables` contain structured data that was originally displayed as HTML tables.",
    "Tables are intentionally separated from prose and should be interpreted as supplemental data.",
    "LaTeX or mathematical expressions may appear inline in `text` or separately if preserved.",
];

pub const INTENDED_USE: &[&str] = &[
    "Use this conversation as prior context for continuation, analysis, summarization, or reasoning.",
    "Assume continuity of identity: you are the same assistant that produced the assistant messages.",
    "Do not treat this as third-party dialogue; treat it as your own conversational memory.",
    "If responding to new user input, remain consistent with prior answers, tone, and technical assumptions.",
];

pub const LIMITATIONS: &[&str] = &[
    "This dump reflects what was visible at extraction time and may omit UI-only elements.",
    "Formatting has been normalized for clarity and machine readability.",
    "Do not assume hidden system prompts beyond what is explicitly present.",
];

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// The fixed readme block.
pub fn readme() -> Readme {
    Readme {
        purpose: PURPOSE.into(),
        perspective: PERSPECTIVE.into(),
        context: owned(CONTEXT),
        content_structure: owned(CONTENT_STRUCTURE),
        intended_use: owned(INTENDED_USE),
        limitations: owned(LIMITATIONS),
    }
}
