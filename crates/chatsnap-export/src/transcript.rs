//! Plain-text transcript framed as prior-conversation context.

use chatsnap_core::Turn;

const PREAMBLE: &[&str] = &[
    "SYSTEM CONTEXT — PRIOR CONVERSATION",
    "",
    "The following is a complete transcript of a prior conversation between a human user and you (the AI assistant).",
    "",
    "This transcript is provided as conversational context, not as data for analysis.",
    "Assume continuity of identity: you are the same assistant that authored the assistant messages below.",
    "Treat all assistant messages as your own prior responses.",
    "Do not explain, summarize, or comment on the structure unless explicitly asked.",
    "Use this solely as context and continue naturally from the last user message.",
    "",
    "BEGIN CONVERSATION",
];

const CLOSING: &[&str] = &[
    "",
    "END CONVERSATION",
    "",
    "The user will now continue the conversation below.",
];

/// Render turns as a transcript.
///
/// Each turn becomes a blank line, `ROLE:` and its text verbatim. Tables are
/// never rendered.
pub fn build_context_transcript(turns: &[Turn]) -> String {
    let mut lines: Vec<String> = PREAMBLE.iter().map(|s| s.to_string()).collect();

    for turn in turns {
        lines.push(String::new());
        lines.push(format!("{}:", turn.role.name().to_uppercase()));
        lines.push(turn.text.clone());
    }

    lines.extend(CLOSING.iter().map(|s| s.to_string()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsnap_core::Role;

    fn turn(role: Role, text: &str) -> Turn {
        Turn {
            role,
            id: None,
            text: text.into(),
            tables: None,
        }
    }

    #[test]
    fn test_empty_conversation_keeps_framing() {
        let transcript = build_context_transcript(&[]);
        assert!(transcript.starts_with("SYSTEM CONTEXT — PRIOR CONVERSATION\n"));
        assert!(transcript.contains("BEGIN CONVERSATION\n\nEND CONVERSATION"));
        assert!(transcript.ends_with("The user will now continue the conversation below."));
    }

    #[test]
    fn test_one_role_line_per_turn_in_order() {
        let turns = vec![
            turn(Role::User, "Hello"),
            turn(Role::Assistant, "Hi there"),
            turn(Role::User, "Bye"),
        ];
        let transcript = build_context_transcript(&turns);

        let role_lines: Vec<&str> = transcript
            .lines()
            .filter(|l| *l == "USER:" || *l == "ASSISTANT:")
            .collect();
        assert_eq!(role_lines, vec!["USER:", "ASSISTANT:", "USER:"]);
        assert!(transcript.contains("BEGIN CONVERSATION\n\nUSER:\nHello\n\nASSISTANT:\nHi there\n\nUSER:\nBye\n\nEND CONVERSATION"));
    }

    #[test]
    fn test_tables_not_rendered() {
        let mut reply = turn(Role::Assistant, "See table");
        reply.tables = Some(vec![vec![vec!["SECRET_CELL".into()]]]);
        let transcript = build_context_transcript(&[reply]);
        assert!(transcript.contains("ASSISTANT:\nSee table"));
        assert!(!transcript.contains("SECRET_CELL"));
    }

    #[test]
    fn test_multiline_text_verbatim() {
        let transcript = build_context_transcript(&[turn(Role::Assistant, "a\n\nb")]);
        assert!(transcript.contains("ASSISTANT:\na\n\nb\n\nEND CONVERSATION"));
    }
}
