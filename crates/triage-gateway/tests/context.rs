use triage_gateway::bedrock::converse_turns;
use triage_gateway::context::{ChatMessage, ChatRole, DEFAULT_TURN_CHAR_LIMIT, trim_context};

#[test]
fn short_turns_are_untouched() {
    let turns = vec![ChatMessage::user("sakit perut"), ChatMessage::assistant("Sejak kapan?")];
    assert_eq!(trim_context(&turns, DEFAULT_TURN_CHAR_LIMIT), turns);
}

#[test]
fn long_turns_are_cut_per_turn() {
    let long = "a".repeat(5_000);
    let turns = vec![ChatMessage::user(long.clone()), ChatMessage::assistant("ok")];

    let trimmed = trim_context(&turns, DEFAULT_TURN_CHAR_LIMIT);
    assert_eq!(trimmed[0].content.chars().count(), 4_000);
    assert_eq!(trimmed[0].role, ChatRole::User);
    assert_eq!(trimmed[1].content, "ok");
    // Input untouched.
    assert_eq!(turns[0].content.len(), 5_000);
}

#[test]
fn trimming_respects_char_boundaries() {
    let turns = vec![ChatMessage::user("é".repeat(10))];
    let trimmed = trim_context(&turns, 3);
    assert_eq!(trimmed[0].content, "ééé");
}

#[test]
fn converse_turns_start_with_user_and_alternate() {
    let turns = vec![
        ChatMessage::assistant("Halo, ada keluhan apa?"),
        ChatMessage::user("Batuk."),
        ChatMessage::user("Juga demam."),
        ChatMessage::assistant("Sejak kapan?"),
        ChatMessage::user("Dua hari."),
    ];

    let folded = converse_turns(&turns);
    assert_eq!(
        folded,
        vec![
            ChatMessage::user("Batuk.\n\nJuga demam."),
            ChatMessage::assistant("Sejak kapan?"),
            ChatMessage::user("Dua hari."),
        ]
    );
}

#[test]
fn converse_turns_of_nothing_is_empty() {
    assert!(converse_turns(&[]).is_empty());
    assert!(converse_turns(&[ChatMessage::assistant("hi")]).is_empty());
}
