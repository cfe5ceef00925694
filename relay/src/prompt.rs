use neura_core::config::PersonaConfig;
use neura_core::types::{Content, GenerateContentRequest};
use neura_ipc::{HistoryRole, HistoryTurn};

/// Assembles the model request for one chat turn.
///
/// Order is fixed: seed user turn, seed model turn, the newest
/// `max_history_turns` replayed turns, then the caller's message.
pub fn build_request(
    persona: &PersonaConfig,
    history: &[HistoryTurn],
    message: &str,
) -> GenerateContentRequest {
    let replayed = &history[history.len().saturating_sub(persona.max_history_turns)..];

    let mut contents = Vec::with_capacity(replayed.len() + 3);
    contents.push(Content::user(persona.seed.user.as_str()));
    contents.push(Content::model(persona.seed.model.as_str()));
    contents.extend(replayed.iter().map(history_content));
    contents.push(Content::user(message));

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::system(persona.system_instruction.as_str())),
        generation_config: Some(persona.generation.into()),
    }
}

fn history_content(turn: &HistoryTurn) -> Content {
    match turn.role {
        HistoryRole::User => Content::user(turn.content.as_str()),
        HistoryRole::Assistant => Content::model(turn.content.as_str()),
    }
}
