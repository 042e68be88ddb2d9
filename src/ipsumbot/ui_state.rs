use ipsumbot_model::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub transcript: Vec<ChatMessage>,
    pub bot_typing: bool,
    pub corpus_words: usize,
}
