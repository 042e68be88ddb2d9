use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod dictionary;

pub use dictionary::{CorpusError, WordDictionary};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Sender {
    User,
    Bot,
}

impl Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,

    /// Simulated typing time before the text is revealed. Bot entries only,
    /// milliseconds on the wire.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(serialize_with = "serialize_opt_millis")]
    #[serde(deserialize_with = "deserialize_opt_millis")]
    pub typing: Option<Duration>,
}

impl ChatMessage {
    pub fn from_user(text: impl Into<String>) -> Self {
        ChatMessage {
            sender: Sender::User,
            text: text.into(),
            timestamp: Local::now(),
            typing: None,
        }
    }

    pub fn from_bot(text: impl Into<String>, typing: Duration) -> Self {
        ChatMessage {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Local::now(),
            typing: Some(typing),
        }
    }
}

fn serialize_opt_millis<S: Serializer>(typing: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    typing.map(|d| d.as_millis() as u64).serialize(s)
}

fn deserialize_opt_millis<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = Option::<u64>::deserialize(d)?;
    Ok(millis.map(Duration::from_millis))
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub entries: Vec<ChatMessage>,
}

impl Transcript {
    pub fn push(&mut self, message: ChatMessage) {
        self.entries.push(message);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
