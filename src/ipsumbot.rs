use std::time::Duration;

use ipsumbot_model::{ChatMessage, Transcript, WordDictionary};
use itertools::Itertools;
use log::{debug, error, info, warn};
use rand::Rng;

use crate::utils::ResultExt as _;
use config::Config;
use message_bus::{Event, Message, MessageBus, UiCommand};
use ui_state::UiState;

pub(crate) mod config;
pub(crate) mod message_bus;
pub(crate) mod store;
mod ui_state;

/// Reply sent when generation is impossible (empty corpus).
const FALLBACK_REPLY: &str = "Lorem ipsum.";
const FALLBACK_TYPING: Duration = Duration::from_millis(2500);

pub struct IpsumBot {
    dictionary: WordDictionary,
    transcript: Transcript,
    bot_typing: bool,
    config: Config,
    message_bus: MessageBus,
}

impl IpsumBot {
    pub fn new(
        config: Config,
        dictionary: WordDictionary,
        transcript: Transcript,
        message_bus: MessageBus,
    ) -> Self {
        info!(
            "Corpus ready: {} words (lengths: {})",
            dictionary.word_count(),
            dictionary.lengths().join(", ")
        );
        IpsumBot {
            dictionary,
            transcript,
            bot_typing: false,
            config,
            message_bus,
        }
    }

    pub async fn run(mut self, message_bus: MessageBus) {
        let mut subscription = message_bus.subscribe();
        loop {
            match subscription.recv().await {
                Some(Message::UiCommand(command @ UiCommand::CloseApplication)) => {
                    self.dispatch_ui_command(command);
                    break;
                }
                Some(Message::UiCommand(command)) => {
                    self.dispatch_ui_command(command);
                    message_bus.send(self.ui_state().into());
                }
                Some(Message::Event(event)) => {
                    self.handle_event(event);
                    message_bus.send(self.ui_state().into());
                }
                Some(Message::UiUpdate(_)) => {}
                None => break,
            }
        }
    }

    pub fn dispatch_ui_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::InitializeUi => {}
            UiCommand::SendMessage(text) => self.send_user_message(text),
            UiCommand::RebuildCorpus(text) => self.rebuild_corpus(&text),
            UiCommand::ClearTranscript => self.clear_transcript(),
            UiCommand::CloseApplication => {
                if let Err(e) = store::store_transcript(&self.transcript) {
                    error!("store_transcript failed: {}", e);
                } else {
                    info!("Transcript stored.");
                }
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::ReplyPauseElapsed(message) => self.generate_reply(&message),
            Event::BotReplyReady(message) => self.deliver_reply(message),
        }
    }

    fn send_user_message(&mut self, text: String) {
        self.transcript.push(ChatMessage::from_user(text.clone()));
        // Only respond to one message at a time.
        if !self.bot_typing {
            self.bot_typing = true;
            self.schedule_reply(text);
        }
    }

    /// Defers response generation by a short random pause, as if the bot had
    /// to read the message first.
    fn schedule_reply(&self, message: String) {
        let (min, max) = self.config.reply_pause_bounds();
        let pause = Duration::from_millis(rand::thread_rng().gen_range(min..=max));
        debug!("Reply to {message:?} deferred by {pause:?}");
        let message_bus = self.message_bus.clone();
        tokio::spawn(async move {
            tokio::time::sleep(pause).await;
            message_bus.send(Message::Event(Event::ReplyPauseElapsed(message)));
        });
    }

    fn generate_reply(&mut self, message: &str) {
        let response = match loregen::respond(message, &self.dictionary) {
            Ok(response) => response,
            Err(e) => {
                error!("Response generation failed: {e}");
                loregen::Response {
                    text: FALLBACK_REPLY.into(),
                    typing: FALLBACK_TYPING,
                }
            }
        };
        let typing = response.typing;
        let reply = ChatMessage::from_bot(response.text, typing);
        let message_bus = self.message_bus.clone();
        tokio::spawn(async move {
            tokio::time::sleep(typing).await;
            message_bus.send(Message::Event(Event::BotReplyReady(reply)));
        });
    }

    fn deliver_reply(&mut self, message: ChatMessage) {
        self.bot_typing = false;
        self.transcript.push(message);
        store::store_transcript(&self.transcript).print_err();
    }

    fn rebuild_corpus(&mut self, text: &str) {
        self.dictionary = loregen::build(text);
        info!(
            "Corpus rebuilt: {} words (lengths: {})",
            self.dictionary.word_count(),
            self.dictionary.lengths().join(", ")
        );
        if self.dictionary.is_empty() {
            warn!("Rebuilt corpus is empty; responses will fall back to {FALLBACK_REPLY:?}");
        }
        store::store_corpus(&self.config.corpus_file, &self.dictionary).print_err();
    }

    fn clear_transcript(&mut self) {
        self.transcript.clear();
        store::store_transcript(&self.transcript).print_err();
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            transcript: self.transcript.entries.clone(),
            bot_typing: self.bot_typing,
            corpus_words: self.dictionary.word_count(),
        }
    }
}
