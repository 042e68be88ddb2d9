use anyhow::{Context, Result};
use axum::extract::ws::{self, WebSocket};
use axum::extract::{Json, State, WebSocketUpgrade};
use axum::response::{ErrorResponse, IntoResponse, Response};
use axum::routing::{any, post};
use axum::Router;
use futures_util::stream::{StreamExt as _, TryStreamExt as _};
use http::StatusCode;
use ipsumbot::message_bus::{Message, MessageBus, UiCommand};
use ipsumbot::{store, IpsumBot};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::signal;
use tower_http::services::ServeDir;
use utils::{print_err, unwrap_or_def_verbose};

mod ipsumbot;
mod logging;
mod utils;

struct AppState {
    message_bus: MessageBus,
}

type AppStateArg = State<Arc<AppState>>;

#[derive(Serialize)]
struct EmptyResponse;

impl IntoResponse for EmptyResponse {
    fn into_response(self) -> Response {
        serde_json::to_string(&EmptyResponse)
            .unwrap()
            .into_response()
    }
}

async fn initialize_ui(State(state): AppStateArg) -> impl IntoResponse {
    debug!("initialize_ui");
    state
        .message_bus
        .send(Message::UiCommand(UiCommand::InitializeUi));
    EmptyResponse
}

#[derive(Debug, Deserialize)]
struct SendMessageBody {
    text: String,
}
async fn send_message(
    State(state): AppStateArg,
    Json(body): Json<SendMessageBody>,
) -> axum::response::Result<EmptyResponse> {
    debug!("send_message({:?})", body);
    let text = body.text.trim().to_string();
    if text.is_empty() {
        return Err(bad_request("Empty message text"));
    }
    state
        .message_bus
        .send(Message::UiCommand(UiCommand::SendMessage(text)));
    Ok(EmptyResponse)
}

#[derive(Debug, Deserialize)]
struct RebuildCorpusBody {
    text: String,
}
async fn rebuild_corpus(State(state): AppStateArg, Json(body): Json<RebuildCorpusBody>) {
    debug!("rebuild_corpus({} bytes)", body.text.len());
    state
        .message_bus
        .send(Message::UiCommand(UiCommand::RebuildCorpus(body.text)));
}

async fn clear_transcript(State(state): AppStateArg) {
    debug!("clear_transcript()");
    state
        .message_bus
        .send(Message::UiCommand(UiCommand::ClearTranscript));
}

fn bad_request(msg: impl Display) -> ErrorResponse {
    (StatusCode::BAD_REQUEST, msg.to_string()).into()
}

async fn create_ui_event_stream(ws: WebSocketUpgrade, State(state): AppStateArg) -> Response {
    ws.on_upgrade(move |socket| ui_event_stream(socket, state.message_bus.clone()))
}

fn wrap_result<T: Serialize, E: Display>(
    r: std::result::Result<T, E>,
) -> std::result::Result<ws::Message, axum::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    enum WrappedResult<T> {
        Success(T),
        Error(String),
    }
    let wrapped_result = match r {
        Ok(data) => WrappedResult::Success(data),
        Err(e) => WrappedResult::Error(e.to_string()),
    };
    let json_text = serde_json::to_string_pretty(&wrapped_result)
        .unwrap_or_else(|e| format!("{{ \"error\": \"JSON serialization failed: {e}\" }}"));
    Ok(ws::Message::text(json_text))
}

async fn ui_event_stream(socket: WebSocket, message_bus: MessageBus) {
    debug!("ui_event_stream");
    let stream = message_bus.subscribe().ui_update_stream().map(wrap_result);
    let _ = stream.forward(socket).await.inspect_err(print_err);
}

async fn terminate_on_signal() -> Result<()> {
    let interrupt_signal: Pin<Box<dyn Future<Output = _>>> = Box::pin(async {
        signal::unix::signal(signal::unix::SignalKind::interrupt())
            .context("Failed to register terminate signal handlers!")?
            .recv()
            .await;
        Ok(())
    });
    let terminate_signal = Box::pin(async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to register terminate signal handlers!")?
            .recv()
            .await;
        Ok(())
    });
    futures_util::future::select_all([interrupt_signal, terminate_signal])
        .await
        .0
}

#[tokio::main]
async fn main() {
    logging::init();
    let config = unwrap_or_def_verbose(store::load_config());
    let dictionary = store::load_corpus(&config.corpus_file).unwrap_or_else(|e| {
        warn!("Falling back to the built-in seed corpus - {e:#}");
        store::seed_corpus()
    });
    let transcript = unwrap_or_def_verbose(store::load_transcript());
    let message_bus = MessageBus::new();
    let bot = IpsumBot::new(config.clone(), dictionary, transcript, message_bus.clone());
    let bot_task = tokio::spawn(bot.run(message_bus.clone()));

    let shared_state = Arc::new(AppState {
        message_bus: message_bus.clone(),
    });
    let app = Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/ui_stream", any(create_ui_event_stream))
                .route("/initialize_ui", post(initialize_ui))
                .route("/send_message", post(send_message))
                .route("/rebuild_corpus", post(rebuild_corpus))
                .route("/clear_transcript", post(clear_transcript))
                .with_state(shared_state),
        )
        .fallback_service(ServeDir::new(&config.static_serving_dir));
    let listener = tokio::net::TcpListener::bind(&config.serving_addr)
        .await
        .unwrap();
    tokio::spawn(async { axum::serve(listener, app).await });

    info!("Running");
    let _ = terminate_on_signal().await.inspect_err(print_err);
    info!("Terminating.");
    message_bus.send(Message::UiCommand(UiCommand::CloseApplication));

    debug!("Waiting for workers to stop...");
    let _ = bot_task.await.inspect_err(print_err);
    debug!("All workers stopped.")
}
