//! Greeter Demo
//!
//! A small Hearken bot driven by a scripted, in-memory Slack connection.
//! Every reply is recorded instead of being sent, and printed at the end.
//!
//! # Routes
//!
//! Routes are evaluated in registration order; the first match wins:
//!
//! ```text
//! 0. (?i)how are you(.*)   → reply with typing
//! 1. (?i)^status$          → reply with an attachment
//! 2. (?i)\bhello\b         → reply in thread
//! 3. any reaction          → log direction and emoji
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package greeter
//! cargo run --package greeter -- --mode socket-mode --debug
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hearken::core::{AttachmentField, ReactionItem};
use hearken::prelude::*;
use hearken::runtime::ConfigLoader;
use hearken::slack::{RecordingApi, RtmEvent, SocketModeEvent};
use serde_json::{Value, json};
use tokio::sync::mpsc;

const BOT_USER: &str = "UGREETER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Rtm,
    SocketMode,
}

#[derive(Debug, Parser)]
#[command(name = "greeter", about = "Replay a scripted Slack conversation through Hearken")]
struct Args {
    /// Transport to simulate.
    #[arg(long, value_enum, default_value_t = Mode::Rtm)]
    mode: Mode,

    /// Configuration file to load instead of searching for hearken.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mark every context as debug and log each event type.
    #[arg(long)]
    debug: bool,

    /// Skip typing delays.
    #[arg(long)]
    no_typing: bool,
}

// ============================================================================
// Handlers
// ============================================================================

async fn how_are_you(ctx: Context, bot: Arc<Bot>, msg: Arc<MessageEvent>) -> HandlerResult {
    let rest = ctx
        .captures()
        .and_then(|c| c.get(1).map(str::trim).map(str::to_owned))
        .unwrap_or_default();
    if ctx.is_debug() {
        debug!(rest = %rest, message_type = ?ctx.message_type(), "Matched how-are-you");
    }

    bot.reply(&msg, "A bit tired. You get it? A bit?", Typing::With)
        .await?;
    Ok(())
}

async fn status(ctx: Context, bot: Arc<Bot>, msg: Arc<MessageEvent>) -> HandlerResult {
    let kind = ctx
        .message_type()
        .map_or("unknown", |t| t.as_str())
        .to_string();
    let attachment = Attachment::text("All systems nominal.")
        .with_title("Greeter status")
        .with_color("good")
        .with_field(AttachmentField {
            title: "Conversation".into(),
            value: kind,
            short: true,
        })
        .with_field(AttachmentField {
            title: "Bot".into(),
            value: bot.user_id().unwrap_or("unknown").to_string(),
            short: true,
        });

    bot.reply_with_attachments(&msg, vec![attachment], Typing::Without)
        .await?;
    Ok(())
}

async fn hello(_ctx: Context, bot: Arc<Bot>, msg: Arc<MessageEvent>) -> HandlerResult {
    let greeting = format!("Hello <@{}>!", msg.user);
    bot.reply_in_thread(&msg, greeting, Typing::Without).await?;
    Ok(())
}

async fn reaction_logger(
    _ctx: Context,
    _bot: Arc<Bot>,
    reaction: Arc<ReactionEvent>,
) -> HandlerResult {
    let ReactionItem {
        channel, timestamp, ..
    } = &reaction.item;
    info!(
        direction = %reaction.direction,
        emoji = %reaction.reaction,
        user = %reaction.user,
        channel = %channel,
        ts = %timestamp,
        "Reaction observed"
    );
    Ok(())
}

// ============================================================================
// Scripted conversation
// ============================================================================

fn message(user: &str, text: &str, ts: &str) -> Value {
    json!({
        "type": "message",
        "channel": "C0GENERAL",
        "channel_type": "channel",
        "user": user,
        "text": text,
        "ts": ts,
    })
}

fn reaction(kind: &str, emoji: &str) -> Value {
    json!({
        "type": kind,
        "user": "U0ALICE",
        "item_user": BOT_USER,
        "reaction": emoji,
        "item": { "type": "message", "channel": "C0GENERAL", "ts": "1700000000.000200" },
        "event_ts": "1700000005.000100",
    })
}

/// Inner events shared by both transports, in delivery order.
fn script() -> Vec<Value> {
    vec![
        message("U0ALICE", "Hey greeter, how are you today?", "1700000000.000100"),
        message("U0ALICE", "status", "1700000001.000100"),
        message("U0BOB", "hello everyone", "1700000002.000100"),
        // Ignored: the bot's own message.
        message(BOT_USER, "how are you", "1700000003.000100"),
        // Ignored: an edit.
        json!({
            "type": "message",
            "subtype": "message_changed",
            "channel": "C0GENERAL",
            "ts": "1700000004.000100",
        }),
        message("U0BOB", "nothing to see here", "1700000004.000200"),
        reaction("reaction_added", "wave"),
        reaction("reaction_removed", "wave"),
    ]
}

fn connect_info() -> hearken::core::ConnectInfo {
    hearken::core::ConnectInfo {
        user_id: BOT_USER.into(),
        user_name: "greeter".into(),
        team_id: "T0DEMO".into(),
    }
}

fn rtm_connection() -> Result<Connection> {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(RtmEvent::Connected(connect_info()))?;
    tx.send(RtmEvent::decode(r#"{"type":"hello"}"#))?;
    for event in script() {
        tx.send(RtmEvent::decode(&event.to_string()))?;
    }
    Ok(Connection::rtm(rx))
}

fn socket_mode_connection(api: Arc<RecordingApi>) -> Result<Connection> {
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SocketModeEvent::Connecting)?;
    tx.send(SocketModeEvent::Connected(connect_info()))?;
    tx.send(SocketModeEvent::decode(r#"{"type":"hello","num_connections":1}"#))?;
    for (i, event) in script().into_iter().enumerate() {
        let envelope = json!({
            "type": "events_api",
            "envelope_id": format!("env-{i}"),
            "payload": {
                "type": "event_callback",
                "team_id": "T0DEMO",
                "event_id": format!("Ev{i:04}"),
                "event": event,
            },
        });
        tx.send(SocketModeEvent::decode(&envelope.to_string()))?;
    }
    Ok(Connection::socket_mode(rx, api))
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_current_dir();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let mut config = loader.load()?;
    config.bot.debug |= args.debug;
    config.bot.event_mode = match args.mode {
        Mode::Rtm => hearken::runtime::EventMode::Rtm,
        Mode::SocketMode => hearken::runtime::EventMode::SocketMode,
    };
    if args.no_typing {
        config.typing.max_delay_ms = 0;
    }

    let mut runtime = HearkenRuntime::from_config(&config);
    runtime.hear("(?i)how are you(.*)")?.message_handler(how_are_you);
    runtime.hear("(?i)^status$")?.message_handler(status);
    runtime.hear(r"(?i)\bhello\b")?.message_handler(hello);
    runtime.on_reaction().reaction_handler(reaction_logger);

    let api = Arc::new(RecordingApi::new());
    let connection = match args.mode {
        Mode::Rtm => rtm_connection()?,
        Mode::SocketMode => socket_mode_connection(Arc::clone(&api))?,
    };

    let exit = runtime.run(api.clone(), connection).await?;
    info!(?exit, "Conversation replayed");

    for call in api.calls() {
        println!("{call:?}");
    }

    Ok(())
}
