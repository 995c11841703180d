//! Health companion - terminal front end
//!
//! Plain lines go to the symptom checker and the reply types out as it
//! arrives. Commands: `/journal <text>`, `/checkin <physical> <mental>`,
//! `/history`, `/open <id>`, `/new`, `/retry`, `/tips`, `/emergency`, `/quit`.

use health_companion::inference::{
    CannedResponder, HttpInferenceClient, InferenceClient, LoggingClient,
};
use health_companion::reveal::RevealUpdate;
use health_companion::store::Database;
use health_companion::wellness::{tips, EMERGENCY_NOTICE};
use health_companion::{
    spawn_reveal, CompanionConfig, CompanionError, Reply, RevealHandle, SymptomChecker,
    UserIdentity, UserSession,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REVEAL_BACKLOG: usize = 1024;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they do not interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "health_companion=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = CompanionConfig::from_env();

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let inference: Arc<dyn InferenceClient> = match &config.inference_url {
        Some(url) => Arc::new(HttpInferenceClient::new(url.clone(), config.inference_timeout)?),
        None => {
            tracing::warn!("COMPANION_INFERENCE_URL not set, using offline responder");
            Arc::new(CannedResponder::new())
        }
    };
    let inference: Arc<dyn InferenceClient> = Arc::new(LoggingClient::new(inference));

    let identity = config
        .user
        .clone()
        .map_or_else(UserIdentity::anonymous, UserIdentity::named);
    let session = UserSession::sign_in(identity, Arc::new(db), inference);

    let reveal = spawn_reveal(REVEAL_BACKLOG);
    let mut checker = session.new_consultation();
    println!("Hi {}.", session.identity().greeting_name());
    print_transcript(&checker);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "/quit" => break,
            "/new" => {
                checker = session.new_consultation();
                print_transcript(&checker);
            }
            "/open" => match session.resume_consultation(rest.trim()).await {
                Ok(resumed) => {
                    checker = resumed;
                    print_transcript(&checker);
                }
                Err(e) => println!("{e}"),
            },
            "/history" => match session.consultations().await {
                Ok(chats) if chats.is_empty() => println!("No consultations yet."),
                Ok(chats) => {
                    for chat in chats {
                        println!(
                            "{}  {}  {}\n    {}",
                            chat.updated_at.format("%b %-d, %Y"),
                            chat.id,
                            chat.title,
                            chat.preview
                        );
                    }
                }
                Err(e) => println!("{e}"),
            },
            "/journal" if rest.trim().is_empty() => match session.journal().await {
                Ok(entries) => {
                    for entry in entries {
                        println!("{} [{}] {}", entry.display_date(), entry.mood, entry.content);
                    }
                }
                Err(e) => println!("{e}"),
            },
            "/journal" => match session.write_journal(rest).await {
                Ok(entry) => println!("Saved. Mood: {}", entry.mood),
                Err(e) => println!("{e}"),
            },
            "/checkin" => {
                let ratings: Vec<u8> = rest
                    .split_whitespace()
                    .filter_map(|r| r.parse().ok())
                    .collect();
                match ratings.as_slice() {
                    [physical, mental] => match session.record_checkin(*physical, *mental).await {
                        Ok(checkin) => println!("[{}] {}", checkin.mood(), checkin.guidance()),
                        Err(e) => println!("{e}"),
                    },
                    _ => println!("Usage: /checkin <physical 1-10> <mental 1-10>"),
                }
            }
            "/tips" => {
                for tip in tips::TIPS {
                    println!("* {}: {}", tip.title, tip.description);
                }
                for reminder in tips::REMINDERS {
                    println!("  {:>8}  {}", reminder.time, reminder.message);
                }
            }
            "/emergency" => {
                println!("{EMERGENCY_NOTICE}");
                match session.emergency_profile().await {
                    Ok(profile) => match profile.contact_request() {
                        Ok(contact) => println!("Contact: {} ({})", contact.name, contact.phone),
                        Err(e) => println!("{e}"),
                    },
                    Err(e) => println!("{e}"),
                }
            }
            "/retry" => {
                let reply = checker.retry().await;
                consult(&mut checker, &reveal, reply, config.reveal_speed).await;
            }
            _ => {
                let reply = checker.submit(line).await;
                consult(&mut checker, &reveal, reply, config.reveal_speed).await;
            }
        }
    }

    reveal.dispose();
    session.sign_out();
    Ok(())
}

fn print_transcript(checker: &SymptomChecker) {
    println!("== {} ==", checker.session().title());
    for message in checker.session().messages() {
        println!("{}: {}", message.sender(), message.text());
    }
}

/// Type a reply out as it reveals, then save the consultation
async fn consult(
    checker: &mut SymptomChecker,
    reveal: &RevealHandle,
    reply: Result<Reply, CompanionError>,
    speed: Duration,
) {
    let reply = match reply {
        Ok(reply) => reply,
        Err(e) => {
            println!("{e}");
            if e.is_retryable() {
                println!("Type /retry to ask again.");
            }
            return;
        }
    };

    let mut updates = reveal.subscribe();
    let completion = match checker.reveal(reveal, &reply.message_id, speed) {
        Ok(completion) => completion,
        Err(e) => {
            tracing::error!(error = %e, "Reveal unavailable");
            return;
        }
    };

    print!("assistant [{}]: ", reply.mood);
    let mut shown = 0;
    loop {
        match updates.recv().await {
            Ok(RevealUpdate::Prefix(prefix)) => {
                if let Some(new) = prefix.get(shown..) {
                    print!("{new}");
                    let _ = std::io::stdout().flush();
                }
                shown = prefix.len();
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Reveal output lagged");
            }
            Ok(RevealUpdate::Settled) | Err(RecvError::Closed) => break,
        }
    }
    println!();

    match checker.finish(&reply.message_id, completion).await {
        Ok(()) => {}
        Err(CompanionError::Reveal(e)) => {
            tracing::warn!(error = %e, message_id = %reply.message_id, "Reveal did not settle");
        }
        Err(e) => {
            tracing::error!(error = %e, chat_id = %checker.id(), "Failed to save consultation");
            println!("{e}");
        }
    }
}
