//! Lectern terminal front end.
//!
//! Renders conversation snapshots and drives the one-shot study endpoints.
//! All protocol and state logic lives in `lectern-core`/`lectern-client`;
//! this binary only reads input and prints.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lectern_client::ApiClient;
use lectern_core::{drive_exchange, ChatMessage, ChatRole, Conversation};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Terminal client for the AI Learning Assistant backend")]
struct Cli {
    /// Backend base URL (defaults to $LECTERN_API_URL, then localhost:8000)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List processed study sessions
    Sessions,
    /// Chat interactively against a session
    Chat {
        session_id: String,
    },
    /// Print stored chat history for a session
    History {
        session_id: String,
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
    /// Generate and print flashcards for a session
    Flashcards {
        session_id: String,
        #[arg(short, long, default_value = "12")]
        count: u32,
    },
    /// Generate a quiz and answer it interactively
    Quiz {
        session_id: String,
        #[arg(short, long, default_value = "8")]
        count: u32,
    },
    /// Ingest a video URL into a new session
    IngestVideo {
        url: String,
    },
    /// Ingest a PDF file into a new session
    IngestPdf {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let base_url = cli
        .api_url
        .or_else(|| std::env::var("LECTERN_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());
    let client = ApiClient::new(&base_url);

    match cli.command {
        Commands::Sessions => list_sessions(&client).await,
        Commands::Chat { session_id } => chat(&client, &session_id).await,
        Commands::History { session_id, limit } => history(&client, &session_id, limit).await,
        Commands::Flashcards { session_id, count } => {
            flashcards(&client, &session_id, count).await
        }
        Commands::Quiz { session_id, count } => quiz(&client, &session_id, count).await,
        Commands::IngestVideo { url } => ingest_video(&client, &url).await,
        Commands::IngestPdf { path } => ingest_pdf(&client, &path).await,
    }
}

async fn list_sessions(client: &ApiClient) -> Result<()> {
    let sessions = client.sessions().await?;
    if sessions.is_empty() {
        println!("No sessions yet. Ingest a video or PDF first.");
        return Ok(());
    }
    for session in sessions {
        println!("{}  [{}] {}", session.id, session.source_type, session.title);
    }
    Ok(())
}

async fn chat(client: &ApiClient, session_id: &str) -> Result<()> {
    let history = match client.chat_history(session_id, 20).await {
        Ok(history) => history.into_messages(),
        Err(e) => {
            log::warn!("could not load history: {e}");
            Vec::new()
        }
    };
    for message in &history {
        print_message(message);
    }

    let mut conversation = Conversation::with_history(history);
    println!("Chatting with session {session_id}. Enter sends, /quit exits.");

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim().to_string();
        if text.is_empty() {
            continue;
        }
        if text == "/quit" {
            break;
        }
        if conversation.submit(&text).is_none() {
            continue;
        }

        match client.open_chat_stream(session_id, &text).await {
            Ok(events) => {
                // Print only what arrived since the last snapshot; a
                // replaced message (error rendering) restarts the line.
                let mut shown = String::new();
                drive_exchange(&mut conversation, events, |c| {
                    let snapshot = c.snapshot();
                    let Some(last) = snapshot.last() else { return };
                    if last.role != ChatRole::Assistant {
                        return;
                    }
                    if let Some(delta) = last.content.strip_prefix(shown.as_str()) {
                        print!("{delta}");
                    } else {
                        print!("\n{}", last.content);
                    }
                    shown = last.content.clone();
                    let _ = io::stdout().flush();
                })
                .await;
                println!();
            }
            Err(e) => {
                log::warn!("chat request failed: {e}");
                conversation.on_transport_failure();
                if let Some(last) = conversation.snapshot().last() {
                    println!("{}", last.content);
                }
            }
        }
    }
    Ok(())
}

async fn history(client: &ApiClient, session_id: &str, limit: u32) -> Result<()> {
    let history = client.chat_history(session_id, limit).await?;
    for message in history.into_messages() {
        print_message(&message);
    }
    Ok(())
}

async fn flashcards(client: &ApiClient, session_id: &str, count: u32) -> Result<()> {
    let set = client.generate_flashcards(session_id, count).await?;
    if let Some(title) = &set.session_title {
        println!("Flashcards for {title}:");
    }
    for (i, card) in set.flashcards.iter().enumerate() {
        println!("\nCard {}:", i + 1);
        println!("  Q: {}", card.front);
        println!("  A: {}", card.back);
    }
    Ok(())
}

async fn quiz(client: &ApiClient, session_id: &str, count: u32) -> Result<()> {
    let generated = client.generate_quiz(session_id, count).await?;
    if let Some(title) = &generated.session_title {
        println!("Quiz for {title}: {} questions", generated.questions.len());
    }

    // Generation responses omit question ids; re-fetch the stored quiz so
    // answers can be evaluated.
    let quiz = client.quiz(session_id).await?;

    let stdin = io::stdin();
    let mut score = 0u32;
    let mut answered = 0u32;

    for (i, question) in quiz.questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, question.question);
        for (j, option) in question.options.iter().enumerate() {
            println!("   {}) {}", option_letter(j), option);
        }
        let Some(question_id) = question.id.as_deref() else {
            continue;
        };

        print!("answer> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let selected = line
            .trim()
            .chars()
            .next()
            .and_then(|c| (c.to_ascii_lowercase() as u8).checked_sub(b'a'))
            .map(usize::from)
            .filter(|&s| s < question.options.len());
        let Some(selected) = selected else {
            println!("skipped");
            continue;
        };

        let verdict = client
            .evaluate_answer(session_id, question_id, selected)
            .await?;
        answered += 1;
        if verdict.is_correct {
            score += 1;
            println!("correct!");
        } else {
            println!(
                "wrong, correct answer: {})",
                option_letter(verdict.correct_answer)
            );
        }
        if !verdict.explanation.is_empty() {
            println!("{}", verdict.explanation);
        }
    }

    println!("\nScore: {score}/{answered}");
    Ok(())
}

async fn ingest_video(client: &ApiClient, url: &str) -> Result<()> {
    println!("Processing video...");
    let result = client.process_video(url).await?;
    print_process_result(&result);
    Ok(())
}

async fn ingest_pdf(client: &ApiClient, path: &PathBuf) -> Result<()> {
    println!("Uploading {}...", path.display());
    let result = client.process_pdf(path).await?;
    print_process_result(&result);
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let speaker = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
    };
    println!("{speaker}: {}", message.content);
}

fn print_process_result(result: &lectern_client::types::ProcessResult) {
    println!("{}", result.message);
    println!("  session: {}", result.session_id);
    println!("  title:   {}", result.title);
    println!(
        "  size:    {} words in {} chunks",
        result.word_count, result.chunk_count
    );
}

fn option_letter(index: usize) -> char {
    (b'a' + (index as u8).min(25)) as char
}
