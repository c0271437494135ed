use anyhow::{Context, Result};
use colored::*;
use explorer_orchestrator::{
    run_conversation, ConversationError, ConversationEvent, EventSink, ExplorerContext, Part,
    Transcript, Turn, GREETING,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::attachments;
use crate::output::{activity_line, format_records, print_banner, print_failure, print_response};

/// Runs a single query mode, sending one prompt and displaying the answer
pub async fn run_single_query(
    ctx: &ExplorerContext,
    prompt: &str,
    attachments: Vec<Part>,
) -> Result<()> {
    info!(prompt, attachments = attachments.len(), "Running single query");
    let mut transcript = Transcript::with_greeting(GREETING);
    submit(ctx, &mut transcript, Turn::user(prompt, attachments))
        .await
        .context("Query failed")
}

/// Runs an interactive chat session on stdin/stdout
pub async fn run_interactive_chat(ctx: &ExplorerContext, attachments: Vec<Part>) -> Result<()> {
    let mut transcript = Transcript::with_greeting(GREETING);
    let mut pending = attachments;
    print_banner(GREETING);

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Exiting chat session.");
            break;
        }
        if let Some(path) = input.strip_prefix("/attach") {
            match attachments::load(Path::new(path.trim())) {
                Ok(part) => {
                    pending.push(part);
                    println!("{}", format!("Attached {}", path.trim()).dimmed());
                }
                Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
            }
            continue;
        }

        let turn = Turn::user(input, std::mem::take(&mut pending));
        if let Err(e) = submit(ctx, &mut transcript, turn).await {
            // Already shown to the user as a friendly message
            debug!(error = %e, "Turn ended with an error");
        }
        println!();
    }

    Ok(())
}

/// Runs one turn, streaming activity and retrieved records above a spinner
async fn submit(
    ctx: &ExplorerContext,
    transcript: &mut Transcript,
    turn: Turn,
) -> Result<(), ConversationError> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let (events, mut rx) = EventSink::channel();
    let printer = {
        let spinner = spinner.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let lines = match event {
                    ConversationEvent::Activity(line) => vec![activity_line(&line)],
                    ConversationEvent::DataRetrieved(records) => format_records(&records),
                };
                spinner.suspend(|| {
                    for line in &lines {
                        println!("{}", line);
                    }
                });
            }
        })
    };

    let result = run_conversation(ctx, transcript, turn, &events).await;
    drop(events);
    if let Err(e) = printer.await {
        warn!(error = %e, "Activity printer stopped unexpectedly");
    }
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            print_response(&outcome.text);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Conversation failed");
            print_failure(e.user_message());
            Err(e)
        }
    }
}
