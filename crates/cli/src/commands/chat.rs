//! `archivist chat` — interactive or single-message chat mode.

use archivist_agent::TurnEvent;
use archivist_core::message::{Message, Role, ThreadId};
use std::io::Write;
use tokio::io::{self, AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    thread: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let controller = super::build_controller(&config).await?;

    let thread_id = thread
        .map(|s| ThreadId::from(&s))
        .unwrap_or_default();

    if let Some(text) = message {
        // Single message mode
        let answer = controller.ask(thread_id, text).await?;
        println!("{answer}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Archivist — news archive assistant");
    println!("  Model:   {}", config.model);
    println!("  Session: {}", thread_id.0.chars().take(8).collect::<String>());
    println!();
    println!("  Type your question and press Enter. Type 'exit' to quit.");
    println!();

    let stdin = io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            prompt()?;
            continue;
        }
        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        let mut rx = controller.run_turn(thread_id.clone(), line);
        while let Some(event) = rx.recv().await {
            render_event(&event);
        }

        println!();
        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

fn prompt() -> Result<(), std::io::Error> {
    print!("  You > ");
    std::io::stdout().flush()
}

/// Render one turn event: tool-call announcements, tool-result
/// previews, and the final answer.
fn render_event(event: &TurnEvent) {
    match event {
        TurnEvent::Committed { message } => render_message(message),
        TurnEvent::Done { .. } => {}
        TurnEvent::Failed { error } => {
            eprintln!("  [Error] {error}");
            println!("  Something went wrong. Try another question.");
        }
    }
}

fn render_message(message: &Message) {
    match message.role {
        Role::Assistant if message.requests_tools() => {
            for call in &message.tool_calls {
                println!("  [tool] Using {} with {}", call.name, call.arguments);
            }
        }
        Role::Assistant => {
            println!();
            for line in message.content.lines() {
                println!("  Archivist > {line}");
            }
        }
        Role::Tool => {
            let preview: String = message.content.chars().take(100).collect();
            let ellipsis = if message.content.chars().count() > 100 { "..." } else { "" };
            println!("  [tool] Returned: {preview}{ellipsis}");
        }
        Role::System | Role::User => {}
    }
}
