//! Interactive chat with the career assistant.

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use skillsense::session::{MessageRole, SessionStore, StoreEvent};

const GREETING: &str = "Hey there! I'm SkillSense AI, your career assistant. \
    Ask me anything about resumes, interviews, or job prep!";

const ASSISTANT_PREFIX: &str = "assistant>";
const USER_PREFIX: &str = "you>";

/// Runs the chat loop until `/quit` or end of input. Rendering is driven by
/// store events, the same interface a graphical front end would consume.
pub async fn run(store: &SessionStore) -> Result<()> {
    store.subscribe(|event| match event {
        StoreEvent::MessageAppended(message) if message.role == MessageRole::Assistant => {
            println!("{} {}", ASSISTANT_PREFIX.cyan().bold(), message.content);
        }
        StoreEvent::ChatPendingChanged(true) => {
            println!("{}", "thinking...".dimmed());
        }
        StoreEvent::SessionReset => {
            println!("{}", "Session reset.".dimmed());
        }
        _ => {}
    });

    println!("{} {}", ASSISTANT_PREFIX.cyan().bold(), GREETING);
    println!(
        "{}",
        "Type a message; /history to review, /reset to start over, /quit to leave.".dimmed()
    );

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(&format!("{USER_PREFIX} ")) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                match line.as_str() {
                    "/quit" | "/exit" => break,
                    "/reset" => store.reset(),
                    "/history" => print_history(store),
                    _ => store.send_chat_message(&line).await,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        }
    }
    Ok(())
}

fn print_history(store: &SessionStore) {
    let transcript = store.transcript();
    if transcript.is_empty() {
        println!("{}", "No messages yet.".dimmed());
        return;
    }
    for message in &transcript {
        let prefix = match message.role {
            MessageRole::User => USER_PREFIX.green().bold(),
            MessageRole::Assistant => ASSISTANT_PREFIX.cyan().bold(),
        };
        println!("{prefix} {}", message.content);
    }
}
