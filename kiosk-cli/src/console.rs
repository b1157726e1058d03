//! The interactive terminal loop.

use std::fmt::Write as _;

use kiosk_rag::{KioskAssistant, QueryResult, RagError, error_page, truncate_chars};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::error;

const PREVIEW_CHARS: usize = 300;
const SEPARATOR: &str = "────────────────────────────────────────────────────────";

/// `exit` or `quit`, in any case.
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// A `y`/`yes` answer to the sources prompt.
pub fn wants_sources(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("y") || line.eq_ignore_ascii_case("yes")
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` when cut.
pub fn preview(text: &str) -> String {
    let head = truncate_chars(text, PREVIEW_CHARS);
    if head.len() < text.len() { format!("{head}...") } else { head.to_string() }
}

/// One block per source: id, score and a text preview.
pub fn format_sources(sources: &[QueryResult]) -> String {
    let mut out = String::from("Sources:\n");
    for (i, source) in sources.iter().enumerate() {
        let _ = write!(
            out,
            "\n{}. {} (score: {:.4})\n{}\n",
            i + 1,
            source.id,
            source.score,
            preview(&source.text)
        );
    }
    out
}

/// Log a failed query and render it as a `# Error` page.
pub fn failure_message(error: &RagError) -> String {
    error!(error = %error, "query failed");
    error_page(error)
}

/// Read queries until `exit`, `quit`, Ctrl-C or Ctrl-D.
pub async fn run_console(assistant: &KioskAssistant) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("Kiosk assistant terminal");
    println!("Type 'exit' or 'quit' to leave.");

    loop {
        let line = match editor.readline("\nQuestion: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit_command(query) {
            break;
        }
        let _ = editor.add_history_entry(query);

        let answer = match assistant.ask(query).await {
            Ok(answer) => answer,
            Err(e) => {
                println!("\n{}", failure_message(&e));
                continue;
            }
        };

        if answer.sources.is_empty() {
            println!("No relevant information found.");
            continue;
        }

        println!("\n{SEPARATOR}\n{}\n{SEPARATOR}", answer.text);

        match editor.readline("\nShow sources? (y/n): ") {
            Ok(reply) if wants_sources(&reply) => println!("\n{}", format_sources(&answer.sources)),
            Ok(_) => {}
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye.");
    Ok(())
}
