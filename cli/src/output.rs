use colored::*;
use explorer_vndb::Record;
use pulldown_cmark::{Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};

/// Print the model's answer, rendering its markdown for the terminal
pub fn print_response(response: &str) {
    println!("{}: {}", "Assistant".blue().bold(), render_markdown(response).trim_end());
}

/// Print a failed turn's user-facing message
pub fn print_failure(message: &str) {
    println!("{}: {}", "Assistant".blue().bold(), message.red());
}

pub fn activity_line(line: &str) -> String {
    format!("  {} {}", "›".dimmed(), line.dimmed())
}

/// One line per retrieved record: kind, ID, label and cover/portrait URL
pub fn format_records(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let mut line = format!(
                "  {} {} {}",
                format!("[{}]", record.kind.endpoint()).cyan(),
                record.id().unwrap_or("?").bold(),
                record.label().unwrap_or_default()
            );
            if let Some(url) = record.image_url() {
                line.push_str(&format!(" {}", url.dimmed()));
            }
            line
        })
        .collect()
}

/// Shown once at the start of an interactive session
pub fn print_banner(greeting: &str) {
    println!("{}", "VNDB Explorer".yellow().bold());
    println!("Type 'exit' or 'quit' to end the session.");
    println!("Use '/attach <path>' to send an image with your next message.");
    println!();
    print_response(greeting);
    println!();
}

/// Render markdown in the terminal
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut output = String::new();
    let mut strong = false;
    let mut emphasis = false;
    let mut in_code_block = false;
    // Next number per open list; `None` for bullet lists
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in MdParser::new_ext(markdown, options) {
        match event {
            MdEvent::Start(Tag::Heading(level, ..)) => {
                if !output.is_empty() {
                    output.push('\n');
                }
                if level == HeadingLevel::H1 {
                    output.push_str(&format!("{} ", "#".bright_cyan().bold()));
                }
                strong = true;
            }
            MdEvent::End(Tag::Heading(..)) => {
                strong = false;
                output.push('\n');
            }
            MdEvent::Start(Tag::Paragraph) => {
                if lists.is_empty() && !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Paragraph) => {
                if lists.is_empty() {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                output.push_str(&format!("{}\n", "─".repeat(40).dimmed()));
            }
            MdEvent::End(Tag::CodeBlock(_)) => {
                in_code_block = false;
                output.push_str(&format!("{}\n", "─".repeat(40).dimmed()));
            }
            MdEvent::Start(Tag::List(first)) => {
                if lists.is_empty() && !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                lists.push(first);
            }
            MdEvent::End(Tag::List(_)) => {
                lists.pop();
            }
            MdEvent::Start(Tag::Item) => {
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker.yellow()
                    }
                    _ => "•".yellow(),
                };
                output.push_str(&format!("{}{} ", indent, marker));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::Strong) => strong = true,
            MdEvent::End(Tag::Strong) => strong = false,
            MdEvent::Start(Tag::Emphasis) => emphasis = true,
            MdEvent::End(Tag::Emphasis) => emphasis = false,
            MdEvent::End(Tag::Link(_, url, _)) => {
                output.push_str(&format!(" ({})", url.as_ref().underline()));
            }
            MdEvent::Code(code) => {
                output.push_str(&code.as_ref().on_bright_black().white().to_string());
            }
            MdEvent::Text(text) => {
                let text = text.as_ref();
                let styled = if in_code_block {
                    text.normal()
                } else if strong {
                    text.bold()
                } else if emphasis {
                    text.italic()
                } else {
                    text.normal()
                };
                output.push_str(&styled.to_string());
            }
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            MdEvent::Rule => output.push_str(&format!("{}\n", "─".repeat(40).dimmed())),
            _ => {}
        }
    }

    output
}
