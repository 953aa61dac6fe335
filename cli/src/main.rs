use std::time::Duration;

use clap::{Parser, Subcommand};
use faq::Lang;
use tokio::io::{AsyncBufReadExt, BufReader};
use widget::{ChatAdapter, Conversation, Label, Speaker, TranscriptLine, TransportError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("health check failed: HTTP {0}")]
    Unhealthy(u16),
    #[error("question is empty")]
    EmptyQuestion,
    #[error("{0}")]
    Chat(String),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "veda-cli", about = "Terminal client for the VEDA chat assistant")]
struct Cli {
    #[arg(long, env = "VEDA_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Display language: `en` or `hi`.
    #[arg(long, env = "VEDA_LANG", default_value = "en", value_parser = parse_lang)]
    lang: Lang,

    #[arg(long, env = "VEDA_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    #[arg(long, default_value_t = widget::DEFAULT_MAX_MESSAGES)]
    max_messages: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server answers `/healthz`.
    Ping,
    /// Ask one question and print the answer.
    Ask {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Interactive chat on stdin.
    Chat,
}

fn parse_lang(raw: &str) -> Result<Lang, String> {
    Lang::from_tag(raw).ok_or_else(|| format!("unsupported language `{raw}` (expected en or hi)"))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let adapter = ChatAdapter::http(&cli.base_url)?.with_timeout(Duration::from_secs(cli.timeout_secs));
    let conversation = Conversation::new(cli.lang).with_max_messages(cli.max_messages);

    match cli.command {
        Command::Ping => run_ping(&cli.base_url).await,
        Command::Ask { text } => run_ask(&adapter, conversation, &text.join(" ")).await,
        Command::Chat => run_chat(&adapter, conversation).await,
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let url = format!("{}/healthz", base_url.trim_end_matches('/'));
    let status = reqwest::Client::new().get(url).send().await?.status();
    if !status.is_success() {
        return Err(CliError::Unhealthy(status.as_u16()));
    }
    println!("ok");
    Ok(())
}

async fn run_ask(adapter: &ChatAdapter, mut conversation: Conversation, text: &str) -> Result<(), CliError> {
    let outcome = conversation.submit(adapter, text).await.ok_or(CliError::EmptyQuestion)?;
    if let Some(error) = outcome.error_text() {
        return Err(CliError::Chat(error));
    }
    if let Some(reply) = conversation.transcript().last() {
        println!("{}", render_line(reply, conversation.lang()));
    }
    Ok(())
}

// =============================================================================
// INTERACTIVE CHAT
// =============================================================================

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Help,
    Dismiss,
    Lang(Lang),
    /// 1-based chip number from the latest tips.
    Tip(usize),
    Message(String),
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line.to_owned());
    };
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "exit"), None) => Input::Quit,
        (Some("help"), None) => Input::Help,
        (Some("dismiss" | "retry"), None) => Input::Dismiss,
        (Some("lang"), Some(tag)) => Lang::from_tag(tag).map_or_else(|| Input::Invalid(line.to_owned()), Input::Lang),
        (Some("tip"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Input::Tip(n),
            _ => Input::Invalid(line.to_owned()),
        },
        _ => Input::Invalid(line.to_owned()),
    }
}

fn render_line(line: &TranscriptLine<'_>, lang: Lang) -> String {
    match line.speaker {
        Speaker::User => format!("you> {}", line.text),
        Speaker::Bot => {
            let mut out = format!("veda> {}", line.text);
            if !line.chips.is_empty() {
                out.push_str(&format!("\n      {}", Label::QuickTips.text(lang)));
                for (i, chip) in line.chips.iter().enumerate() {
                    out.push_str(&format!(" [{}] {chip}", i + 1));
                }
            }
            out
        }
    }
}

fn render_error(conversation: &Conversation) -> Option<String> {
    let lang = conversation.lang();
    conversation.last_error().map(|error| {
        format!("{} {error} (/dismiss: {})", Label::ErrorPrefix.text(lang), Label::Retry.text(lang))
    })
}

/// Index of the newest message that carries suggestion chips.
fn latest_tips(conversation: &Conversation) -> Option<usize> {
    conversation.messages().iter().rposition(|m| !m.suggestions().is_empty())
}

fn print_transcript(conversation: &Conversation) {
    let lang = conversation.lang();
    println!(
        "== {} ({}: {}) ==",
        Label::Title.text(lang),
        Label::Language.text(lang),
        Label::language_name(lang).text(lang)
    );
    for line in conversation.transcript() {
        println!("{}", render_line(&line, lang));
    }
}

fn help_text(adapter: &ChatAdapter) -> String {
    format!("/tip N  /lang en|hi  /dismiss  /quit  (reply timeout {}s)", adapter.timeout().as_secs())
}

fn print_latest(conversation: &Conversation) {
    if let Some(reply) = conversation.transcript().last() {
        println!("{}", render_line(reply, conversation.lang()));
    }
    if let Some(error) = render_error(conversation) {
        eprintln!("{error}");
    }
}

async fn run_chat(adapter: &ChatAdapter, mut conversation: Conversation) -> Result<(), CliError> {
    print_transcript(&conversation);
    println!("{}", help_text(adapter));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Input::Quit => break,
            Input::Help => println!("{}", help_text(adapter)),
            Input::Dismiss => conversation.dismiss_error(),
            Input::Lang(lang) => {
                conversation.set_lang(lang);
                print_transcript(&conversation);
            }
            Input::Tip(n) => {
                let Some(index) = latest_tips(&conversation) else {
                    eprintln!("no tips to choose from");
                    continue;
                };
                if conversation.choose_suggestion(adapter, index, n - 1).await.is_some() {
                    print_latest(&conversation);
                } else {
                    eprintln!("no tip {n}");
                }
            }
            Input::Message(text) => {
                let Some(text) = conversation.begin(&text) else {
                    continue;
                };
                if let Some(typing) = conversation.typing_label() {
                    eprintln!("{typing}");
                }
                let outcome = adapter.send(&text, conversation.lang()).await;
                conversation.finish(&outcome);
                print_latest(&conversation);
            }
            Input::Invalid(command) => eprintln!("unknown command: {command}"),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
