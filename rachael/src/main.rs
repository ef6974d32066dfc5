use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use rachael::{
    interview::GREETING, ChatTransport, ChatTurn, Config, Gateway, HttpTransport, Interview,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about = "Talk to Rachael from the terminal")]
struct Cli {
    /// Address of a running relay, e.g. http://localhost:3000/chat-with-rachael.
    /// Without it the upstream is called directly using NVIDIA_API_KEY.
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer Rachael's questions, then type /summary for the report.
    Interview,
    /// Write the summary for a transcript saved as a JSON array of turns.
    Summarize { transcript: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rachael=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.server {
        Some(url) => run(cli.command, HttpTransport::new(url)?).await,
        None => {
            let config = Config::from_env()?;
            run(cli.command, Gateway::new(&config)?).await
        }
    }
}

async fn run(command: Command, transport: impl ChatTransport) -> Result<()> {
    match command {
        Command::Interview => interview(Interview::new(transport)).await,
        Command::Summarize { transcript } => {
            let raw = tokio::fs::read_to_string(&transcript)
                .await
                .into_diagnostic()
                .wrap_err_with(|| format!("Could not read {}", transcript.display()))?;
            let turns: Vec<ChatTurn> = serde_json::from_str(&raw)
                .into_diagnostic()
                .wrap_err("Transcript must be a JSON array of {role, content} turns")?;

            let summary = Interview::resume(transport, turns).summarize().await?;
            println!("{summary}");
            Ok(())
        }
    }
}

async fn interview<T: ChatTransport>(mut interview: Interview<T>) -> Result<()> {
    println!("Rachael: {GREETING}");
    println!("(type /summary when you are done, /quit to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.into_diagnostic()? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/summary" => match interview.summarize().await {
                Ok(summary) => {
                    println!("\n{summary}");
                    break;
                }
                Err(e) => eprintln!("Failed to generate summary. Please try again. ({e})"),
            },
            input => match interview.send(input).await {
                Ok(reply) => println!("Rachael: {reply}"),
                Err(e) => eprintln!("Failed to get response from Rachael. Please try again. ({e})"),
            },
        }
    }

    Ok(())
}
