use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mheshimiwa::connector::api::{Container, ContainerConfig, Router};
use mheshimiwa::application::DEFAULT_HISTORY_WINDOW;
use mheshimiwa::{Commands, HttpAccountabilityClient};

const HISTORY_WINDOW_ENV: &str = "MHESHIMIWA_HISTORY_WINDOW";

#[derive(Parser)]
#[command(name = "mheshimiwa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, default_value = "~/.mheshimiwa")]
    data_dir: String,

    /// Accountability service URL (defaults to $MHESHIMIWA_API_BASE or http://localhost:8000)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Answer with a local mock instead of calling OpenRouter
    #[arg(long, global = true)]
    mock_llm: bool,

    /// Keep chat history in memory only
    #[arg(long, global = true)]
    memory_storage: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ContainerConfig {
        data_dir: expand_tilde(&cli.data_dir),
        api_base: cli
            .api_base
            .unwrap_or_else(HttpAccountabilityClient::configured_base_url),
        mock_llm: cli.mock_llm,
        memory_storage: cli.memory_storage,
        history_window: history_window_from_env(),
    };

    let container = Container::new(config)?;
    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}

fn history_window_from_env() -> usize {
    parse_history_window(std::env::var(HISTORY_WINDOW_ENV).ok().as_deref())
}

fn parse_history_window(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_HISTORY_WINDOW;
    };
    match raw.trim().parse::<u32>() {
        Ok(window) => window as usize,
        Err(_) => {
            tracing::warn!(
                "Ignoring invalid {} '{}', using {}",
                HISTORY_WINDOW_ENV,
                raw,
                DEFAULT_HISTORY_WINDOW
            );
            DEFAULT_HISTORY_WINDOW
        }
    }
}

fn expand_tilde(path: &str) -> String {
    expand_tilde_with(path, std::env::var_os("HOME").map(PathBuf::from))
}

fn expand_tilde_with(path: &str, home: Option<PathBuf>) -> String {
    match home {
        Some(home) if path == "~" => home.to_string_lossy().to_string(),
        Some(home) if path.starts_with("~/") => {
            path.replacen('~', &home.to_string_lossy(), 1)
        }
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn ask_joins_words_and_accepts_session() {
        let cli = Cli::try_parse_from([
            "mheshimiwa", "ask", "--session", "3", "Who", "is", "my", "MP?",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask { question, session } => {
                assert_eq!(question.join(" "), "Who is my MP?");
                assert_eq!(session, Some(3));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["mheshimiwa", "ask"]).is_err());
    }

    #[test]
    fn serve_defaults_to_port_8000() {
        let cli = Cli::try_parse_from(["mheshimiwa", "serve", "--mock-llm"]).unwrap();
        assert!(cli.mock_llm);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: 8000,
                public: false
            }
        ));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = Some(PathBuf::from("/home/wanjiku"));
        assert_eq!(
            expand_tilde_with("~/.mheshimiwa", home.clone()),
            "/home/wanjiku/.mheshimiwa"
        );
        assert_eq!(expand_tilde_with("~", home.clone()), "/home/wanjiku");
        assert_eq!(
            expand_tilde_with("/var/lib/mheshimiwa", home),
            "/var/lib/mheshimiwa"
        );
        assert_eq!(expand_tilde_with("~/.mheshimiwa", None), "~/.mheshimiwa");
    }

    #[test]
    fn history_window_defaults_when_unset() {
        assert_eq!(parse_history_window(None), DEFAULT_HISTORY_WINDOW);
    }

    #[test]
    fn history_window_accepts_valid_value() {
        assert_eq!(parse_history_window(Some("4")), 4);
        assert_eq!(parse_history_window(Some(" 0 ")), 0);
    }

    #[test]
    fn history_window_falls_back_on_invalid_value() {
        assert_eq!(parse_history_window(Some("lots")), DEFAULT_HISTORY_WINDOW);
        assert_eq!(parse_history_window(Some("-3")), DEFAULT_HISTORY_WINDOW);
        assert_eq!(
            parse_history_window(Some("18446744073709551615")),
            DEFAULT_HISTORY_WINDOW
        );
    }
}
