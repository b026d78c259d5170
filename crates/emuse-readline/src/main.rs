use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use emuse_core::ChatMessage;
use emuse_infrastructure::{ConfigService, EmusePaths, SecretServiceImpl, YOUTUBE_API_KEY_ENV};
use emuse_interaction::{InteractionManager, InteractionResult, YouTubeApiClient};

mod command;
mod logging;

use command::{COMMANDS, ReplCommand};

const SEARCHING: &str = "노래를 찾고 있어요... 🎵";
const NO_SONGS_YET: &str = "아직 추천받은 노래가 없어요.";
const STILL_SEARCHING: &str = "아직 노래를 찾는 중이에요. 잠시만 기다려 주세요.";
const SEARCH_CANCELLED: &str = "노래 찾기를 취소했어요.";
const RESET_DONE: &str = "대화를 처음부터 다시 시작해요.";
const GOODBYE: &str = "안녕히 가세요! 🎶";

#[derive(Parser)]
#[command(name = "emuse")]
#[command(about = "EMUSE - tell it how you feel, get a song", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and logs
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn print_bot_message(message: &ChatMessage) {
    for line in message.text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("https://www.youtube.com/") || trimmed.starts_with("https://youtu.be/") {
            println!("{}", trimmed.bright_yellow().underline());
        } else {
            println!("{}", line.bright_blue());
        }
    }
    if message.text.contains("https://") {
        println!("{}", "/more 다른 노래 · /copy 목록 복사 · /reset 처음으로".bright_black());
    }
    println!();
}

fn print_result(result: InteractionResult) {
    match result {
        InteractionResult::NewMessages(messages) => {
            for message in &messages {
                print_bot_message(message);
            }
        }
        InteractionResult::Busy => {
            println!("{}", STILL_SEARCHING.yellow());
        }
        InteractionResult::Cancelled => {
            println!("{}", SEARCH_CANCELLED.bright_black());
        }
        InteractionResult::NoOp => {}
    }
}

fn print_help() {
    println!("{}", "지금 기분을 말해주시면 어울리는 노래를 골라드려요.".bright_black());
    println!("{}", "  /more   같은 기분으로 다른 노래 추천".bright_black());
    println!("{}", "  /songs  추천받은 노래 목록".bright_black());
    println!("{}", "  /copy   목록을 복사하기 좋게 출력".bright_black());
    println!("{}", "  /reset  처음부터 다시 시작".bright_black());
    println!("{}", "  /quit   종료".bright_black());
}

/// Builds the interaction manager from config.toml and the API key.
///
/// Returns `Ok(None)` after telling the user how to configure the key when
/// none is available.
async fn build_manager(paths: &EmusePaths) -> Result<Option<InteractionManager>> {
    let config = ConfigService::new(paths.clone()).get_config()?;
    let lexicon = config.lexicon()?;

    let secrets = SecretServiceImpl::new(paths.clone());
    let client = match YouTubeApiClient::try_from_secrets(&secrets, &config.search).await {
        Ok(client) => client,
        Err(e) if e.is_config() => {
            tracing::warn!("YouTube API key missing: {}", e);
            let secret_path = paths.ensure_secret_file()?;
            eprintln!("{}", "YouTube API 키가 설정되지 않았어요.".red());
            eprintln!(
                "환경 변수 {}를 설정하거나 {} 파일의 youtube.api_key 값을 채워주세요.",
                YOUTUBE_API_KEY_ENV,
                secret_path.display()
            );
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        emotions = lexicon.len(),
        endpoint = %config.search.endpoint,
        "Recommender ready"
    );
    Ok(Some(InteractionManager::new_session(
        lexicon,
        Arc::new(client),
        config.search,
    )))
}

/// The main entry point for the Emuse REPL application.
///
/// This async function sets up a rustyline-based REPL that:
/// 1. Loads configuration, the emotion table and the API key
/// 2. Sends free text to the recommender in a background task
/// 3. Prints bot replies from a response handler task
/// 4. Handles /more, /songs, /copy, /reset and /quit
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = EmusePaths::new(cli.config_dir.as_deref());
    let _log_guard = logging::init(&paths.logs_dir()?)?;

    // ===== Backend Initialization =====
    let Some(manager) = build_manager(&paths).await? else {
        return Ok(());
    };
    let manager = Arc::new(manager);
    tracing::info!(session_id = %manager.session_id().await, "REPL started");

    // Channel for receiving results from background actions
    let (response_tx, mut response_rx) = mpsc::channel::<InteractionResult>(32);

    let response_handler = tokio::spawn(async move {
        while let Some(result) = response_rx.recv().await {
            print_result(result);
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== 감정 기반 노래 추천기, EMUSE ===".bright_magenta().bold());
    println!("{}", "명령어는 '/help', 종료는 'quit'을 입력하세요.".bright_black());
    println!();
    for message in manager.transcript().await {
        print_bot_message(&message);
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let command = ReplCommand::parse(&line);
                if command != ReplCommand::Empty {
                    let _ = rl.add_history_entry(line.trim());
                }

                match command {
                    ReplCommand::Empty => continue,
                    ReplCommand::Quit => {
                        println!("{}", GOODBYE.bright_green());
                        break;
                    }
                    ReplCommand::Help => print_help(),
                    ReplCommand::Unknown(cmd) => {
                        println!("{}", format!("알 수 없는 명령어예요: {}", cmd).bright_black());
                    }
                    ReplCommand::Send(text) => {
                        println!("{}", format!("> {}", text).green());
                        if !manager.is_busy() && manager.would_search(&text) {
                            println!("{}", SEARCHING.bright_black());
                        }
                        let tx = response_tx.clone();
                        let manager = Arc::clone(&manager);
                        tokio::spawn(async move {
                            let result = manager.handle_input(&text).await;
                            let _ = tx.send(result).await;
                        });
                    }
                    ReplCommand::More => {
                        if !manager.is_busy() {
                            println!("{}", SEARCHING.bright_black());
                        }
                        let tx = response_tx.clone();
                        let manager = Arc::clone(&manager);
                        tokio::spawn(async move {
                            let result = manager.fetch_another().await;
                            let _ = tx.send(result).await;
                        });
                    }
                    ReplCommand::Songs => {
                        let songs = manager.recommended_songs().await;
                        if songs.is_empty() {
                            println!("{}", NO_SONGS_YET.bright_black());
                        }
                        for (i, song) in songs.iter().enumerate() {
                            println!(
                                "{} {} {}",
                                format!("{:>2}.", i + 1).bright_black(),
                                song.title.bright_blue(),
                                format!("({})", song.platform).bright_black()
                            );
                            println!("    {}", song.url.bright_yellow().underline());
                        }
                    }
                    ReplCommand::Copy => match manager.recommendations_text().await {
                        Some(text) => {
                            println!("{}", "----- 추천 노래 목록 -----".bright_magenta());
                            println!("{}", text);
                            println!("{}", "-------------------------".bright_magenta());
                        }
                        None => println!("{}", NO_SONGS_YET.bright_black()),
                    },
                    ReplCommand::Reset => {
                        manager.reset().await;
                        println!("{}", RESET_DONE.bright_green());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C가 눌렸어요. 종료하려면 'quit'을 입력하세요.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D가 눌렸어요. 종료합니다...".bright_green());
                break;
            }
            Err(err) => {
                tracing::error!("Readline failed: {:?}", err);
                eprintln!("{}", format!("입력 오류: {:?}", err).red());
                break;
            }
        }
    }

    // Stop any running search, including ones spawned just before quitting
    manager.shutdown();
    drop(response_tx);
    let _ = response_handler.await;

    Ok(())
}
