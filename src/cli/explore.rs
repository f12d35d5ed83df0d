use std::path::PathBuf;

use colored::Colorize;
use reqwest::Client;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    cli::{display, pipeline},
    config::Settings,
    error::MelodyError,
    info,
    management::Session,
    openai::PromptKind,
    spotify, success, warning,
};

/// A line typed at the explore prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExploreCommand {
    Login,
    Fetch,
    Tracks,
    Timeline,
    Genres,
    Reflect(PromptKind),
    Export(PathBuf),
    Reset,
    Help,
    Quit,
}

impl ExploreCommand {
    /// Parses a prompt line; `None` for blank or unknown input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let command = parts.next()?.to_lowercase();
        let argument = parts.next();

        let parsed = match command.as_str() {
            "login" => ExploreCommand::Login,
            "fetch" | "refresh" => ExploreCommand::Fetch,
            "tracks" | "data" => ExploreCommand::Tracks,
            "timeline" => ExploreCommand::Timeline,
            "genres" => ExploreCommand::Genres,
            "poem" => ExploreCommand::Reflect(PromptKind::Poem),
            "travel" => ExploreCommand::Reflect(PromptKind::TravelSuggestion),
            "history" => ExploreCommand::Reflect(PromptKind::HistoricalContext),
            "export" => ExploreCommand::Export(PathBuf::from(argument?)),
            "reset" | "logout" => ExploreCommand::Reset,
            "help" | "?" => ExploreCommand::Help,
            "quit" | "exit" | "q" => ExploreCommand::Quit,
            _ => return None,
        };
        Some(parsed)
    }
}

const HELP: &str = "\
  login            log in again (clears the current data)
  fetch            re-fetch recently played tracks
  tracks           show the fetched tracks
  timeline         show tracks by release year
  genres           show the genre distribution
  poem             write a poem about your tracks
  travel           suggest a travel destination
  history          give some historical context
  export <file>    write the dataset as JSON
  reset            forget token and data
  quit             leave";

/// Interactive session: logs in, fetches once, then answers commands until
/// the user quits or stdin closes.
pub async fn explore(
    settings: &Settings,
    limit: u32,
    workers: usize,
    top_genres: usize,
) -> Result<(), MelodyError> {
    let client = spotify::http_client(settings.http_timeout)?;
    let mut session = Session::new();

    if login_and_fetch(&mut session, settings, &client, limit, workers).await {
        if let Some(dataset) = session.dataset() {
            display::show_timeline(dataset);
            display::show_genres(dataset, top_genres);
        }
    }

    info!("Type `help` for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = ExploreCommand::parse(&line) else {
            warning!("Unknown command {:?}. Type `help` for commands.", line.trim());
            continue;
        };

        match command {
            ExploreCommand::Quit => break,
            ExploreCommand::Help => println!("{}", HELP),
            ExploreCommand::Reset => {
                session.reset();
                success!("Session cleared.");
            }
            ExploreCommand::Login => {
                login_and_fetch(&mut session, settings, &client, limit, workers).await;
            }
            ExploreCommand::Fetch => {
                if !session.is_authenticated() {
                    warning!("Not logged in. Type `login` first.");
                    continue;
                }
                if let Err(e) =
                    pipeline::refresh_dataset(&mut session, settings, &client, limit, workers).await
                {
                    report_pipeline_error(&e);
                }
            }
            other => run_dataset_command(&session, settings, &client, other, top_genres).await,
        }
    }

    Ok(())
}

async fn login_and_fetch(
    session: &mut Session,
    settings: &Settings,
    client: &Client,
    limit: u32,
    workers: usize,
) -> bool {
    if let Err(e) = pipeline::authenticate(session, settings, client).await {
        report_pipeline_error(&e);
        return false;
    }
    if let Err(e) = pipeline::refresh_dataset(session, settings, client, limit, workers).await {
        report_pipeline_error(&e);
        return false;
    }
    true
}

async fn run_dataset_command(
    session: &Session,
    settings: &Settings,
    client: &Client,
    command: ExploreCommand,
    top_genres: usize,
) {
    let Some(dataset) = session.dataset() else {
        warning!("No data yet. Type `login` or `fetch` first.");
        return;
    };

    match command {
        ExploreCommand::Tracks => display::show_tracks(dataset),
        ExploreCommand::Timeline => display::show_timeline(dataset),
        ExploreCommand::Genres => display::show_genres(dataset, top_genres),
        ExploreCommand::Reflect(kind) => {
            match pipeline::reflect(dataset, settings, client, kind).await {
                Ok(text) => display::show_reflection(kind, &text),
                Err(e) => warning!("{} failed: {}", kind, e),
            }
        }
        ExploreCommand::Export(path) => {
            let written = match dataset.to_json() {
                Ok(json) => async_fs::write(&path, json).await.map_err(MelodyError::from),
                Err(e) => Err(MelodyError::from(e)),
            };
            match written {
                Ok(()) => success!("Dataset written to {}", path.display()),
                Err(e) => warning!("Export failed: {}", e),
            }
        }
        _ => {}
    }
}

fn report_pipeline_error(e: &MelodyError) {
    match e {
        MelodyError::AuthRejected { .. } | MelodyError::MissingToken => {
            warning!("{}\nType `login` to authorize again.", e)
        }
        _ if e.status() == Some(401) => {
            warning!("{}\nYour access token expired. Type `login` to authorize again.", e)
        }
        _ => warning!("{}", e),
    }
}

fn print_prompt() {
    use std::io::Write;
    print!("{} ", "melodymap>".blue().bold());
    let _ = std::io::stdout().flush();
}
