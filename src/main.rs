use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use melodymap::{
    cli,
    config::{self, MAX_HISTORY_LIMIT, Settings},
    error,
    openai::PromptKind,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and explore your listening history interactively
    Explore(ExploreOptions),

    /// Log in, print every view and the requested reflections, then exit
    Report(ReportOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct FetchOptions {
    /// Number of recently played tracks to fetch (1-50)
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=MAX_HISTORY_LIMIT as i64))]
    pub limit: Option<u32>,

    /// Number of tracks enriched concurrently
    #[clap(long)]
    pub workers: Option<usize>,

    /// Number of genres listed in the genre table
    #[clap(long, default_value_t = 15)]
    pub top_genres: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct ExploreOptions {
    #[clap(flatten)]
    pub fetch: FetchOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportOptions {
    #[clap(flatten)]
    pub fetch: FetchOptions,

    /// Reflection(s) to generate; can be repeated
    #[clap(long = "reflect", value_enum, action = ArgAction::Append, num_args = 1)]
    pub reflections: Vec<PromptKind>,

    /// Generate every kind of reflection
    #[clap(long, conflicts_with = "reflections")]
    pub all_reflections: bool,

    /// Write the dataset as JSON to this file
    #[clap(long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("{}\nSee {}", e, config::env_path().display()),
    };
    log::debug!("{:?}", settings);

    let result = match cli.command {
        Command::Explore(opt) => {
            cli::explore(
                &settings,
                opt.fetch.limit.unwrap_or(settings.history_limit),
                opt.fetch.workers.unwrap_or(settings.enrich_workers),
                opt.fetch.top_genres,
            )
            .await
        }
        Command::Report(opt) => {
            let reflections = if opt.all_reflections {
                PromptKind::ALL.to_vec()
            } else {
                opt.reflections
            };
            cli::report(
                &settings,
                cli::ReportRequest {
                    limit: opt.fetch.limit.unwrap_or(settings.history_limit),
                    workers: opt.fetch.workers.unwrap_or(settings.enrich_workers),
                    top_genres: opt.fetch.top_genres,
                    reflections,
                    export: opt.export,
                },
            )
            .await
        }
        Command::Completions(_) => Ok(()),
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}
