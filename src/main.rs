use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use streamdash::feeds::github::GithubEventsFetcher;
use streamdash::feeds::posts::PostFetcher;
use streamdash::feeds::{FeedData, FeedFetcher};
use streamdash::logging::init_logging;
use streamdash::notify::{Notifier, StderrNotifier};
use streamdash::ui::widgets::content::render_document;
use streamdash::ui::widgets::github::{FeedLayout, GithubEventsWidget};
use streamdash::ui::widgets::post_form::PostFormWidget;
use streamdash::ui::widgets::FeedWidget;
use streamdash::{Config, JsonClient};

#[derive(Parser)]
#[command(name = "streamdash")]
#[command(about = "Render GitHub activity, post edit forms and markdown blocks as HTML")]
#[command(version)]
struct Cli {
    /// Path to a config file (default: <config dir>/streamdash/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the public events of a GitHub profile
    Feed {
        /// Profile URL, e.g. https://github.com/octocat
        profile_url: String,

        /// Maximum number of pages to load; stops early after a short page
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        #[arg(short, long, value_enum, default_value_t = FeedLayout::Paged)]
        layout: FeedLayout,
    },

    /// Render the edit form for a post, e.g. http://host/posts/<id>
    Edit { post_id: String },

    /// Render every `text/markdown` block of an HTML page (stdin if no file)
    Render { file: Option<PathBuf> },
}

enum Pump {
    More,
    Done,
    Failed,
}

/// Fetch once into `widget`, alerting on failure.
async fn pump(
    fetcher: &mut dyn FeedFetcher,
    widget: &mut dyn FeedWidget,
    notifier: &dyn Notifier,
) -> Pump {
    match fetcher.fetch().await {
        Ok(data) => {
            let more = matches!(&data, FeedData::GithubEvents(page) if !page.is_last());
            widget.update_data(data);
            if more {
                Pump::More
            } else {
                Pump::Done
            }
        }
        Err(e) => {
            tracing::error!(widget = %widget.id(), error = %e, "fetch failed");
            notifier.alert(&e);
            widget.update_data(FeedData::Error(e.to_string()));
            Pump::Failed
        }
    }
}

async fn run_feed(
    config: &Config,
    profile_url: &str,
    pages: u32,
    layout: FeedLayout,
    notifier: &dyn Notifier,
) -> Result<bool> {
    let client = JsonClient::new(&config.http);
    let mut fetcher = GithubEventsFetcher::from_profile_url(client, &config.github, profile_url)?;
    let mut widget = GithubEventsWidget::new(format!("{} on GitHub", fetcher.username()), layout);

    let mut ok = true;
    for _ in 0..pages {
        match pump(&mut fetcher, &mut widget, notifier).await {
            Pump::More => {}
            Pump::Done => break,
            Pump::Failed => {
                ok = false;
                break;
            }
        }
    }

    println!("{}", widget.render());
    Ok(ok)
}

async fn run_edit(config: &Config, post_id: String, notifier: &dyn Notifier) -> Result<bool> {
    let client = JsonClient::new(&config.http);
    let mut fetcher = PostFetcher::new(client, post_id);
    let mut widget = PostFormWidget::new();

    let ok = !matches!(
        pump(&mut fetcher, &mut widget, notifier).await,
        Pump::Failed
    );
    println!("{}", widget.render());
    Ok(ok && widget.is_open())
}

fn run_render(file: Option<PathBuf>) -> Result<bool> {
    let source = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    println!("{}", render_document(&source));
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.log);

    let notifier = StderrNotifier;
    let ok = match cli.command {
        Command::Feed {
            profile_url,
            pages,
            layout,
        } => run_feed(&config, &profile_url, pages, layout, &notifier).await?,
        Command::Edit { post_id } => run_edit(&config, post_id, &notifier).await?,
        Command::Render { file } => run_render(file)?,
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
