use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use cinewatch_core::{
    bootstrap::{init_services, load_config, Services},
    logging,
    models::{ContentRequest, ContentType},
};

#[derive(Parser, Debug)]
#[command(name = "cinewatch")]
#[command(about = "Stream source aggregation and watch page state for movies and TV")]
pub struct Args {
    /// Config file (defaults to CINEWATCH_CONFIG_PATH or ./config.yaml)
    #[arg(long, short, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the full watch page: details, sources and the default source
    Watch(TitleArgs),
    /// Aggregate stream, download and torrent sources
    Sources(TitleArgs),
    /// Show TMDB details, trailer and similar titles
    Details(TitleArgs),
    /// Show saved progress and rating
    Progress(TitleArgs),
    /// Rate a title from 1 to 10
    Rate {
        #[command(flatten)]
        title: TitleArgs,
        rating: u8,
    },
    /// Toggle "liked" for a title
    Like(TitleArgs),
    /// Toggle "My List" membership for a title
    List(TitleArgs),
    /// Print liked titles and "My List"
    Library,
}

#[derive(ClapArgs, Debug)]
pub struct TitleArgs {
    /// TMDB id
    pub id: i64,
    /// Treat the id as a TV show
    #[arg(long)]
    pub tv: bool,
    #[arg(long, requires = "tv")]
    pub season: Option<i64>,
    #[arg(long, requires = "tv")]
    pub episode: Option<i64>,
}

impl TitleArgs {
    fn content_type(&self) -> ContentType {
        if self.tv {
            ContentType::Tv
        } else {
            ContentType::Movie
        }
    }

    /// Request for a single playable item
    fn request(&self) -> Result<ContentRequest> {
        Ok(ContentRequest::new(
            self.id,
            self.content_type(),
            self.season,
            self.episode,
        )?)
    }

    /// Request for title-level data, where a show needs no episode
    fn title_request(&self) -> Result<ContentRequest> {
        let id = u64::try_from(self.id)
            .ok()
            .filter(|id| *id > 0)
            .with_context(|| format!("content id must be a positive integer, got {}", self.id))?;
        Ok(match (self.tv, self.season.zip(self.episode)) {
            (true, None) => ContentRequest {
                content_id: id,
                content_type: ContentType::Tv,
                season: None,
                episode: None,
            },
            _ => self.request()?,
        })
    }
}

impl Args {
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        logging::init_logging(&config.logging)?;
        let services = init_services(&config)?;

        match self.command {
            Command::Watch(title) => watch(&services, &title).await,
            Command::Sources(title) => {
                let request = title.request()?;
                let sources = services.aggregator.load_sources_request(&request).await?;
                print_json(&sources)
            }
            Command::Details(title) => {
                let loader = services
                    .content_loader
                    .as_ref()
                    .context("TMDB is not configured (set CINEWATCH_TMDB__API_KEY)")?;
                let details = loader.load(title.content_type(), title.id).await?;
                print_json(&details)
            }
            Command::Progress(title) => {
                let session = services.watch_session(title.title_request()?);
                let state = session.state();
                print_json(&serde_json::json!({
                    "progress": state.saved_progress,
                    "rating": state.rating,
                }))
            }
            Command::Rate { title, rating } => {
                services.watch_session(title.title_request()?).rate(rating)?;
                info!(rating, "Rating saved");
                Ok(())
            }
            Command::Like(title) => {
                let liked = services.watch_session(title.title_request()?).toggle_like()?;
                print_json(&serde_json::json!({ "liked": liked }))
            }
            Command::List(title) => {
                let listed = services.watch_session(title.title_request()?).toggle_my_list()?;
                print_json(&serde_json::json!({ "inList": listed }))
            }
            Command::Library => print_json(&serde_json::json!({
                "liked": services.library.liked(),
                "myList": services.library.my_list(),
            })),
        }
    }
}

async fn watch(services: &Services, title: &TitleArgs) -> Result<()> {
    let session = services.watch_session(title.request()?);
    session.load().await;
    let state = session.state();
    if let Some(error) = &state.error {
        info!(error = %error, "Watch page loaded with an error; rerun to retry");
    }
    print_json(&state)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
