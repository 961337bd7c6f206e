use contributor_wall::config::cli::{Command, OutputFormat};
use contributor_wall::config::Config;
use contributor_wall::domain::KeyValueStore;
use contributor_wall::error::{Result, WallError};
use contributor_wall::infrastructure::{
    ContributorClient, ContributorSource, FileSystemStore, MemoryStore,
};
use contributor_wall::services::appreciation::Reaction;
use contributor_wall::services::filtering::BadgeFilter;
use contributor_wall::services::ordering::SortMode;
use contributor_wall::services::render;
use contributor_wall::services::spotlight::{RandomSource, ThreadRandom};
use contributor_wall::services::theme::ThemePreference;
use contributor_wall::services::wall_service::WallSession;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text(value)),
    }
    Ok(())
}

async fn load_session(config: &Config, kv: Arc<dyn KeyValueStore>) -> Result<WallSession> {
    let source = ContributorSource::from_location(&config.args.source);
    let client = ContributorClient::new(config.http_client.clone());
    match client.load(&source).await {
        Ok(records) => Ok(WallSession::new(records, kv)),
        Err(e) => {
            error!("Could not load contributors: {}", e);
            Err(e)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.args.log_level))
        .with_writer(std::io::stderr)
        .init();

    config.ensure_directories()?;

    let kv: Arc<dyn KeyValueStore> = if config.args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(FileSystemStore::new(&config.args.state_dir))
    };

    let command = config.args.command.clone().unwrap_or(Command::List {
        sort: SortMode::default().to_string(),
        search: String::new(),
        badge: BadgeFilter::All.to_string(),
        format: OutputFormat::Text,
    });

    match command {
        Command::List {
            sort,
            search,
            badge,
            format,
        } => {
            let badge = BadgeFilter::parse(&badge)
                .ok_or_else(|| WallError::Parse(format!("unknown badge filter '{}'", badge)))?;
            let mut session = load_session(&config, kv).await?;
            session.set_sort(SortMode::parse(&sort));
            session.set_search(&search);
            session.set_badge(badge);
            emit(format, &session.view(), render::render_wall)?;
        }
        Command::Stats { format } => {
            let session = load_session(&config, kv).await?;
            emit(format, &session.report(), render::render_report)?;
        }
        Command::Spotlight { seed } => {
            let mut session = load_session(&config, kv).await?;
            let mut rng: Box<dyn RandomSource> = match seed {
                Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                None => Box::new(ThreadRandom),
            };
            match session.spotlight(rng.as_mut()) {
                Some(record) => print!("{}", render::render_spotlight(record)),
                None => println!("No contributors yet."),
            }
        }
        Command::Appreciate { username, reaction } => {
            let reaction: Reaction = reaction.parse().map_err(WallError::Parse)?;
            let session = load_session(&config, kv).await?;
            if !session
                .records()
                .iter()
                .any(|r| r.appreciation_key() == username)
            {
                return Err(WallError::Other(format!("no contributor '{}'", username)));
            }
            let outcome = session.appreciate(&username, reaction);
            println!("{}", render::render_send(&username, reaction, &outcome));
        }
        Command::Theme { value } => {
            let theme = ThemePreference::new(kv);
            if let Some(value) = value {
                theme.set(&value);
            }
            println!("{}", theme.current());
        }
    }

    info!("Done");
    Ok(())
}
