use anyhow::{Context, Result};
use clap::Parser;
use inews_bridge::{Bridge, BridgeClient, Channel, RemoteClients};
use inews_core::{AppPaths, ArticleCollection, Category};
use inews_storage::Stores;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_ADDR: &str = "127.0.0.1:4114";

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        const TOO_LARGE: &str = "Duration is too large";
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if !current_number.is_empty() {
                let num = current_number
                    .parse::<u64>()
                    .map_err(|_| TOO_LARGE.to_string())?;
                let unit = match c {
                    's' => 1,
                    'm' => 60,
                    'h' => 3600,
                    'd' => 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                };
                total_seconds = num
                    .checked_mul(unit)
                    .and_then(|secs| total_seconds.checked_add(secs))
                    .ok_or_else(|| TOO_LARGE.to_string())?;
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            total_seconds = current_number
                .parse::<u64>()
                .ok()
                .and_then(|num| total_seconds.checked_add(num))
                .ok_or_else(|| TOO_LARGE.to_string())?;
            has_unit = true;
        }

        if !has_unit || total_seconds == 0 {
            return Err("Duration must include a non-zero number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Local headline cache and IPC bridge", long_about = None)]
pub struct Cli {
    /// Home directory the application folders live under
    #[arg(long, env = "INEWS_HOME", global = true)]
    home: Option<PathBuf>,
    /// NewsAPI base URL override
    #[arg(long, env = "INEWS_NEWSAPI_URL", global = true)]
    newsapi_url: Option<String>,
    /// OpenAI base URL override
    #[arg(long, env = "INEWS_OPENAI_URL", global = true)]
    openai_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the IPC bridge over HTTP
    Serve {
        #[arg(long, env = "INEWS_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
    /// Invoke a channel on a running bridge; each ARG is one JSON value
    Call {
        channel: String,
        args: Vec<String>,
        #[arg(long, env = "INEWS_ADDR", default_value = DEFAULT_ADDR)]
        addr: SocketAddr,
    },
    /// List the channel catalogue
    Channels,
    Headlines {
        #[command(subcommand)]
        command: HeadlineCommands,
    },
    /// Search NewsAPI and cache the results
    Search {
        keywords: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        sort_by: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    Keys {
        #[command(subcommand)]
        command: KeyCommands,
    },
    Folders {
        #[command(subcommand)]
        command: FolderCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
enum HeadlineCommands {
    /// Show today's cached headlines, fetching them when none are cached
    Today,
    /// Show headlines cached on earlier days
    Previous,
    /// Drop today's batches and fetch a fresh one
    Refresh {
        /// Keep refreshing on this interval (e.g. 1h, 30m, 1h15m)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Show or change the headline preferences
    Settings {
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        previous_days: Option<u32>,
    },
}

#[derive(clap::Subcommand, Debug)]
enum KeyCommands {
    Show,
    Set {
        #[arg(long)]
        newsapi: Option<String>,
        #[arg(long)]
        openai: Option<String>,
        #[arg(long)]
        huggingface: Option<String>,
    },
}

#[derive(clap::Subcommand, Debug)]
enum FolderCommands {
    List,
    Create { name: String },
    Remove { name: String },
    Show { name: String },
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_headlines(label: &str, value: Value) -> Result<()> {
    if value.is_null() {
        println!("No {} headlines cached", label);
        return Ok(());
    }
    let collection: ArticleCollection = serde_json::from_value(value)?;
    println!("{} {} headlines", collection.len(), label);
    for article in &collection.articles {
        println!("- {} ({})", article.title, article.source.name);
    }
    Ok(())
}

fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => "<unset>".to_string(),
        n if n <= 4 => "****".to_string(),
        n => format!("****{}", chars[n - 4..].iter().collect::<String>()),
    }
}

async fn refresh(bridge: &Bridge) -> Result<()> {
    bridge.invoke(Channel::RemoveTodayHeadlines, vec![]).await?;
    bridge
        .invoke(Channel::GetHeadlines, vec![])
        .await
        .context("Failed to fetch headlines")?;
    Ok(())
}

async fn run_headlines(bridge: &Bridge, command: HeadlineCommands) -> Result<()> {
    match command {
        HeadlineCommands::Today => {
            let mut today = bridge.invoke(Channel::LoadTodayHeadlines, vec![]).await?;
            if today.is_null() {
                info!("📰 Nothing cached for today, fetching headlines");
                bridge
                    .invoke(Channel::GetHeadlines, vec![])
                    .await
                    .context("Failed to fetch headlines")?;
                today = bridge.invoke(Channel::LoadTodayHeadlines, vec![]).await?;
            }
            print_headlines("today's", today)
        }
        HeadlineCommands::Previous => {
            let previous = bridge.invoke(Channel::LoadPrevHeadlines, vec![]).await?;
            print_headlines("previous", previous)
        }
        HeadlineCommands::Refresh { interval: None } => {
            refresh(bridge).await?;
            let today = bridge.invoke(Channel::LoadTodayHeadlines, vec![]).await?;
            print_headlines("today's", today)
        }
        HeadlineCommands::Refresh {
            interval: Some(interval),
        } => {
            info!("Running in periodic mode with {}s interval", interval.0.as_secs());
            loop {
                if let Err(e) = refresh(bridge).await {
                    error!("Error during refresh: {:#}", e);
                }
                info!("Waiting {}s before next refresh", interval.0.as_secs());
                tokio::time::sleep(interval.0).await;
            }
        }
        HeadlineCommands::Settings {
            category,
            size,
            previous_days,
        } => {
            let mut settings = bridge.stores().settings.load_headline_settings().await;
            if category.is_none() && size.is_none() && previous_days.is_none() {
                return print_json(&serde_json::to_value(&settings)?);
            }
            if let Some(category) = category {
                settings.category = category;
            }
            if let Some(size) = size {
                settings.headline_size = size;
            }
            if let Some(days) = previous_days {
                settings.previous_days = days;
            }
            bridge
                .invoke(
                    Channel::WriteHeadlineSettings,
                    vec![serde_json::to_value(&settings)?],
                )
                .await?;
            print_json(&serde_json::to_value(&settings)?)
        }
    }
}

async fn run_keys(bridge: &Bridge, command: KeyCommands) -> Result<()> {
    let mut keys = bridge.stores().settings.load_api_keys().await;
    match command {
        KeyCommands::Show => {}
        KeyCommands::Set {
            newsapi,
            openai,
            huggingface,
        } => {
            if let Some(key) = newsapi {
                keys.newsapi = key;
            }
            if let Some(key) = openai {
                keys.openai = key;
            }
            if let Some(key) = huggingface {
                keys.huggingface = key;
            }
            bridge
                .invoke(Channel::WriteApiKeys, vec![serde_json::to_value(&keys)?])
                .await?;
        }
    }
    println!("newsapi:     {}", mask(&keys.newsapi));
    println!("openai:      {}", mask(&keys.openai));
    println!("huggingface: {}", mask(&keys.huggingface));
    Ok(())
}

async fn run_folders(bridge: &Bridge, command: FolderCommands) -> Result<()> {
    let (channel, args) = match command {
        FolderCommands::List => (Channel::LoadUserFolders, vec![]),
        FolderCommands::Create { name } => (Channel::CreateUserFolder, vec![json!(name)]),
        FolderCommands::Remove { name } => (Channel::RemoveUserFolder, vec![json!(name)]),
        FolderCommands::Show { name } => (Channel::LoadFolderContents, vec![json!(name)]),
    };
    print_json(&bridge.invoke(channel, args).await?)
}

async fn call_remote(addr: SocketAddr, channel: &str, args: &[String]) -> Result<()> {
    let channel: Channel = channel.parse()?;
    let args = args
        .iter()
        .map(|arg| {
            // Bare words are taken as strings so `call createUserFolder Tech` works
            serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone()))
        })
        .collect();
    let client = BridgeClient::new(&format!("http://{}", addr));
    let result = client
        .invoke(channel, args)
        .await
        .with_context(|| format!("{} failed", channel))?;
    print_json(&result)
}

#[tokio::main]
async fn main() -> Result<()> {
    inews_core::logging::init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Call {
            channel,
            args,
            addr,
        } => return call_remote(*addr, channel, args).await,
        Commands::Channels => {
            for channel in Channel::ALL {
                println!("{}", channel);
            }
            return Ok(());
        }
        _ => {}
    }

    let paths = match cli.home {
        Some(home) => AppPaths::from_home(home),
        None => AppPaths::discover()?,
    };
    let stores = Stores::ensure_project_files(&paths)
        .await
        .with_context(|| format!("Failed to prepare {}", paths.headlines_dir.display()))?;
    info!("🏦 Stores ready under {}", paths.headlines_dir.display());

    let mut clients = RemoteClients {
        newsapi_url: cli.newsapi_url,
        ..RemoteClients::default()
    };
    if let Some(url) = cli.openai_url {
        clients.inference.openai_url = url;
    }
    let bridge = Bridge::new(stores, Arc::new(clients));

    match cli.command {
        Commands::Serve { addr } => inews_bridge::serve(bridge, addr).await?,
        Commands::Headlines { command } => run_headlines(&bridge, command).await?,
        Commands::Search {
            keywords,
            language,
            sort_by,
            from,
            to,
        } => {
            let params = json!({
                "keywords": keywords,
                "language": language,
                "sortBy": sort_by,
                "from": from,
                "to": to,
            });
            bridge
                .invoke(Channel::GetSearchResults, vec![params])
                .await
                .context("Search failed")?;
            let results = bridge.invoke(Channel::LoadSearchResults, vec![]).await?;
            print_headlines("search", results)?;
        }
        Commands::Keys { command } => run_keys(&bridge, command).await?,
        Commands::Folders { command } => run_folders(&bridge, command).await?,
        Commands::Call { .. } | Commands::Channels => unreachable!(),
    }

    Ok(())
}
