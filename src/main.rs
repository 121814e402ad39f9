#![forbid(unsafe_code)]

//! `postpilot` — headless content-scheduling agent binary.
//!
//! Bootstraps configuration, loads credentials from the OS keychain, and
//! either runs the publish-due scanner as a daemon (`run`) or executes a
//! one-shot curation/scheduling command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use postpilot::backend::client::BackendClient;
use postpilot::backend::{PostPublisher, PostStore};
use postpilot::config::{store_credential, GlobalConfig};
use postpilot::ideas::generator::IdeaGenerator;
use postpilot::ideas::{filter_by_title, page, page_count, IDEAS_PER_PAGE};
use postpilot::linkedin::LinkedInClient;
use postpilot::media::upload_files;
use postpilot::models::idea::GeneratedIdea;
use postpilot::models::post::{NewPost, PostStatus};
use postpilot::scheduler::cache::ScheduleCache;
use postpilot::scheduler::publisher::LinkedInPublisher;
use postpilot::scheduler::reconciler::Reconciler;
use postpilot::scheduler::scanner::{ScanEvent, Scanner};
use postpilot::session::Session;
use postpilot::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "postpilot", about = "Headless LinkedIn content-scheduling agent", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the publish-due scanner daemon.
    Run,
    /// Exchange backend credentials for a bearer token and store it.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Store a LinkedIn token delivered by the OAuth callback, or print the
    /// auth URL to visit when called without a token.
    Auth {
        /// Token returned by the OAuth round-trip.
        #[arg(long)]
        token: Option<String>,
    },
    /// Curate scraped ideas.
    #[command(subcommand)]
    Ideas(IdeasCommand),
    /// Generate post copy from scraped ideas plus your notes.
    Generate {
        /// Scraped-idea ids to combine.
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        /// Your thoughts and context for the generator.
        #[arg(long, default_value = "")]
        context: String,
        /// Persist the generated copy to the backend.
        #[arg(long)]
        save: bool,
    },
    /// Schedule a post for automatic publication.
    Schedule {
        /// Post body text.
        #[arg(long)]
        content: String,
        /// Target date, `YYYY-MM-DD`.
        #[arg(long)]
        date: String,
        /// Target wall-clock time, `HH:MM`.
        #[arg(long)]
        time: String,
        /// Local media files to upload and attach, in display order.
        #[arg(long)]
        media: Vec<PathBuf>,
        /// Link URLs to carry with the post.
        #[arg(long)]
        url: Vec<String>,
    },
    /// Upload media files and print their stored URLs.
    Upload {
        /// Local files to upload, in display order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Inspect or cancel scheduled posts.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Publish one planned post immediately, bypassing its schedule.
    PublishNow {
        /// Post identifier.
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum IdeasCommand {
    /// List scraped ideas, optionally filtered by title.
    List {
        /// Case-insensitive title filter.
        #[arg(long)]
        query: Option<String>,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Delete a scraped idea.
    Delete {
        /// Idea identifier.
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// List all scheduled posts.
    List,
    /// Cancel a planned post without publishing it.
    Cancel {
        /// Post identifier.
        #[arg(long)]
        id: String,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;

    // Login and auth run before credential loading: they are how the
    // credentials get stored in the first place.
    match &args.command {
        Command::Login { email, password } => return login(&config, email, password).await,
        Command::Auth { token } => return auth(&config, token.as_deref()).await,
        _ => {}
    }

    config.load_credentials().await?;
    info!("configuration loaded");

    let session = Session::new(config.access_token.clone(), config.linkedin_token.clone());
    let backend = BackendClient::new(&config.backend, session.clone())?;

    match args.command {
        Command::Run => run_daemon(&config, session, backend).await,
        Command::Ideas(cmd) => ideas_command(&backend, cmd).await,
        Command::Generate { ids, context, save } => {
            generate(&config, &backend, &ids, &context, save).await
        }
        Command::Schedule {
            content,
            date,
            time,
            media,
            url,
        } => schedule(&backend, content, &date, &time, &media, url).await,
        Command::Upload { files } => {
            for url in upload_files(&backend, &files).await? {
                println!("{url}");
            }
            Ok(())
        }
        Command::Posts(cmd) => posts_command(&backend, cmd).await,
        Command::PublishNow { id } => publish_now(&config, session, &backend, &id).await,
        Command::Login { .. } | Command::Auth { .. } => Ok(()),
    }
}

/// Daemon mode: recurring scan passes until SIGINT/SIGTERM.
async fn run_daemon(config: &GlobalConfig, session: Session, backend: BackendClient) -> Result<()> {
    if !config.scanner.enabled {
        return Err(AppError::Config(
            "scanner.enabled is false; nothing to run".into(),
        ));
    }

    let linkedin = LinkedInClient::new(&config.backend, session.clone())?;
    let store: Arc<dyn PostStore> = Arc::new(backend);
    let publisher: Arc<dyn PostPublisher> = Arc::new(LinkedInPublisher::new(linkedin));
    let cache = Arc::new(ScheduleCache::new());
    let (event_tx, mut event_rx) = mpsc::channel(32);

    let scanner = Arc::new(Scanner::new(
        store,
        publisher,
        cache,
        session,
        config.linkedin_auth_url(),
        event_tx,
    ));

    // ── Start the scanner ───────────────────────────────
    let ct = CancellationToken::new();
    let scanner_handle = scanner.spawn(
        Duration::from_secs(config.scanner.poll_interval_seconds),
        ct.clone(),
    );
    info!(
        interval = config.scanner.poll_interval_seconds,
        "scanner started"
    );

    // ── Consume scanner events until shutdown ───────────
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
            event = event_rx.recv() => {
                match event {
                    Some(ScanEvent::AuthRequired { auth_url }) => {
                        warn!(auth_url, "linkedin authentication required; \
                               visit the URL and run `postpilot auth --token <token>`");
                    }
                    Some(ScanEvent::Published { post_id }) => {
                        info!(post_id, "post published");
                    }
                    Some(ScanEvent::PublishFailed { post_id, reason }) => {
                        warn!(post_id, reason, "post publish failed");
                    }
                    Some(ScanEvent::Skipped { post_id, reason }) => {
                        warn!(post_id, reason, "post skipped");
                    }
                    None => break,
                }
            }
        }
    }

    ct.cancel();
    let _ = scanner_handle.await;
    info!("postpilot shut down");
    Ok(())
}

async fn login(config: &GlobalConfig, email: &str, password: &str) -> Result<()> {
    let session = Session::new(String::new(), None);
    let backend = BackendClient::new(&config.backend, session)?;
    let token = backend.sign_in(email, password).await?;
    store_credential("access_token", &token).await?;
    info!("signed in; backend token stored in keychain");
    Ok(())
}

async fn auth(config: &GlobalConfig, token: Option<&str>) -> Result<()> {
    if let Some(token) = token {
        store_credential("linkedin_token", token).await?;
        info!("linkedin token stored in keychain");
    } else {
        println!("Visit {} to authorize, then run:", config.linkedin_auth_url());
        println!("  postpilot auth --token <token>");
    }
    Ok(())
}

async fn ideas_command(backend: &BackendClient, cmd: IdeasCommand) -> Result<()> {
    match cmd {
        IdeasCommand::List { query, page: page_number } => {
            let ideas = backend.scraped_ideas().await?;
            let filtered = match query.as_deref() {
                Some(query) => filter_by_title(&ideas, query),
                None => ideas.iter().collect(),
            };
            let total_pages = page_count(filtered.len(), IDEAS_PER_PAGE);
            for idea in page(&filtered, page_number, IDEAS_PER_PAGE) {
                let preview: String = idea.selected_text.chars().take(150).collect();
                println!(
                    "{}  {} · {} · {}\n    {}",
                    idea.id, idea.title, idea.platform, idea.author, preview
                );
            }
            println!("page {page_number}/{total_pages} ({} ideas)", filtered.len());
        }
        IdeasCommand::Delete { id } => {
            backend.delete_scraped_idea(&id).await?;
            info!(id, "scraped idea deleted");
        }
    }
    Ok(())
}

async fn generate(
    config: &GlobalConfig,
    backend: &BackendClient,
    ids: &[String],
    context: &str,
    save: bool,
) -> Result<()> {
    let generator_config = config
        .generator
        .clone()
        .ok_or_else(|| AppError::Config("no [generator] section configured".into()))?;
    let generator = IdeaGenerator::new(generator_config)?;

    let ideas = backend.scraped_ideas().await?;
    let selected: Vec<_> = ideas
        .into_iter()
        .filter(|idea| ids.contains(&idea.id))
        .collect();
    if selected.is_empty() {
        return Err(AppError::NotFound("none of the given idea ids exist".into()));
    }

    let content = generator.generate(&selected, context).await?;
    println!("{content}");

    if save {
        let user = backend.current_user().await?;
        backend
            .save_generated_idea(&GeneratedIdea {
                content,
                source_ids: ids.to_vec(),
                user_id: user.id,
            })
            .await?;
        info!("generated idea saved");
    }
    Ok(())
}

async fn schedule(
    backend: &BackendClient,
    content: String,
    date: &str,
    time: &str,
    media: &[PathBuf],
    urls: Vec<String>,
) -> Result<()> {
    // Reject malformed schedules up front rather than creating posts the
    // scanner will skip forever.
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|err| AppError::Parse(format!("bad date '{date}': {err}")))?;
    chrono::NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|err| AppError::Parse(format!("bad time '{time}': {err}")))?;

    let user = backend.current_user().await?;
    let media_urls = if media.is_empty() {
        Vec::new()
    } else {
        upload_files(backend, media).await?
    };

    backend
        .add_post(&NewPost {
            content,
            urls,
            date: date.to_owned(),
            time: time.to_owned(),
            user_id: user.id,
            media_urls,
        })
        .await?;
    info!(date, time, "post scheduled");
    Ok(())
}

async fn posts_command(backend: &BackendClient, cmd: PostsCommand) -> Result<()> {
    match cmd {
        PostsCommand::List => {
            for post in backend.list_posts().await? {
                let preview: String = post.content.chars().take(60).collect();
                println!(
                    "{}  {} {}  [{}]  {}",
                    post.id,
                    post.scheduled_date,
                    post.scheduled_time,
                    post.status.as_str(),
                    preview
                );
            }
        }
        PostsCommand::Cancel { id } => {
            let store: Arc<dyn PostStore> = Arc::new(backend.clone());
            let reconciler = Reconciler::new(store, Arc::new(ScheduleCache::new()));
            reconciler.cancel(&id).await?;
            info!(id, "post cancelled");
        }
    }
    Ok(())
}

async fn publish_now(
    config: &GlobalConfig,
    session: Session,
    backend: &BackendClient,
    id: &str,
) -> Result<()> {
    let posts = backend.list_posts().await?;
    let post = posts
        .iter()
        .find(|post| post.id == id)
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;
    if post.status != PostStatus::Planned {
        return Err(AppError::Config(format!(
            "post {id} is {}, not planned",
            post.status.as_str()
        )));
    }

    let linkedin = LinkedInClient::new(&config.backend, session)?;
    let publisher = LinkedInPublisher::new(linkedin);
    publisher.publish(post).await?;
    backend.set_post_status(id, PostStatus::Published).await?;
    info!(id, "post published");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
