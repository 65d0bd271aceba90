//! `trackerops` CLI - account and video review commands

mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use trackerops::review::{Priority, PriorityFilter};
use trackerops::Config;

#[derive(Parser)]
#[command(name = "trackerops")]
#[command(about = "TrackerOps client: accounts, profile and video review")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/trackerops/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend root URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding the local store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (log in afterwards)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        organization: String,
        #[arg(long)]
        password: String,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// View or edit the signed-in profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Timestamped comments on the video
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Record a stroke at a playback position
    Draw {
        /// Playback position in seconds
        #[arg(long)]
        at: f64,

        /// Space-separated `x,y` points
        #[arg(long)]
        points: String,

        /// Stroke color (default: first palette color)
        #[arg(long)]
        color: Option<String>,
    },

    /// List strokes visible at a position, or clear them all
    Drawings {
        /// Playback position in seconds
        #[arg(long, required_unless_present = "clear")]
        at: Option<f64>,

        /// Delete every stroke
        #[arg(long, conflicts_with = "at")]
        clear: bool,
    },

    /// Review tasks linked to the video
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Print where a seek would land
    Seek {
        /// Target in seconds
        #[arg(allow_negative_numbers = true)]
        secs: f64,

        /// Video length in seconds (default: from config)
        #[arg(long)]
        duration: Option<f64>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Fetch the profile from the backend
    Show,

    /// Save changed fields
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        organization: Option<String>,

        /// Image file to use as the profile photo
        #[arg(long)]
        photo: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CommentAction {
    /// Add a comment at a playback position
    Add {
        text: String,
        #[arg(long)]
        at: f64,
    },
    /// List comments, newest first
    List,
    /// Delete a comment by id
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Add a task linked to a playback position
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, value_enum, default_value = "medium")]
        priority: PriorityArg,
        /// Playback position in seconds
        #[arg(long)]
        at: f64,
    },
    /// List tasks in display order
    List {
        #[arg(short, long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// Flip a task between open and done
    Toggle { id: String },
    /// Change a task's title, description or priority (omitted fields are kept)
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// Delete a task
    Delete { id: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?
    .with_overrides(cli.base_url, cli.data_dir);

    match cli.command {
        Commands::Signup { name, email, organization, password } => {
            cmd::cmd_signup(&config, name, email, organization, password).await?;
        }
        Commands::Login { email, password } => {
            cmd::cmd_login(&config, &email, &password).await?;
        }
        Commands::Logout => cmd::cmd_logout(&config)?,
        Commands::Whoami => cmd::cmd_whoami(&config)?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => cmd::cmd_profile_show(&config).await?,
            ProfileAction::Update { name, email, organization, photo } => {
                cmd::cmd_profile_update(&config, name, email, organization, photo).await?;
            }
        },
        Commands::Comment { action } => match action {
            CommentAction::Add { text, at } => cmd::cmd_comment_add(&config, &text, at)?,
            CommentAction::List => cmd::cmd_comment_list(&config),
            CommentAction::Delete { id } => cmd::cmd_comment_delete(&config, id)?,
        },
        Commands::Draw { at, points, color } => {
            cmd::cmd_draw(&config, at, &points, color.as_deref())?;
        }
        Commands::Drawings { at, clear } => {
            if clear {
                cmd::cmd_drawings_clear(&config);
            } else {
                cmd::cmd_drawings(&config, at.unwrap_or_default());
            }
        }
        Commands::Task { action } => match action {
            TaskAction::Add { title, description, priority, at } => {
                cmd::cmd_task_add(&config, &title, &description, priority.into(), at)?;
            }
            TaskAction::List { priority } => {
                let filter = priority.map_or(PriorityFilter::All, |p| PriorityFilter::Only(p.into()));
                cmd::cmd_task_list(&config, filter);
            }
            TaskAction::Toggle { id } => cmd::cmd_task_toggle(&config, &id)?,
            TaskAction::Edit { id, title, description, priority } => {
                cmd::cmd_task_edit(
                    &config,
                    &id,
                    title.as_deref(),
                    description.as_deref(),
                    priority.map(Into::into),
                )?;
            }
            TaskAction::Delete { id } => cmd::cmd_task_delete(&config, &id)?,
        },
        Commands::Seek { secs, duration } => {
            cmd::cmd_seek(&config, secs, duration)?;
        }
    }

    Ok(())
}
