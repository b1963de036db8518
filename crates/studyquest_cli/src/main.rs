mod config;
mod store;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use studyquest_core::core_api::{Action, CharacterState, Session};
use studyquest_core::quota::QuotaField;
use studyquest_render::{
    SnapshotMeta, countdown_label, format_timestamp, local_date, render_dashboard,
    render_payload_json, serialize_snapshot,
};

use config::Config;
use store::StateStore;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// State file (overrides `state_path` from the config)
    #[arg(long, global = true, value_name = "PATH")]
    state: Option<PathBuf>,
    /// Print the state as canonical JSON instead of the dashboard
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the character sheet
    Show,
    /// Log study hours (+10 EXP / -10 HP each)
    Study {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        hours: u32,
    },
    /// Log practice questions (+2 EXP / -5 HP each)
    Practice {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Log boss fights, i.e. full mock exams (+10 EXP / -20 HP each)
    Boss {
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Restore HP to full
    Heal,
    /// Show or hide the AP gauge
    ToggleAp,
    /// Move a weekly quota counter
    Weekly {
        #[arg(value_name = "zhonghui|essay", value_parser = parse_quota_field)]
        field: QuotaField,
        #[arg(default_value_t = 1, allow_hyphen_values = true)]
        delta: i64,
    },
    /// Zero both weekly counters
    ResetWeekly,
    /// Write a Markdown snapshot for archiving
    Export {
        /// Directory to write into (defaults to `export_dir` or the cwd)
        #[arg(long, value_name = "DIR", conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the document instead of writing a file
        #[arg(long)]
        stdout: bool,
    },
    /// Create a fresh state file
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    fn actions(&self) -> Vec<Action> {
        match *self {
            Self::Study { hours } => vec![Action::Study { hours }],
            Self::Practice { count } => vec![Action::Practice { count }],
            Self::Boss { count } => vec![Action::Boss { count }],
            Self::Heal => vec![Action::HealFull],
            Self::ToggleAp => vec![Action::ToggleAp],
            Self::Weekly { field, delta } => vec![Action::AdjustWeekly { field, delta }],
            Self::ResetWeekly => vec![Action::ResetWeekly],
            Self::Show | Self::Export { .. } | Self::Init { .. } => Vec::new(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)?;

    let state_path = cli
        .state
        .clone()
        .or_else(|| config.state_path.clone())
        .unwrap_or_else(Config::default_state_path);
    let store = StateStore::new(state_path);
    let fallback = config.state_defaults().build();
    let command = cli.command.unwrap_or(Command::Show);

    if let Command::Init { force } = command {
        if store.exists() && !force {
            bail!(
                "state file {} already exists; pass --force to overwrite it",
                store.path().display()
            );
        }
        store.save(&fallback)?;
        println!("Initialised {}", store.path().display());
        print_state(&fallback, &snapshot_meta(&config), cli.json)?;
        return Ok(());
    }

    let mut session = Session::new(store.load(fallback)?);
    session.apply_all(&command.actions());
    if session.is_dirty() {
        log::debug!("saving after {} action(s)", session.revision());
        store.save(session.state())?;
    }
    let state = session.into_state();

    let meta = snapshot_meta(&config);
    if let Command::Export { output, stdout } = command {
        let export = serialize_snapshot(&state, &meta);
        if stdout {
            print!("{}", export.document);
            return Ok(());
        }
        let dir = output
            .or_else(|| config.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(&export.file_name);
        fs::write(&path, &export.document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote snapshot to {}", path.display());
        return Ok(());
    }

    print_state(&state, &meta, cli.json)
}

fn snapshot_meta(config: &Config) -> SnapshotMeta {
    let now = Utc::now();
    let offset = config.offset();
    let mut meta = SnapshotMeta::new(
        config.title.clone(),
        config.player.clone(),
        format_timestamp(now, offset),
    )
    .with_file_prefix(config.export_prefix.clone())
    .with_bar_width(config.bar_width);

    let countdown = config.countdown_label.clone().or_else(|| {
        config
            .exam_date
            .map(|exam| countdown_label(local_date(now, offset), exam))
    });
    if let Some(countdown) = countdown {
        meta = meta.with_countdown(countdown);
    }
    meta
}

fn print_state(state: &CharacterState, meta: &SnapshotMeta, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(&render_payload_json(state, meta))
            .context("failed to render JSON output")?;
        println!("{rendered}");
    } else {
        print!("{}", render_dashboard(state, meta));
    }
    Ok(())
}

fn parse_quota_field(value: &str) -> Result<QuotaField, String> {
    value.parse()
}
