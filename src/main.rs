use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use git_ship::analyzer::{next_version, Release, ReleaseAssembler, UnmarkedPolicy};
use git_ship::changelog;
use git_ship::config::{self, Config};
use git_ship::domain::{ReleaseType, Version};
use git_ship::git::GitCli;
use git_ship::manifest::exclude::split_patterns;
use git_ship::manifest::{ExclusionSet, ManifestBuilder, UnreadablePolicy};
use git_ship::ui;

#[derive(Parser)]
#[command(
    name = "git-ship",
    version,
    about = "Build release notes from gitmoji commits and content-addressed deploy manifests"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log pipeline details to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe the changes since the previous release
    Release {
        #[arg(long, help = "Version being released (e.g., 1.2.0)")]
        version: Option<String>,

        #[arg(long, conflicts_with = "version", help = "Bump the previous version: patch, minor or major")]
        bump: Option<ReleaseType>,

        #[arg(long, help = "Print the release as JSON instead of a changelog")]
        json: bool,

        #[arg(long, help = "Keep :code: markers in changelog subjects")]
        keep_markers: bool,

        #[arg(long, value_enum, help = "How to treat commits without a :code: marker")]
        unmarked: Option<UnmarkedArg>,
    },
    /// Print the deployment manifest of a directory tree
    Manifest {
        #[arg(long, default_value = ".", help = "Directory to describe")]
        root: String,

        #[arg(long, help = "Comma-separated exclusion regexes")]
        exclude: Option<String>,

        #[arg(long, help = "Leave unreadable files out instead of failing")]
        skip_unreadable: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnmarkedArg {
    Fail,
    Miscellaneous,
}

impl From<UnmarkedArg> for UnmarkedPolicy {
    fn from(arg: UnmarkedArg) -> Self {
        match arg {
            UnmarkedArg::Fail => UnmarkedPolicy::Fail,
            UnmarkedArg::Miscellaneous => UnmarkedPolicy::Miscellaneous,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "git_ship=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Release {
            version,
            bump,
            json,
            keep_markers,
            unmarked,
        } => {
            let policy = unmarked
                .map(UnmarkedPolicy::from)
                .unwrap_or(config.release.unmarked_commits);
            let release = build_release(&config, version.as_deref(), bump, policy)?;

            for warning in &release.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_status(&ui::release_summary(&release));

            if json {
                ui::print_json(&release)?;
            } else {
                ui::print_text(&changelog::render_markdown(&release, !keep_markers))?;
            }
        }
        Command::Manifest {
            root,
            exclude,
            skip_unreadable,
        } => {
            let mut patterns = config.manifest.exclude.clone();
            if let Some(list) = exclude {
                patterns.extend(split_patterns(&list));
            }
            let policy = if skip_unreadable {
                UnreadablePolicy::Skip
            } else {
                config.manifest.on_unreadable
            };

            let manifest = ManifestBuilder::new(&root)
                .with_exclusions(ExclusionSet::new(&patterns)?)
                .with_unreadable_policy(policy)
                .build()?;

            for warning in &manifest.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_success(&ui::manifest_summary(&manifest));
            ui::print_json(&manifest)?;
        }
    }

    Ok(())
}

fn build_release(
    config: &Config,
    version: Option<&str>,
    bump: Option<ReleaseType>,
    policy: UnmarkedPolicy,
) -> Result<Release> {
    let git = GitCli::open(".")?;
    let (owner, name) = repository_identity(config, &git);

    let assembler = ReleaseAssembler::new(&git)
        .with_repository(owner, name)
        .with_unmarked_policy(policy);
    let commits = assembler.commits(None)?;

    if let Some(version) = version {
        return Ok(assembler.assemble(version, &commits)?);
    }

    // Assemble first to learn the previous release, then pick the version.
    let provisional = assembler.assemble("0.0.0", &commits)?;
    let target = match bump {
        Some(release_type) => Version::parse(&provisional.previous)
            .map(|previous| previous.increment(release_type))
            .unwrap_or_else(|_| Version::new(0, 1, 0)),
        None => next_version(&provisional.previous, &provisional.changes),
    };
    Ok(provisional.retarget(&target))
}

fn repository_identity(config: &Config, git: &GitCli) -> (String, String) {
    let from_remote = git.remote_slug("origin");
    let dir_name = git
        .workdir()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let owner = config
        .release
        .owner
        .clone()
        .or_else(|| from_remote.as_ref().map(|(owner, _)| owner.clone()))
        .unwrap_or_default();
    let name = config
        .release
        .name
        .clone()
        .or_else(|| from_remote.map(|(_, name)| name))
        .unwrap_or(dir_name);

    (owner, name)
}
