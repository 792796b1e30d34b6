//! CLI commands for ClubHub using clap.

pub mod display;
pub mod menu;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{resolve_settings, OrphanPolicy, Settings};
use crate::persist::{self, LoadReport};
use crate::registry::{Registry, StudentId};

pub use menu::Menu;

/// ClubHub - student clubs and their members.
#[derive(Parser)]
#[command(name = "clubhub")]
#[command(version = "0.1.0")]
#[command(about = "ClubHub - track students, clubs and memberships", long_about = None)]
pub struct Commands {
    /// Settings file (default: ~/.clubhub/settings.json)
    #[arg(long, global = true, env = "CLUBHUB_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the interactive menu (default)
    Menu {
        /// Load this file before showing the menu
        #[arg(long)]
        load: Option<PathBuf>,
    },

    /// Validate a saved registry file
    Check {
        /// Registry file
        file: PathBuf,

        /// Drop dangling membership references instead of failing
        #[arg(long)]
        skip_orphans: bool,
    },

    /// Print every student and club in a saved file
    Show {
        /// Registry file
        file: PathBuf,
    },

    /// List the members of a club in a saved file
    Members {
        /// Registry file
        file: PathBuf,

        /// Club name
        club: String,
    },

    /// List the clubs of a student in a saved file
    Clubs {
        /// Registry file
        file: PathBuf,

        /// Student ID
        student_id: StudentId,
    },
}

impl Commands {
    pub fn run(&self) -> Result<()> {
        let settings = resolve_settings(self.settings.as_deref())?;
        tracing::debug!(
            "Settings: max_clubs={}, orphans={}",
            settings.max_clubs,
            settings.load.orphans
        );

        match &self.command {
            None => cmd_menu(&settings, None),
            Some(Command::Menu { load }) => cmd_menu(&settings, load.as_deref()),
            Some(Command::Check { file, skip_orphans }) => cmd_check(&settings, file, *skip_orphans),
            Some(Command::Show { file }) => cmd_show(&settings, file),
            Some(Command::Members { file, club }) => cmd_members(&settings, file, club),
            Some(Command::Clubs { file, student_id }) => cmd_clubs(&settings, file, *student_id),
        }
    }
}

fn read_file(settings: &Settings, file: &Path, orphans: OrphanPolicy) -> Result<(Registry, LoadReport)> {
    persist::read_system_state(file, settings.max_clubs, orphans)
        .with_context(|| format!("Failed to read {}", file.display()))
}

fn cmd_menu(settings: &Settings, load: Option<&Path>) -> Result<()> {
    let mut registry = Registry::with_settings(settings);

    if let Some(path) = load {
        let report = persist::load_system_state(&mut registry, path, settings.load.orphans)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        println!("Loaded {}: {}", path.display(), report);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&mut registry, settings, stdin.lock(), stdout.lock()).run()
}

fn cmd_check(settings: &Settings, file: &Path, skip_orphans: bool) -> Result<()> {
    let orphans = if skip_orphans {
        OrphanPolicy::Skip
    } else {
        settings.load.orphans
    };
    let (_, report) = read_file(settings, file, orphans)?;
    println!("{}: OK ({})", file.display(), report);
    Ok(())
}

fn cmd_show(settings: &Settings, file: &Path) -> Result<()> {
    let (registry, _) = read_file(settings, file, settings.load.orphans)?;
    let mut out = io::stdout().lock();
    display::write_registry(&mut out, &registry)?;
    out.flush()?;
    Ok(())
}

fn cmd_members(settings: &Settings, file: &Path, club: &str) -> Result<()> {
    let (registry, _) = read_file(settings, file, settings.load.orphans)?;
    let members = registry.members_of(club)?;
    display::write_members(&mut io::stdout().lock(), club, &members)?;
    Ok(())
}

fn cmd_clubs(settings: &Settings, file: &Path, student_id: StudentId) -> Result<()> {
    let (registry, _) = read_file(settings, file, settings.load.orphans)?;
    let clubs = registry.clubs_of(student_id)?;
    if let Some(student) = registry.store().student(student_id) {
        display::write_clubs(&mut io::stdout().lock(), student, &clubs)?;
    }
    Ok(())
}
