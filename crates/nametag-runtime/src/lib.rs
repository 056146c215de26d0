mod assets;
mod error;
mod roster;
mod worker;

pub use assets::{load_font, load_template};
pub use error::{Result, RuntimeError};
pub use roster::{LoadedRoster, load_roster_csv, parse_roster};
pub use worker::worker_task;

use std::path::PathBuf;

// Re-export types from the engine crate
pub use nametag_engine::{
    CancelToken, FontBook, GenerationRequest, GenerationStatistics, ProjectSettings, RosterEntry,
    Template,
};

/// Commands sent from the UI to the worker
#[derive(Debug)]
pub enum NametagCommand {
    LoadRoster {
        path: PathBuf,
    },
    LoadTemplate {
        path: PathBuf,
        /// Defaults to the file stem
        id: Option<String>,
    },
    LoadSettings {
        path: PathBuf,
    },
    SaveSettings {
        settings: ProjectSettings,
        path: PathBuf,
    },
    /// Page/slot summary for the current editor state
    CalculateStats {
        request: GenerationRequest,
    },
    Generate {
        request: GenerationRequest,
        fonts: FontBook,
        output_path: PathBuf,
        /// Keep a clone to cancel the run
        cancel: CancelToken,
    },
}

/// Updates sent from the worker to the UI
#[derive(Debug, Clone)]
pub enum NametagUpdate {
    Progress {
        current: usize,
        total: usize,
    },
    RosterLoaded {
        roster: LoadedRoster,
    },
    TemplateLoaded {
        template: Template,
    },
    SettingsLoaded {
        settings: ProjectSettings,
    },
    SettingsSaved {
        path: PathBuf,
    },
    StatsCalculated {
        stats: GenerationStatistics,
    },
    GenerationComplete {
        path: PathBuf,
        page_count: usize,
        entry_count: usize,
        blank_count: usize,
        degraded_entries: usize,
    },
    GenerationCancelled {
        completed: usize,
    },
    Error {
        message: String,
    },
}
