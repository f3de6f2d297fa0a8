use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::api::EventType;

#[derive(Parser)]
#[command(name = "studyctl")]
#[command(about = "A terminal client for the study orchestrator backend")]
#[command(long_about = "studyctl - study sessions from the terminal

Create and run timed study sessions, generate AI study plans, block
distracting websites and check on the study orchestrator backend.

QUICK START:
  studyctl session create Math -d 25 -g \"Review algebra\" --run
  studyctl session list          Show all sessions
  studyctl plan Physics -d 60    Generate a study plan
  studyctl calendar list         Show the study calendar
  studyctl status                Check the backend

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  studyctl <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output, or 'json' for
    /// machine-readable output. Defaults to `general.default_output`
    /// from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL, overriding `api.base_url`
    #[arg(long, env = "STUDYCTL_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage and run study sessions
    ///
    /// # Subcommands
    ///
    ///   list     List all sessions
    ///   show     Show one session
    ///   create   Create a session, optionally with a plan
    ///   run      Start a session and run its countdown
    ///   end      Record the outcome of a session
    ///
    /// # Examples
    ///
    ///   studyctl session create Math -d 25 -g "Review algebra"
    ///   studyctl session run 3f2a...
    ///   studyctl session end 3f2a... --score 80 --completed "Review algebra"
    #[command(alias = "s")]
    Session(SessionArgs),

    /// Generate an AI study plan
    ///
    /// # Examples
    ///
    ///   studyctl plan Chemistry -d 90 -g "Balance equations"
    Plan(PlanArgs),

    /// Block distracting websites
    ///
    /// With no websites given, blocks the list from `blocking.websites`
    /// in the config file.
    ///
    /// # Examples
    ///
    ///   studyctl block
    ///   studyctl block reddit.com https://www.youtube.com -d 50
    Block(BlockArgs),

    /// Unblock all websites
    Unblock,

    /// Show backend and integration status
    Status,

    /// Probe every backend endpoint and rate response times
    #[command(alias = "health")]
    Diagnose,

    /// Show study analytics
    #[command(alias = "stats")]
    Analytics,

    /// Manage calendar events
    ///
    /// # Subcommands
    ///
    ///   list             List events by day
    ///   show             Show one event
    ///   create           Add an event
    ///   update           Change an event's title, description or type
    ///   delete           Remove an event
    ///   schedule-break   Schedule a study block followed by a break
    ///   sync             Sync with the external calendar
    ///
    /// # Examples
    ///
    ///   studyctl calendar create "Exam prep" --at "tomorrow 10:00" -d 90 --type exam
    ///   studyctl calendar list --date 2024-03-01
    ///   studyctl cal schedule-break --study 50 --break 10
    #[command(alias = "cal")]
    Calendar(CalendarArgs),

    /// View and edit study preferences
    ///
    /// # Subcommands
    ///
    ///   show                    Show current preferences
    ///   set                     Change durations, times or toggles
    ///   add-website             Block another site
    ///   remove-website          Stop blocking a site
    ///   add-default-websites    Add the recommended sites
    ///   clear-websites          Remove every site
    ///   add-technique           Add a focus technique
    ///   remove-technique        Remove a focus technique
    ///   add-default-techniques  Add the recommended techniques
    ///   reset                   Restore recommended preferences
    ///   export                  Write preferences to a JSON file
    ///   import                  Read preferences from a JSON file
    #[command(alias = "preferences")]
    Prefs(PrefsArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   studyctl completions bash > ~/.local/share/bash-completion/completions/studyctl
    ///   studyctl completions zsh --install
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        install: bool,
    },
}

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommands,
}

/// Session subcommands.
#[derive(Subcommand)]
pub enum SessionCommands {
    /// List all sessions
    #[command(alias = "ls")]
    List,

    /// Show one session
    Show {
        /// Session ID
        id: String,
    },

    /// Create a session
    ///
    /// Generates an AI study plan for it unless --no-plan is given.
    Create {
        /// Subject to study
        subject: String,

        /// Duration in minutes (default: `session.default_duration_minutes`)
        #[arg(short, long)]
        duration: Option<u32>,

        /// Goal for the session (repeatable)
        #[arg(short, long = "goal")]
        goals: Vec<String>,

        /// Skip plan generation
        #[arg(long)]
        no_plan: bool,

        /// Start the session right away
        #[arg(long)]
        run: bool,
    },

    /// Start a session and run its countdown in the foreground
    ///
    /// While running, type a command and press Enter:
    ///   p  pause or resume     e [score]  end now
    ///   s  show status         d  discard without recording
    ///   q  quit without ending (the backend keeps the session active)
    Run {
        /// Session ID
        id: String,

        /// Do not block websites for this session
        #[arg(long)]
        no_block: bool,
    },

    /// Record the outcome of a session without running it
    End {
        /// Session ID
        id: String,

        /// Focus score from 0 to 100 (default: `session.default_focus_score`)
        #[arg(long)]
        score: Option<u8>,

        /// Goal that was completed (repeatable)
        #[arg(long = "completed")]
        completed: Vec<String>,

        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,

        /// Number of distractions
        #[arg(long, default_value_t = 0)]
        distractions: u32,

        /// Number of breaks taken
        #[arg(long, default_value_t = 0)]
        breaks: u32,
    },
}

#[derive(Args)]
pub struct PlanArgs {
    /// Subject to plan for
    pub subject: String,

    /// Duration in minutes (default: `session.default_duration_minutes`)
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Goal to plan around (repeatable)
    #[arg(short, long = "goal")]
    pub goals: Vec<String>,
}

#[derive(Args)]
pub struct BlockArgs {
    /// Websites to block (default: `blocking.websites`)
    pub websites: Vec<String>,

    /// How long to block, in minutes
    #[arg(short, long, default_value_t = 25)]
    pub duration: u32,
}

#[derive(Args)]
pub struct CalendarArgs {
    #[command(subcommand)]
    pub command: CalendarCommands,
}

/// Calendar subcommands.
#[derive(Subcommand)]
pub enum CalendarCommands {
    /// List events grouped by day
    #[command(alias = "ls")]
    List {
        /// Only show events on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show one event
    Show {
        /// Event ID
        id: String,
    },

    /// Add an event
    Create {
        /// Event title
        title: String,

        /// Start time: YYYY-MM-DDTHH:MM, YYYY-MM-DD, HH:MM, today or
        /// tomorrow (default: now)
        #[arg(long)]
        at: Option<String>,

        /// Duration in minutes
        #[arg(short, long, default_value_t = 30)]
        duration: u32,

        /// Event type: study_session, break, assignment, exam or meeting
        #[arg(long = "type", default_value = "study_session")]
        event_type: EventType,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change an event
    Update {
        /// Event ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New event type
        #[arg(long = "type")]
        event_type: Option<EventType>,
    },

    /// Delete an event
    #[command(alias = "rm")]
    Delete {
        /// Event ID
        id: String,
    },

    /// Schedule a study block followed by a break
    ScheduleBreak {
        /// Study length in minutes
        #[arg(long, default_value_t = 25)]
        study: u32,

        /// Break length in minutes
        #[arg(long = "break", default_value_t = 5)]
        break_minutes: u32,

        /// Start time, as for `create` (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Sync events with the external calendar
    Sync,
}

#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommands,
}

/// Preferences subcommands.
#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Show current preferences
    Show,

    /// Change scalar preferences
    Set {
        /// Default study duration in minutes
        #[arg(long)]
        study_duration: Option<u32>,

        /// Default break duration in minutes
        #[arg(long)]
        break_duration: Option<u32>,

        /// Preferred study times, comma separated (HH:MM)
        #[arg(long, value_delimiter = ',')]
        times: Option<Vec<String>>,

        /// Enable or disable notifications
        #[arg(long)]
        notifications: Option<bool>,

        /// Enable or disable automatic website blocking
        #[arg(long)]
        auto_block: Option<bool>,
    },

    /// Add a website to the block list
    AddWebsite {
        /// Domain or URL
        website: String,
    },

    /// Remove a website from the block list
    RemoveWebsite {
        /// Domain or URL
        website: String,
    },

    /// Add the recommended distracting websites
    AddDefaultWebsites,

    /// Remove every website from the block list
    ClearWebsites,

    /// Add a focus technique
    AddTechnique {
        /// Technique name
        technique: String,
    },

    /// Remove a focus technique
    RemoveTechnique {
        /// Technique name
        technique: String,
    },

    /// Add the recommended focus techniques
    AddDefaultTechniques,

    /// Restore the recommended preferences
    Reset,

    /// Write preferences to a JSON file
    Export {
        /// Destination (default: ~/.studyctl/exports/preferences.json)
        path: Option<PathBuf>,
    },

    /// Merge preferences from a JSON file and save them
    Import {
        /// JSON file to read
        path: PathBuf,
    },
}
