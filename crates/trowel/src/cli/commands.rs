use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trowel",
    about = "Field recording for archaeological surveys",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in as the surveyor using this device
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
        /// Assigned survey site; new finds are recorded against it
        #[arg(long)]
        site: String,
    },
    /// Forget the current surveyor
    Logout,
    /// Show the current surveyor
    Whoami,
    /// Record a new find
    Add {
        #[arg(long)]
        plot: String,
        #[arg(long)]
        layer: String,
        #[arg(long)]
        description: String,
        /// Pre-printed find id; rejected if it already exists
        #[arg(long)]
        id: Option<String>,
        /// "lat,lon" override; defaults to the site's registered coordinates
        #[arg(long)]
        location: Option<String>,
        /// Photo/video files to attach (repeatable)
        #[arg(long = "media", value_name = "FILE")]
        media: Vec<PathBuf>,
    },
    /// List finds, newest first
    List,
    /// Show one find with its media
    Show { id: String },
    /// Edit a find; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        plot: Option<String>,
        #[arg(long)]
        layer: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Additional photo/video files to attach (repeatable)
        #[arg(long = "add-media", value_name = "FILE")]
        add_media: Vec<PathBuf>,
        /// Media ids to detach; their blobs are deleted on save (repeatable)
        #[arg(long = "remove-media", value_name = "MEDIA_ID")]
        remove_media: Vec<String>,
    },
    /// Delete a find and its media
    Rm {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Export all finds and their media to a .tar.gz bundle
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import finds from a bundle, skipping ids that already exist
    Import { path: PathBuf },
    /// List known survey sites
    Sites {
        #[command(subcommand)]
        action: Option<SitesAction>,
    },
}

#[derive(Subcommand)]
pub enum SitesAction {
    /// Register a new site by name
    Add { name: String },
}
