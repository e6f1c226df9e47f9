//! CLI layer: argument parsing, store wiring, dispatch, rendering. Everything
//! from the library's API facade inward is UI-agnostic; all terminal concerns
//! live here.

pub mod commands;
pub mod render;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trowelapp::api::FindsApi;
use trowelapp::location::{FixedLocation, LocationProvider, SiteLocation, UnavailableLocation};
use trowelapp::media::PickedFile;
use trowelapp::model::FindInput;
use trowelapp::paths;
use trowelapp::session::SessionMode;
use trowelapp::sites;
use trowelapp::store::fs::{FsBlobStore, FsRecordStore};
use trowelapp::user::{FsUserStore, User, UserStore};

use self::commands::{Cli, Command, SitesAction};

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = paths::data_dir()?;
    dispatch(cli.command, &data_dir)
}

fn dispatch(command: Command, data_dir: &Path) -> anyhow::Result<()> {
    let users = FsUserStore::new(data_dir.to_path_buf());

    match command {
        Command::Login {
            name,
            email,
            role,
            site,
        } => {
            let user = User::new(&name, &email, &role, &site)?;
            users.save(&user)?;
            render::logged_in(&user);
            Ok(())
        }
        Command::Logout => {
            users.clear()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            let user = require_login(&users)?;
            render::whoami(&user);
            Ok(())
        }
        Command::Sites { action } => match action {
            Some(SitesAction::Add { name }) => {
                if sites::add(data_dir, &name)? {
                    println!("Site added: {}", name);
                } else {
                    println!("Site already known: {}", name);
                }
                Ok(())
            }
            None => {
                render::sites(&sites::all(data_dir));
                Ok(())
            }
        },
        other => {
            let user = require_login(&users)?;
            let mut api = FindsApi::new(
                FsRecordStore::new(data_dir.to_path_buf()),
                FsBlobStore::new(paths::media_dir(data_dir)),
                user,
            );
            run_find_command(other, &mut api, data_dir)
        }
    }
}

fn run_find_command(
    command: Command,
    api: &mut FindsApi<FsRecordStore, FsBlobStore>,
    data_dir: &Path,
) -> anyhow::Result<()> {
    match command {
        Command::Add {
            plot,
            layer,
            description,
            id,
            location,
            media,
        } => {
            let mut session = api.open_new(id);
            let picked = read_picked(&media)?;
            let staged = session.attach(picked)?;
            if staged < media.len() {
                eprintln!(
                    "Skipped {} file(s) that are not photos or video.",
                    media.len() - staged
                );
            }

            let input = FindInput::new(plot, layer, description)?;
            let provider: Box<dyn LocationProvider> = match location {
                Some(loc) => Box::new(FixedLocation(loc)),
                None => Box::new(SiteLocation {
                    site: api.user().site.clone(),
                    data_dir: data_dir.to_path_buf(),
                }),
            };

            let find = api.save_find(session, input, provider.as_ref())?;
            render::saved(&find);
            Ok(())
        }
        Command::List => {
            render::list(&api.list_finds()?);
            Ok(())
        }
        Command::Show { id } => match api.get_find(&id)? {
            Some(view) => {
                render::detail(&view);
                Ok(())
            }
            None => anyhow::bail!("Find not found: {}", id),
        },
        Command::Edit {
            id,
            plot,
            layer,
            description,
            add_media,
            remove_media,
        } => {
            let mut session = api.open_edit(&id)?;
            let (current_plot, current_layer, current_description) = match session.mode() {
                SessionMode::Edit { original } => (
                    original.plot.clone(),
                    original.layer.clone(),
                    original.description.clone(),
                ),
                SessionMode::New { .. } => unreachable!("open_edit always yields an edit session"),
            };

            for media_id in &remove_media {
                if !session.detach(media_id) {
                    eprintln!("No attached media with id {}, ignoring.", media_id);
                }
            }
            if !add_media.is_empty() {
                session.attach(read_picked(&add_media)?)?;
            }

            let input = FindInput::new(
                plot.unwrap_or(current_plot),
                layer.unwrap_or(current_layer),
                description.unwrap_or(current_description),
            )?;

            // Location is immutable after creation; edits never consult a
            // provider.
            let find = api.save_find(session, input, &UnavailableLocation)?;
            render::saved(&find);
            Ok(())
        }
        Command::Rm { id, yes } => {
            if !yes && !confirm(&format!("Delete find {} and its media?", id))? {
                println!("Aborted.");
                return Ok(());
            }
            let outcome = api.delete_find(&id)?;
            println!("Deleted {}.", outcome.removed.id);
            if !outcome.failed_blob_ids.is_empty() {
                eprintln!(
                    "Could not clean up {} media file(s); they are orphaned but harmless.",
                    outcome.failed_blob_ids.len()
                );
            }
            Ok(())
        }
        Command::Export { output } => {
            let summary = api.export(output)?;
            println!(
                "Exported {} find(s), {} media file(s) to {}",
                summary.finds,
                summary.blobs,
                summary.path.display()
            );
            if summary.missing_blobs > 0 {
                eprintln!("{} media reference(s) had no stored file.", summary.missing_blobs);
            }
            Ok(())
        }
        Command::Import { path } => {
            let summary = api.import(&path)?;
            println!(
                "Imported {} find(s) ({} media), skipped {} existing.",
                summary.added, summary.blobs, summary.skipped
            );
            Ok(())
        }
        Command::Login { .. }
        | Command::Logout
        | Command::Whoami
        | Command::Sites { .. } => unreachable!("handled in dispatch"),
    }
}

fn require_login(users: &FsUserStore) -> anyhow::Result<User> {
    users
        .load()
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `trowel login` first."))
}

fn read_picked(paths: &[PathBuf]) -> anyhow::Result<Vec<PickedFile>> {
    let mut files = Vec::new();
    for path in paths {
        let bytes =
            std::fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(PickedFile {
            name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
