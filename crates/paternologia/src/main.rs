//! paternologia - per-song presets for the Nektar Pacer
//!
//! Reads songs and devices from the data directory, exports a song to a
//! `.syx` file or sends it straight to the pedal.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use paternologia_core::config::default_data_dir;
use paternologia_core::{Song, Storage};
use paternologia_pacer::{
    export_song, list_amidi_ports, read_pacer_config, AmidiSender, PacerConfig, SysexSender,
    SyxExport,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    // Set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(cli.data_dir.unwrap_or_else(default_data_dir));
    log::debug!("main: data directory {:?}", storage.data_dir());

    match cli.command {
        Command::Songs => list_songs(&storage),
        Command::Devices => list_devices(&storage),
        Command::Ports => list_ports(),
        Command::Export {
            song_id,
            preset,
            output,
        } => {
            let config = pacer_config(&storage)?;
            let export = export_to_preset(&storage, &config, &song_id, preset.as_deref())?;
            let path = output.unwrap_or_else(|| PathBuf::from(export.file_name()));
            std::fs::write(&path, &export.data)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!(
                "Wrote {} ({} frames, {} bytes) for preset {}",
                path.display(),
                export.frames().count(),
                export.data.len(),
                export.preset
            );
            Ok(())
        }
        Command::Send {
            song_id,
            preset,
            port,
            #[cfg(feature = "direct-midi")]
            direct,
        } => {
            let mut config = pacer_config(&storage)?;
            let export = export_to_preset(&storage, &config, &song_id, preset.as_deref())?;
            if port.is_some() {
                config.amidi_port = port;
            }

            #[cfg(feature = "direct-midi")]
            if direct {
                let sender = paternologia_pacer::DirectSender::from_config(&config)?;
                return send(sender, &export);
            }

            let sender = AmidiSender::from_config(&config)?;
            send(sender, &export)
        }
    }
}

/// `pacer.yaml`, or defaults (port found by device name) when there is none
fn pacer_config(storage: &Storage) -> Result<PacerConfig> {
    let path = storage.pacer_config_path();
    match read_pacer_config(&path)? {
        Some(config) => Ok(config),
        None => {
            log::info!("pacer_config: {:?} not found, using defaults", path);
            Ok(PacerConfig::default())
        }
    }
}

fn load_song(storage: &Storage, song_id: &str) -> Result<Song> {
    match storage.get_song(song_id)? {
        Some(song) => Ok(song),
        None => bail!("Song not found: {}", song_id),
    }
}

/// Export a song to the given preset, falling back to the song's own target
fn export_to_preset(
    storage: &Storage,
    config: &PacerConfig,
    song_id: &str,
    preset: Option<&str>,
) -> Result<SyxExport> {
    let song = load_song(storage, song_id)?;
    let devices = storage.get_devices()?;

    let export = export_song(&song, &devices, preset, &config.protocol)
        .with_context(|| format!("Failed to export song '{}'", song_id))?;
    log::info!(
        "export: '{}' -> {} ({} bytes)",
        song_id,
        export.preset,
        export.data.len()
    );
    Ok(export)
}

fn send(mut sender: impl SysexSender, export: &SyxExport) -> Result<()> {
    sender
        .send(&export.data)
        .with_context(|| format!("Failed to send to {}", sender.destination()))?;
    println!(
        "Sent '{}' to preset {} via {}",
        export.song_id,
        export.preset,
        sender.destination()
    );
    Ok(())
}

fn list_songs(storage: &Storage) -> Result<()> {
    let songs = storage.get_songs()?;
    if songs.is_empty() {
        println!("No songs in {}", storage.data_dir().display());
    }
    for song in songs {
        let actions: usize = song.pacer.iter().map(|b| b.actions.len()).sum();
        println!(
            "{:<20} {:<28} {:<8} {} buttons, {} actions",
            song.song.id,
            song.song.name,
            song.song.pacer_export.target_preset,
            song.pacer.len(),
            actions
        );
    }
    Ok(())
}

fn list_devices(storage: &Storage) -> Result<()> {
    let devices = storage.get_devices()?;
    if devices.is_empty() {
        println!("No devices in {}", storage.data_dir().display());
    }
    for device in devices {
        println!(
            "{:<12} ch {:<3} {}",
            device.id,
            device.midi_channel + 1,
            device.name
        );
    }
    Ok(())
}

fn list_ports() -> Result<()> {
    for port in list_amidi_ports()? {
        println!("{:<3} {:<12} {}", port.direction, port.device, port.name);
    }

    #[cfg(feature = "direct-midi")]
    for name in paternologia_pacer::list_output_ports()? {
        println!("midi {}", name);
    }

    Ok(())
}
