//! Command line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory holding devices.yaml, pacer.yaml and songs/
    /// (defaults to $PATERNOLOGIA_DATA_DIR or the platform data dir)
    #[arg(short = 'd', long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List songs
    Songs,

    /// List devices and their MIDI channels
    Devices,

    /// List MIDI ports the pedal could be reached on
    Ports,

    /// Write a song's Pacer preset to a .syx file
    Export {
        song_id: String,

        /// Target preset slot (CURRENT, A1-D6); defaults to the song's own
        #[arg(short, long)]
        preset: Option<String>,

        /// Output file (defaults to <song_id>_<PRESET>.syx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send a song's Pacer preset to the pedal
    Send {
        song_id: String,

        /// Target preset slot (CURRENT, A1-D6); defaults to the song's own
        #[arg(short, long)]
        preset: Option<String>,

        /// amidi port (e.g. hw:2,0,0), overrides pacer.yaml
        #[arg(long)]
        port: Option<String>,

        /// Send through midir instead of amidi
        #[cfg(feature = "direct-midi")]
        #[arg(long)]
        direct: bool,
    },
}
