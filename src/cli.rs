use clap::Parser;
use std::path::PathBuf;

// Build version with backend info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Video:  playa-ffmpeg 8.0 (static)\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Showreel player - cycles looping preview clips on click
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Directory containing the preview clips (reel-1.mp4, reel-2.mp4, ...)
    #[arg(value_name = "DIR")]
    pub media_dir: Option<PathBuf>,

    /// Number of clips in the rotation (default: discovered from DIR, else 4)
    #[arg(short = 'n', long = "clips", value_name = "N")]
    pub clips: Option<u32>,

    /// Start in fullscreen mode
    #[arg(short = 'F', long = "fullscreen")]
    pub fullscreen: bool,

    /// Disable all stage animation (state-driven rendering only)
    #[arg(long = "no-anim")]
    pub no_anim: bool,

    /// Force the loading gate open after this many seconds
    #[arg(long = "load-timeout", value_name = "SECS", default_value = "20")]
    pub load_timeout: u64,

    /// Enable debug logging to file (default: showreel.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}
