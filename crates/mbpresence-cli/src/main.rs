//! mbpresence - polls MusicBee over IPC and publishes what is playing

// The IPC transport only exists on Windows; elsewhere the binary just reports that
#![cfg_attr(not(windows), allow(dead_code, unused_imports))]

mod artwork;
mod presence;

use artwork::Artwork;
use clap::Parser;
use colored::Colorize;
use mbpresence_ipc::{IPC_WINDOW_TITLE, IpcConfig, SEGMENT_NAME_PREFIX, TrackStatus};
use presence::{ConsoleSink, Presence, PresencePublisher, now_playing_label};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mbpresence")]
#[command(about = "MusicBee now-playing presence - reads playback state over the MusicBee IPC plugin")]
#[command(version)]
struct Args {
    /// Poll interval in milliseconds
    #[arg(short, long, default_value_t = 500, env = "MBPRESENCE_INTERVAL_MS")]
    interval_ms: u64,

    /// Poll once, print the status and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Parse the player's window caption when the IPC plugin is not reachable
    #[arg(long, env = "MBPRESENCE_CAPTION_FALLBACK")]
    caption_fallback: bool,

    /// Application name at the end of the player's window caption
    #[arg(long, default_value = "MusicBee", env = "MBPRESENCE_APP_NAME")]
    app_name: String,

    /// Exact title of the IPC window
    #[arg(long, default_value = IPC_WINDOW_TITLE, env = "MBPRESENCE_WINDOW_TITLE")]
    window_title: String,

    /// Prefix of the shared memory segment names
    #[arg(long, default_value = SEGMENT_NAME_PREFIX, env = "MBPRESENCE_SEGMENT_PREFIX")]
    segment_prefix: String,

    /// Presence details shown while idle
    #[arg(long, default_value = "", env = "MBPRESENCE_IDLE_DETAILS")]
    idle_details: String,

    /// Presence state shown while idle
    #[arg(long, default_value = "", env = "MBPRESENCE_IDLE_STATE")]
    idle_state: String,

    /// Large image asset key shown while idle
    #[arg(long, default_value = "musicbee", env = "MBPRESENCE_IDLE_IMAGE_KEY")]
    idle_image_key: String,

    /// Large image tooltip shown while idle
    #[arg(long, default_value = "MusicBee", env = "MBPRESENCE_IDLE_IMAGE_TEXT")]
    idle_image_text: String,
}

impl Args {
    fn ipc_config(&self) -> IpcConfig {
        IpcConfig {
            window_title: self.window_title.clone(),
            segment_prefix: self.segment_prefix.clone(),
        }
    }

    fn idle_presence(&self) -> Presence {
        Presence {
            details: self.idle_details.clone(),
            state: self.idle_state.clone(),
            large_image_key: self.idle_image_key.clone(),
            large_image_text: self.idle_image_text.clone(),
        }
    }
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);
    print_banner();

    run(&args);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_banner() {
    println!();
    println!("{}", "mbpresence".cyan().bold());
    println!("{}", "MusicBee now-playing presence".white());
    println!();
}

#[cfg(windows)]
fn run(args: &Args) {
    use mbpresence_ipc::Session;

    let mut session = Session::win32(args.ipc_config());
    let mut publisher = PresencePublisher::new(ConsoleSink, args.idle_presence());
    let interval = std::time::Duration::from_millis(args.interval_ms.max(1));
    let mut was_connected = false;
    let mut last_label = String::new();

    println!(
        "{} Looking for window \"{}\" every {} ms",
        "[INFO]".blue(),
        args.window_title,
        interval.as_millis()
    );

    loop {
        let mut status = session.fetch_status();
        let connected = session.is_connected();

        if connected != was_connected {
            if connected {
                println!("{} Connected to MusicBee", "[OK]".green());
            } else {
                println!("{} MusicBee is not reachable", "[WARN]".yellow());
            }
            was_connected = connected;
        }

        if !connected
            && args.caption_fallback
            && let Some(from_caption) = caption_status(&args.app_name)
        {
            status = from_caption;
        }

        let label = now_playing_label(&status);
        if label != last_label {
            display_status(&status, &label);
            last_label = label;
        }
        publisher.update(&status);

        if args.once {
            break;
        }
        std::thread::sleep(interval);
    }
}

#[cfg(not(windows))]
fn run(_args: &Args) {
    eprintln!(
        "{} The MusicBee IPC protocol is only available on Windows",
        "[ERROR]".red()
    );
    std::process::exit(1);
}

/// Build a status from the first window caption that looks like the player's
#[cfg(windows)]
fn caption_status(app_name: &str) -> Option<TrackStatus> {
    let captions = mbpresence_ipc::window::top_level_captions();
    let track = mbpresence_ipc::find_track(&captions, app_name)?;
    tracing::debug!(?track, "track parsed from window caption");
    Some(TrackStatus {
        is_playing: true,
        state: mbpresence_ipc::PlayState::Playing,
        title: track.title,
        artist: track.artist,
        ..TrackStatus::default()
    })
}

/// Display a status change
fn display_status(status: &TrackStatus, label: &str) {
    if !status.is_playing || status.title.is_empty() {
        println!("{} {}", "[INFO]".blue(), label);
        return;
    }

    println!("{} {}", "[PLAY]".green().bold(), label);
    if !status.album.is_empty() {
        println!("       {} {}", "Album:".cyan(), status.album);
    }
    match Artwork::from_text(&status.artwork) {
        Artwork::None => {}
        Artwork::Image(bytes) => {
            println!("       {} {} bytes of image data", "Artwork:".cyan(), bytes.len())
        }
        Artwork::Text(text) => println!("       {} {}", "Artwork:".cyan(), text),
    }
}
