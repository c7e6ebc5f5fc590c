mod effects;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context};
use captioner_client::UploadSettings;
use captioner_core::{update, AppState, ImageFile, Msg, ViewState};
use clap::Parser;
use client_logging::client_info;

use crate::effects::EffectRunner;
use crate::logging::LogDestination;

/// Headless front end for the captioning service: uploads one image and
/// prints the returned caption to stdout.
#[derive(Debug, Parser)]
#[command(name = "captioner", version, about)]
struct Args {
    /// Path to the image to caption.
    image: PathBuf,

    /// Base URL of the captioning service.
    /// Falls back to CAPTIONER_BASE_URL, then http://localhost:3000.
    #[arg(long)]
    base_url: Option<String>,

    /// Per-upload timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Where log output goes.
    #[arg(long, value_enum, default_value = "terminal")]
    log: LogDestination,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::initialize(args.log);

    let image = load_image(&args.image)?;

    let mut settings = UploadSettings::from_env();
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    settings.request_timeout = Duration::from_secs(args.timeout_secs);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(settings, msg_tx)?;

    let mut state = AppState::new();
    let (next, effects) = update(state, Msg::ImageSelected(image));
    state = next;
    runner.run(effects);

    loop {
        let msg = msg_rx
            .recv()
            .context("upload client stopped unexpectedly")?;
        let (next, effects) = update(state, msg);
        state = next;
        runner.run(effects);

        if !state.consume_dirty() {
            continue;
        }
        match state.view_state() {
            ViewState::Uploading { file_name, .. } => {
                client_info!("uploading {file_name}");
            }
            ViewState::Succeeded { caption } => {
                println!("{caption}");
                return Ok(());
            }
            ViewState::Failed { error } => bail!("{error}"),
            ViewState::Idle => {}
        }
    }
}

fn load_image(path: &Path) -> anyhow::Result<ImageFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read image {}", path.display()))?;
    if bytes.is_empty() {
        bail!("image {} is empty", path.display());
    }
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(ImageFile {
        mime_type: guess_mime(path),
        file_name,
        bytes,
    })
}

/// Best-effort MIME type from the file extension. The service only needs
/// the bytes, so unknown extensions fall back to octet-stream.
fn guess_mime(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_image_types() {
        assert_eq!(guess_mime(Path::new("cat.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("dog.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("anim.gif")), "image/gif");
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        assert_eq!(guess_mime(Path::new("mystery")), "application/octet-stream");
        assert_eq!(guess_mime(Path::new("notes.txt")), "application/octet-stream");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
