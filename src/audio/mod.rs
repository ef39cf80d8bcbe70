use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Reads the playable length of a recording from its container metadata.
pub fn probe_duration<P: AsRef<Path>>(path: P) -> Result<Duration> {
    let path = path.as_ref();

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probe_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;

    let track = probe_result
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found in file")?;

    let params = &track.codec_params;
    let frames = params
        .n_frames
        .context("Audio file does not declare its length")?;
    let sample_rate = params
        .sample_rate
        .context("Sample rate not specified in audio file")?;
    anyhow::ensure!(sample_rate > 0, "Sample rate must be positive");

    Ok(Duration::from_secs_f64(frames as f64 / sample_rate as f64))
}
