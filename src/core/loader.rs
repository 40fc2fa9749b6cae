//! Clip decoding pipeline - FFmpeg-based probe and full-clip decode.
//!
//! Each clip gets one worker job: probe the container, register the clip in
//! the [`ClipStore`], then decode every frame to RGBA and append it as it
//! arrives. The first appended frame fires [`ClipLoadedEvent`] - the "data
//! is displayable" signal the loading gate counts. Failures fire
//! [`ClipFailedEvent`] instead; the loader itself never touches the reel.

use log::{debug, warn};
use playa_ffmpeg as ffmpeg;
use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::core::event_bus::EventEmitter;
use crate::core::reel_events::{ClipFailedEvent, ClipLoadedEvent};
use crate::core::workers::Workers;
use crate::entities::clip::{ClipFrame, ClipStore, clip_source};
use crate::entities::playback::FALLBACK_FPS;

static FFMPEG_LOG_INIT: Once = Once::new();

fn init_ffmpeg_logging() {
    FFMPEG_LOG_INIT.call_once(|| {
        unsafe {
            // AV_LOG_QUIET: silence all FFmpeg output including stderr
            ffmpeg::ffi::av_log_set_level(ffmpeg::ffi::AV_LOG_QUIET);
        }
    });
}

/// Clip pipeline errors.
#[derive(Debug)]
pub enum ClipError {
    Open(String),
    NoVideoStream,
    Decode(String),
}

impl std::fmt::Display for ClipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipError::Open(e) => write!(f, "failed to open clip: {}", e),
            ClipError::NoVideoStream => write!(f, "no video stream found"),
            ClipError::Decode(e) => write!(f, "decode failed: {}", e),
        }
    }
}

impl std::error::Error for ClipError {}

/// Container-level clip info.
#[derive(Clone, Debug)]
pub struct ClipMeta {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl ClipMeta {
    /// Read metadata without decoding any frames.
    pub fn probe(path: &Path) -> Result<Self, ClipError> {
        init_ffmpeg_logging();

        let ictx = ffmpeg::format::input(path).map_err(|e| ClipError::Open(e.to_string()))?;
        let stream = ictx
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or(ClipError::NoVideoStream)?;

        let fps_rational = stream.avg_frame_rate();
        let fps = if fps_rational.denominator() != 0 {
            fps_rational.numerator() as f64 / fps_rational.denominator() as f64
        } else {
            FALLBACK_FPS
        };

        let codec_params = stream.parameters();
        let decoder_ctx = ffmpeg::codec::context::Context::from_parameters(codec_params)
            .map_err(|e| ClipError::Decode(e.to_string()))?;
        let decoder = decoder_ctx
            .decoder()
            .video()
            .map_err(|e| ClipError::Decode(e.to_string()))?;

        Ok(ClipMeta {
            width: decoder.width(),
            height: decoder.height(),
            fps,
        })
    }
}

/// Queue a decode job per clip (1..=total) on the worker pool.
pub fn spawn_clip_loads(
    workers: &Workers,
    store: &ClipStore,
    emitter: &EventEmitter,
    dir: &Path,
    total: u32,
) {
    for index in 1..=total {
        let path = clip_source(dir, index);
        let store = store.clone();
        let emitter = emitter.clone();
        workers.execute(move || {
            if let Err(e) = decode_clip(&path, index, &store, &emitter) {
                warn!("Clip {} ({}) failed: {}", index, path.display(), e);
                emitter.emit(ClipFailedEvent {
                    clip: index,
                    reason: e.to_string(),
                });
            }
        });
    }
}

/// Decode a whole clip into the store, emitting `ClipLoadedEvent` once the
/// first frame is displayable.
fn decode_clip(
    path: &PathBuf,
    index: u32,
    store: &ClipStore,
    emitter: &EventEmitter,
) -> Result<(), ClipError> {
    init_ffmpeg_logging();

    let meta = ClipMeta::probe(path)?;
    store.insert(index, meta.fps);

    let mut ictx = ffmpeg::format::input(path).map_err(|e| ClipError::Open(e.to_string()))?;
    let stream = ictx
        .streams()
        .best(ffmpeg::media::Type::Video)
        .ok_or(ClipError::NoVideoStream)?;
    let stream_idx = stream.index();

    let codec_params = stream.parameters();
    let decoder_ctx = ffmpeg::codec::context::Context::from_parameters(codec_params)
        .map_err(|e| ClipError::Decode(e.to_string()))?;
    let mut decoder = decoder_ctx
        .decoder()
        .video()
        .map_err(|e| ClipError::Decode(e.to_string()))?;

    let width = decoder.width();
    let height = decoder.height();

    let mut scaler = ffmpeg::software::scaling::Context::get(
        decoder.format(),
        width,
        height,
        ffmpeg::format::Pixel::RGBA,
        width,
        height,
        ffmpeg::software::scaling::Flags::BILINEAR,
    )
    .map_err(|e| ClipError::Decode(e.to_string()))?;

    let mut announced = false;
    let mut receive =
        |decoder: &mut ffmpeg::decoder::Video| -> Result<(), ClipError> {
            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while decoder.receive_frame(&mut decoded).is_ok() {
                let mut rgba_frame = ffmpeg::util::frame::video::Video::empty();
                scaler
                    .run(&decoded, &mut rgba_frame)
                    .map_err(|e| ClipError::Decode(e.to_string()))?;

                // Strip the stride padding row by row
                let rgba_data = rgba_frame.data(0);
                let stride = rgba_frame.stride(0) as usize;
                let row_bytes = (width * 4) as usize;
                let mut rgba = vec![0u8; row_bytes * height as usize];
                for y in 0..height as usize {
                    let src = y * stride;
                    let dst = y * row_bytes;
                    rgba[dst..dst + row_bytes].copy_from_slice(&rgba_data[src..src + row_bytes]);
                }

                store.push_frame(
                    index,
                    ClipFrame {
                        rgba,
                        width: width as usize,
                        height: height as usize,
                    },
                );

                if !announced {
                    announced = true;
                    debug!("Clip {} first frame ready ({}x{})", index, width, height);
                    emitter.emit(ClipLoadedEvent(index));
                }
            }
            Ok(())
        };

    for (stream, packet) in ictx.packets() {
        if stream.index() != stream_idx {
            continue;
        }
        decoder
            .send_packet(&packet)
            .map_err(|e| ClipError::Decode(e.to_string()))?;
        receive(&mut decoder)?;
    }

    // Drain the decoder
    decoder
        .send_eof()
        .map_err(|e| ClipError::Decode(e.to_string()))?;
    receive(&mut decoder)?;

    if !announced {
        return Err(ClipError::Decode("clip contains no frames".into()));
    }

    store.mark_complete(index);
    debug!(
        "Clip {} decoded: {} frames at {:.3} fps",
        index,
        store.frame_count(index),
        meta.fps
    );
    Ok(())
}
