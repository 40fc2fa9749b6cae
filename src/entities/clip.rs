//! Clip addressing and decoded media storage.
//!
//! Clips are identified by a 1-based index. `clip_source()` is the only
//! place the on-disk naming scheme lives; it does no I/O. Decoded frames
//! land in a [`ClipStore`] shared between the loader workers and the UI.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Filenames that count as reel clips when probing a media dir.
static CLIP_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^reel-(\d+)\.mp4$").expect("clip filename regex"));

/// Resolve the path of clip `index` inside `dir`.
///
/// Pure string construction: `<dir>/reel-<index>.mp4`. Distinct indices
/// always yield distinct paths.
pub fn clip_source(dir: &Path, index: u32) -> PathBuf {
    dir.join(format!("reel-{}.mp4", index))
}

/// Scan `dir` for `reel-<i>.mp4` files and return the length of the
/// contiguous run starting at 1, if any.
///
/// `reel-1, reel-2, reel-4` yields 2 - the rotation needs a dense 1..=N
/// index space.
pub fn discover_clip_count(dir: &Path) -> Option<u32> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut found: Vec<u32> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_str()?;
            let caps = CLIP_FILE_RE.captures(name)?;
            caps[1].parse::<u32>().ok()
        })
        .collect();
    found.sort_unstable();
    found.dedup();

    let mut count = 0;
    for (i, idx) in found.iter().enumerate() {
        if *idx == i as u32 + 1 {
            count = *idx;
        } else {
            break;
        }
    }
    (count > 0).then_some(count)
}

/// One decoded RGBA frame.
#[derive(Clone)]
pub struct ClipFrame {
    pub rgba: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl std::fmt::Debug for ClipFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Decoded state of a single clip. Frames are appended as the decoder
/// produces them; playback loops over whatever is available so far.
#[derive(Debug, Default)]
pub struct ClipMedia {
    pub fps: f64,
    pub frames: Vec<Arc<ClipFrame>>,
    /// Decoder reached end of stream.
    pub complete: bool,
}

/// Shared clip index -> decoded media map. Workers write, UI reads.
#[derive(Clone, Default)]
pub struct ClipStore {
    clips: Arc<RwLock<HashMap<u32, ClipMedia>>>,
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty entry for a clip about to be decoded.
    pub fn insert(&self, index: u32, fps: f64) {
        let mut clips = self.clips.write().unwrap_or_else(|e| e.into_inner());
        clips.insert(
            index,
            ClipMedia {
                fps,
                ..ClipMedia::default()
            },
        );
    }

    /// Append a decoded frame. Returns the new frame count.
    pub fn push_frame(&self, index: u32, frame: ClipFrame) -> usize {
        let mut clips = self.clips.write().unwrap_or_else(|e| e.into_inner());
        let media = clips.entry(index).or_default();
        media.frames.push(Arc::new(frame));
        media.frames.len()
    }

    /// Mark a clip's decode as finished.
    pub fn mark_complete(&self, index: u32) {
        let mut clips = self.clips.write().unwrap_or_else(|e| e.into_inner());
        if let Some(media) = clips.get_mut(&index) {
            media.complete = true;
        }
    }

    /// Read access to one clip's media.
    pub fn with_clip<R>(&self, index: u32, f: impl FnOnce(&ClipMedia) -> R) -> Option<R> {
        let clips = self.clips.read().unwrap_or_else(|e| e.into_inner());
        clips.get(&index).map(f)
    }

    /// Frame `frame_idx` of clip `index`, if decoded.
    pub fn frame(&self, index: u32, frame_idx: usize) -> Option<Arc<ClipFrame>> {
        let clips = self.clips.read().unwrap_or_else(|e| e.into_inner());
        clips
            .get(&index)
            .and_then(|media| media.frames.get(frame_idx))
            .cloned()
    }

    /// Decoded frame count for a clip (0 if unknown).
    pub fn frame_count(&self, index: u32) -> usize {
        self.with_clip(index, |media| media.frames.len()).unwrap_or(0)
    }

    /// Declared fps for a clip, if registered.
    pub fn fps(&self, index: u32) -> Option<f64> {
        self.with_clip(index, |media| media.fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_source_is_deterministic() {
        let dir = Path::new("clips");
        assert_eq!(clip_source(dir, 1), clip_source(dir, 1));
        assert_eq!(clip_source(dir, 3), PathBuf::from("clips/reel-3.mp4"));
    }

    #[test]
    fn test_clip_source_distinct_for_distinct_indices() {
        let dir = Path::new("media");
        let paths: Vec<_> = (1..=4).map(|i| clip_source(dir, i)).collect();
        for (i, a) in paths.iter().enumerate() {
            for b in paths.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_discover_counts_contiguous_prefix() {
        let dir = std::env::temp_dir().join(format!("showreel-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["reel-1.mp4", "reel-2.mp4", "reel-4.mp4", "notes.txt"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }
        assert_eq!(discover_clip_count(&dir), Some(2));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_discover_empty_dir_yields_none() {
        let dir = std::env::temp_dir().join(format!("showreel-empty-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        assert_eq!(discover_clip_count(&dir), None);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_store_appends_and_reads_frames() {
        let store = ClipStore::new();
        store.insert(1, 24.0);
        assert_eq!(store.frame_count(1), 0);

        let n = store.push_frame(
            1,
            ClipFrame {
                rgba: vec![0; 4],
                width: 1,
                height: 1,
            },
        );
        assert_eq!(n, 1);
        assert_eq!(store.frame_count(1), 1);
        assert!(store.frame(1, 0).is_some());
        assert!(store.frame(1, 1).is_none());
        assert_eq!(store.fps(1), Some(24.0));

        store.mark_complete(1);
        assert_eq!(store.with_clip(1, |m| m.complete), Some(true));
    }
}
