//! Showreel events: reel rotation, clip loading, playback control.

/// Miniature preview clicked - rotate the reel to the next clip.
#[derive(Clone, Debug)]
pub struct AdvanceReelEvent;

/// A clip's first frame has been decoded; its data is now displayable.
///
/// Emitted exactly once per clip by the loader. Feeds the loading gate.
#[derive(Clone, Debug)]
pub struct ClipLoadedEvent(pub u32);

/// A clip could not be probed or decoded.
#[derive(Clone, Debug)]
pub struct ClipFailedEvent {
    pub clip: u32,
    pub reason: String,
}

/// Start playback of a clip surface (the media element `play()` analog).
#[derive(Clone, Debug)]
pub struct PlayClipEvent(pub u32);

/// Toggle fullscreen (Z key).
#[derive(Clone, Debug)]
pub struct ToggleFullscreenEvent;
