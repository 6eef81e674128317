//! # Media
//! Images, videos, and other rasters are owned by the host. The surface refers to them by [`MediaHandle`],
//! and learns about them through the host's [`MediaSource`].

use smallvec::SmallVec;

use crate::geom::Size;
use crate::id::ObjectId;

/// The kinds of raster a host may hand to the surface.
#[derive(
    strum::AsRefStr, strum::Display, strum::EnumString, PartialEq, Eq, Copy, Clone, Hash, Debug,
)]
#[strum(serialize_all = "kebab-case")]
pub enum MediaKind {
    Image,
    Video,
    Canvas,
    OffscreenCanvas,
    ImageBitmap,
    VideoFrame,
}

/// A host-owned raster. `key` is opaque to the surface and is only ever handed back to the host.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct MediaHandle {
    pub kind: MediaKind,
    pub key: u64,
}
impl MediaHandle {
    #[must_use]
    pub fn new(kind: MediaKind, key: u64) -> Self {
        Self { kind, key }
    }
    /// Construct from a host-side kind name, such as `"video"` or `"offscreen-canvas"`.
    pub fn parse(kind: &str, key: u64) -> Result<Self, crate::surface::SurfaceError> {
        let kind = kind
            .parse()
            .map_err(|_| crate::surface::SurfaceError::InvalidMedia(kind.to_owned()))?;
        Ok(Self { kind, key })
    }
}

/// Host capability describing media.
pub trait MediaSource: Send {
    /// Natural size in pixels, or `None` if the media cannot be drawn.
    fn intrinsic_size(&self, media: &MediaHandle) -> Option<Size>;
    /// Frame rates of every video track. Stills have none.
    fn frame_rates(&self, _media: &MediaHandle) -> SmallVec<[f64; 2]> {
        SmallVec::new()
    }
    /// `id` now draws `media`. The host should report playback changes with
    /// [`Surface::notify_media`](crate::surface::Surface::notify_media).
    fn watch(&mut self, _media: &MediaHandle, _id: ObjectId) {}
    /// `id` was undone or cleared, and no longer needs playback reports.
    fn unwatch(&mut self, _media: &MediaHandle, _id: ObjectId) {}
}

/// A source that knows of no media. Every media creation fails with
/// [`InvalidMedia`](crate::surface::SurfaceError::InvalidMedia).
#[derive(Copy, Clone, Debug, Default)]
pub struct NoMedia;
impl MediaSource for NoMedia {
    fn intrinsic_size(&self, _: &MediaHandle) -> Option<Size> {
        None
    }
}

/// Playback changes reported by the host.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MediaEvent {
    Play,
    Pause,
    Ended,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Playback {
    #[default]
    Playing,
    Paused,
    Ended,
}
impl Playback {
    #[must_use]
    pub fn after(self, event: MediaEvent) -> Self {
        match event {
            MediaEvent::Play => Self::Playing,
            MediaEvent::Pause => Self::Paused,
            MediaEvent::Ended => Self::Ended,
        }
    }
    /// Does media in this state need periodic redraws?
    #[must_use]
    pub fn is_animating(self) -> bool {
        self == Self::Playing
    }
}

/// Rounded, positive frame rates. Anything that doesn't round to at least one frame per second is dropped.
#[must_use]
pub fn whole_frame_rates(rates: &[f64]) -> SmallVec<[u32; 2]> {
    rates
        .iter()
        .filter(|rate| rate.is_finite())
        .map(|rate| rate.round())
        .filter(|&rate| rate >= 1.0 && rate <= f64::from(u32::MAX))
        // Range checked above.
        .map(|rate| rate as u32)
        .collect()
}

/// Resolve the drawn size of media. A missing dimension follows the intrinsic aspect ratio.
#[must_use]
pub fn fit_size(intrinsic: Size, width: Option<i32>, height: Option<i32>) -> Size {
    let aspect = |num: i32, den: i32, by: i32| -> i32 {
        if den == 0 {
            return 0;
        }
        crate::util::truncate((f64::from(by) * f64::from(num) / f64::from(den)).round() as f32)
    };
    match (width, height) {
        (Some(width), Some(height)) => Size::new(width, height),
        (Some(width), None) => Size::new(width, aspect(intrinsic.height, intrinsic.width, width)),
        (None, Some(height)) => Size::new(aspect(intrinsic.width, intrinsic.height, height), height),
        (None, None) => intrinsic,
    }
}

#[cfg(test)]
mod test {
    use super::{fit_size, whole_frame_rates, MediaHandle, MediaKind};
    use crate::geom::Size;

    #[test]
    fn kind_names() {
        assert_eq!(
            MediaHandle::parse("offscreen-canvas", 3).unwrap().kind,
            MediaKind::OffscreenCanvas
        );
        assert_eq!(MediaKind::VideoFrame.as_ref(), "video-frame");
        assert!(MediaHandle::parse("audio", 3).is_err());
    }
    #[test]
    fn aspect_fit() {
        let intrinsic = Size::new(1920, 1080);
        assert_eq!(fit_size(intrinsic, None, None), intrinsic);
        assert_eq!(fit_size(intrinsic, Some(320), None), Size::new(320, 180));
        assert_eq!(fit_size(intrinsic, None, Some(90)), Size::new(160, 90));
        assert_eq!(fit_size(intrinsic, Some(10), Some(10)), Size::new(10, 10));
        // Degenerate intrinsic size doesn't divide by zero.
        assert_eq!(fit_size(Size::new(0, 0), Some(10), None), Size::new(10, 0));
    }
    #[test]
    fn rates_rounded() {
        assert_eq!(
            whole_frame_rates(&[29.97, 24.0, 0.2, f64::NAN, -30.0]).as_slice(),
            &[30, 24]
        );
    }
}
