//! # Shared surfaces
//! A [`Surface`] is single-threaded: every mutation must finish before the next begins. To drive one
//! from several threads, such as input on one and the animation timer on another, wrap it in a
//! [`SharedSurface`], which serializes every access through one lock.

use std::sync::Arc;
use std::time::Duration;

use crate::render::Renderer;
use crate::surface::Surface;

pub struct SharedSurface<R> {
    inner: Arc<parking_lot::Mutex<Surface<R>>>,
}
impl<R> Clone for SharedSurface<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
impl<R: Renderer> From<Surface<R>> for SharedSurface<R> {
    fn from(surface: Surface<R>) -> Self {
        Self::new(surface)
    }
}
impl<R: Renderer> SharedSurface<R> {
    #[must_use]
    pub fn new(surface: Surface<R>) -> Self {
        Self {
            inner: Arc::new(parking_lot::Mutex::new(surface)),
        }
    }
    /// Run `f` with exclusive access to the surface. Blocks while another thread has it.
    pub fn with<T>(&self, f: impl FnOnce(&mut Surface<R>) -> T) -> T {
        f(&mut self.inner.lock())
    }
    /// As [`Self::with`], but `None` instead of waiting if the surface is busy.
    pub fn try_with<T>(&self, f: impl FnOnce(&mut Surface<R>) -> T) -> Option<T> {
        self.inner.try_lock().map(|mut surface| f(&mut surface))
    }
    /// Run one animation tick. See [`Surface::tick`].
    pub fn tick(&self) -> Option<Duration> {
        self.with(Surface::tick)
    }
    /// Take the surface back, if this is the last handle to it.
    pub fn into_inner(self) -> Result<Surface<R>, Self> {
        Arc::try_unwrap(self.inner)
            .map(parking_lot::Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod test {
    use super::SharedSurface;
    use crate::config::SurfaceConfig;
    use crate::geom::Point;
    use crate::surface::{Frame, Surface};
    use crate::testing::RecordingRenderer;

    #[test]
    fn serialized_across_threads() {
        let shared =
            SharedSurface::new(Surface::new(RecordingRenderer::default(), SurfaceConfig::default()));
        let line = shared.with(|surface| surface.create_line(Point::new(0.0, 0.0), None));

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    for step in 1..=10 {
                        shared.with(|surface| {
                            surface.create_rectangle(
                                Frame::at(i as f32 * 100.0, step as f32 * 10.0),
                                Default::default(),
                            );
                        });
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let surface = shared.into_inner().ok().unwrap();
        assert_eq!(surface.len(), 41);
        let ids: Vec<_> = surface.live_ids().collect();
        assert_eq!(ids[0], line.id());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        // One publish per creation.
        assert_eq!(surface.renderer().frames(), 41);
    }
    #[test]
    fn idle_tick() {
        let shared: SharedSurface<_> =
            Surface::new(RecordingRenderer::default(), SurfaceConfig::default()).into();
        assert_eq!(shared.tick(), None);
        let busy = shared.clone();
        shared.with(|_| assert!(busy.try_with(|_| ()).is_none()));
        assert!(busy.try_with(|_| ()).is_some());
    }
}
