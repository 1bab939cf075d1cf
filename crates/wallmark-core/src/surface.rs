/// Lifecycle notifications for the drawing surface.
pub trait SurfaceCallback {
    fn surface_created(&mut self) {}
    fn surface_changed(&mut self, width: u32, height: u32);
    fn surface_destroyed(&mut self) {}
}

/// Wraps a callback and forwards every notification to an optional delegate
/// after handling it. A missing delegate means there was no prior callback.
pub struct ChainedSurface<C, D> {
    inner: C,
    delegate: Option<D>,
    size: Option<(u32, u32)>,
}

impl<C: SurfaceCallback, D: SurfaceCallback> ChainedSurface<C, D> {
    pub fn new(inner: C, delegate: Option<D>) -> Self {
        Self {
            inner,
            delegate,
            size: None,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Last size reported through `surface_changed`, if the surface is live.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Report a size, forwarding only when it differs from the last one.
    /// Returns whether a change was forwarded.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if self.size == Some((width, height)) {
            return false;
        }
        self.surface_changed(width, height);
        true
    }
}

impl<C: SurfaceCallback, D: SurfaceCallback> SurfaceCallback for ChainedSurface<C, D> {
    fn surface_created(&mut self) {
        self.inner.surface_created();
        if let Some(d) = self.delegate.as_mut() {
            d.surface_created();
        }
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
        self.inner.surface_changed(width, height);
        if let Some(d) = self.delegate.as_mut() {
            d.surface_changed(width, height);
        }
    }

    fn surface_destroyed(&mut self) {
        self.size = None;
        self.inner.surface_destroyed();
        if let Some(d) = self.delegate.as_mut() {
            d.surface_destroyed();
        }
    }
}

/// Placeholder delegate for call sites that have nothing to chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurface;

impl SurfaceCallback for NoSurface {
    fn surface_changed(&mut self, _width: u32, _height: u32) {}
}
