//! Latest-wins render scheduling.
//!
//! Every request takes a ticket from a shared generation counter. A finished
//! render is published only if its ticket is still the newest one; results of
//! superseded requests are dropped. Each run owns its own working copy of the
//! shared, immutable source.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use parking_lot::Mutex;

use crate::config::RenderOptions;
use crate::image::Raster;
use crate::params::layer::Layer;
use crate::params::mask::MaskLayer;
use crate::pipeline::render::{self, RenderError};

/// Identifies one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTicket(u64);

impl RenderTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// What a caller should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The composited result.
    Rendered(Raster),
    /// The render failed; this is the unmodified source.
    Fallback(Raster),
}

impl Frame {
    pub fn raster(&self) -> &Raster {
        match self {
            Self::Rendered(r) | Self::Fallback(r) => r,
        }
    }

    pub fn into_raster(self) -> Raster {
        match self {
            Self::Rendered(r) | Self::Fallback(r) => r,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Wrap a render result, substituting a copy of `source` on failure.
    pub fn from_result(result: Result<Raster, RenderError>, source: &Raster) -> Self {
        match result {
            Ok(raster) => Self::Rendered(raster),
            Err(e) => {
                tracing::error!("render failed, falling back to the source image: {e}");
                Self::Fallback(source.clone())
            }
        }
    }
}

/// Coalesces render requests against one source image.
///
/// Clones share the source, the generation counter and the latest-frame
/// slot. The source only changes under its lock, together with a generation
/// bump, so a current ticket always refers to the current source.
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    source: Arc<Mutex<Arc<Raster>>>,
    generation: Arc<AtomicU64>,
    latest: Arc<Mutex<Option<(RenderTicket, Frame)>>>,
}

impl RenderScheduler {
    pub fn new(source: Raster) -> Self {
        Self {
            source: Arc::new(Mutex::new(Arc::new(source))),
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn source(&self) -> Arc<Raster> {
        Arc::clone(&self.source.lock())
    }

    /// Swap the source image for every clone. Outstanding tickets become
    /// stale and the latest frame is dropped.
    pub fn set_source(&self, source: Raster) {
        let mut slot = self.source.lock();
        *slot = Arc::new(source);
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.latest.lock() = None;
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn ticket(&self) -> RenderTicket {
        let _source = self.source.lock();
        RenderTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// The source `ticket` was issued against, or `None` once it is stale.
    fn source_for(&self, ticket: RenderTicket) -> Option<Arc<Raster>> {
        let source = self.source.lock();
        self.is_current(ticket).then(|| Arc::clone(&source))
    }

    /// Store `frame` if `ticket` is still current. Returns whether it was kept.
    pub fn publish(&self, ticket: RenderTicket, frame: Frame) -> bool {
        let mut slot = self.latest.lock();
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "discarding stale render");
            return false;
        }
        if slot.as_ref().is_some_and(|(stored, _)| *stored > ticket) {
            return false;
        }
        *slot = Some((ticket, frame));
        true
    }

    /// Render synchronously for `ticket` and publish the result.
    ///
    /// Returns `None` when the ticket was superseded before the render
    /// finished.
    pub fn run(
        &self,
        ticket: RenderTicket,
        layers: &[Layer],
        mask_layers: &[MaskLayer],
        options: &RenderOptions,
    ) -> Option<Frame> {
        let source = self.source_for(ticket)?;
        let frame = Frame::from_result(
            render::render(&source, layers, mask_layers, options),
            &source,
        );
        self.publish(ticket, frame.clone()).then_some(frame)
    }

    /// Take a ticket and render on a background thread.
    pub fn spawn(
        &self,
        layers: Vec<Layer>,
        mask_layers: Vec<MaskLayer>,
        options: RenderOptions,
    ) -> std::io::Result<(RenderTicket, thread::JoinHandle<Option<Frame>>)> {
        let ticket = self.ticket();
        let scheduler = self.clone();
        let handle = thread::Builder::new()
            .name("iris-render".into())
            .spawn(move || scheduler.run(ticket, &layers, &mask_layers, &options))?;
        Ok((ticket, handle))
    }

    /// The newest published frame, if any.
    pub fn latest(&self) -> Option<Frame> {
        self.latest.lock().as_ref().map(|(_, frame)| frame.clone())
    }

    /// Remove and return the newest published frame.
    pub fn take_latest(&self) -> Option<Frame> {
        self.latest.lock().take().map(|(_, frame)| frame)
    }
}
