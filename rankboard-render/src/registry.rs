//! Lifetime tracking for drawn charts.
//!
//! Every renderer that keeps chart widgets alive between renders goes through
//! a `ChartRegistry`: on each model change all live handles are destroyed
//! before any new chart is created, so a universe switch never leaves stale
//! charts behind.

use crate::chart::ChartSpec;

/// Something that can materialise a chart and later release it.
pub trait ChartSurface {
    type Handle;

    fn create(&mut self, spec: &ChartSpec) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

pub struct ChartRegistry<S: ChartSurface> {
    surface: S,
    live: Vec<S::Handle>,
}

impl<S: ChartSurface> ChartRegistry<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            live: Vec::new(),
        }
    }

    /// Destroy every live chart, then create one per spec in order.
    pub fn replace(&mut self, specs: &[ChartSpec]) {
        let disposed = self.live.len();
        self.clear();
        for spec in specs {
            let handle = self.surface.create(spec);
            self.live.push(handle);
        }
        tracing::debug!(disposed, created = specs.len(), "chart registry replaced");
    }

    pub fn clear(&mut self) {
        for handle in self.live.drain(..) {
            self.surface.destroy(handle);
        }
    }

    pub fn live(&self) -> &[S::Handle] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
