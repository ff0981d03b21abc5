//! GesturePipeline: adapter + controller, driven one event at a time.
//!
//! The pipeline is the single consumer of the listener's event channel.  It
//! owns both stateful stages, so no locking is involved: the receive loop in
//! `main.rs` calls [`GesturePipeline::handle_event`] for every received
//! packet and [`GesturePipeline::on_tracking_lost`] when the tracking
//! deadline expires.

use gesture_core::GestureEvent;
use tracing::info;

use crate::application::accumulate::GestureAccumulatorController;
use crate::application::adapt_gestures::{AdapterStats, GestureStateAdapter};

pub struct GesturePipeline {
    adapter: GestureStateAdapter,
    controller: GestureAccumulatorController,
    tracking_active: bool,
}

impl GesturePipeline {
    pub fn new(adapter: GestureStateAdapter, controller: GestureAccumulatorController) -> Self {
        Self {
            adapter,
            controller,
            tracking_active: false,
        }
    }

    /// Runs one event through the adapter and applies the resulting actions.
    pub fn handle_event(&mut self, event: &GestureEvent) {
        if !self.tracking_active {
            info!("hand tracking started");
            self.tracking_active = true;
        }
        for action in self.adapter.process(event) {
            self.controller.apply(&action);
        }
    }

    /// Releases every held input after the sender goes quiet.
    ///
    /// Idempotent: a second call without an intervening event does nothing.
    pub fn on_tracking_lost(&mut self) {
        if !self.tracking_active {
            return;
        }
        self.tracking_active = false;
        info!("hand tracking lost; releasing held input");
        for action in self.adapter.reset() {
            self.controller.apply(&action);
        }
        self.controller.reset_tracking();
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking_active
    }

    pub fn adapter_stats(&self) -> AdapterStats {
        self.adapter.stats()
    }

    pub fn controller(&self) -> &GestureAccumulatorController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GestureAccumulatorController {
        &mut self.controller
    }

    /// Shuts the controller down.  Idempotent.
    pub fn shutdown(&mut self) {
        self.tracking_active = false;
        self.controller.shutdown();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
