//! Deferred actions
//!
//! Actions scheduled here fire after a tick countdown instead of a wall-clock
//! timer, so the tick function stays deterministic. At most one action is
//! pending; arming a new one cancels the old.

use serde::{Deserialize, Serialize};

/// Actions that can be deferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Load the next level (or finish the run)
    NextLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub action: DeferredAction,
    pub ticks_left: u32,
}

/// Single-slot countdown scheduler
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    pending: Option<Pending>,
}

impl Scheduler {
    /// Arm `action` to fire after `delay_ticks` calls to [`Scheduler::advance`].
    /// Returns the action that was cancelled, if any.
    pub fn arm(&mut self, action: DeferredAction, delay_ticks: u32) -> Option<DeferredAction> {
        let previous = self.cancel();
        self.pending = Some(Pending {
            action,
            ticks_left: delay_ticks.max(1),
        });
        previous
    }

    /// Drop the pending action without firing it
    pub fn cancel(&mut self) -> Option<DeferredAction> {
        self.pending.take().map(|p| p.action)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Count down one tick; returns the action when it fires
    pub fn advance(&mut self) -> Option<DeferredAction> {
        let pending = self.pending.as_mut()?;
        pending.ticks_left = pending.ticks_left.saturating_sub(1);
        if pending.ticks_left == 0 {
            self.cancel()
        } else {
            None
        }
    }
}
