//! Per-placeholder state shared between resolver tasks and the view.
//!
//! Every placeholder owns one `watch` channel. The resolver holds the
//! [`SlotWriter`]s, the view holds the [`SlotBoard`]. A writer is consumed
//! when it settles, so a slot can transition out of loading at most once.

use groupie_detail::{Resolution, SlotId, SlotLookup};
use tokio::sync::{oneshot, watch};

/// State of one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// Fetch not finished (or not started).
    Loading,
    /// Final content.
    Settled(Resolution),
}

impl SlotState {
    /// Whether the slot has left the loading state.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }
}

/// Read side of all placeholders of one rendered view.
#[derive(Debug)]
pub struct SlotBoard {
    slots: Vec<watch::Receiver<SlotState>>,
}

/// Write side of a single placeholder.
#[derive(Debug)]
pub struct SlotWriter {
    slot: SlotId,
    tx: watch::Sender<SlotState>,
}

impl SlotBoard {
    /// Open `count` loading slots, numbered from zero.
    #[must_use]
    pub fn open(count: usize) -> (Self, Vec<SlotWriter>) {
        let (slots, writers) = (0..count)
            .map(|i| {
                let (tx, rx) = watch::channel(SlotState::Loading);
                (rx, SlotWriter { slot: SlotId(i), tx })
            })
            .unzip();
        (Self { slots }, writers)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current state of `slot`, `None` if the board has no such slot.
    #[must_use]
    pub fn state(&self, slot: SlotId) -> Option<SlotState> {
        self.slots.get(slot.0).map(|rx| rx.borrow().clone())
    }

    /// Whether `slot` has settled.
    #[must_use]
    pub fn is_settled(&self, slot: SlotId) -> bool {
        self.slots
            .get(slot.0)
            .is_some_and(|rx| rx.borrow().is_settled())
    }

    /// Number of slots that have settled.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|rx| rx.borrow().is_settled())
            .count()
    }

    /// Wait until every slot has settled.
    ///
    /// Slots whose writer was dropped without settling stay loading and are
    /// not waited on.
    pub async fn wait_settled(&mut self) {
        for rx in &mut self.slots {
            // Err means the writer is gone; the slot will never change.
            let _ = rx.wait_for(SlotState::is_settled).await;
        }
    }
}

impl SlotLookup for SlotBoard {
    fn resolution(&self, slot: SlotId) -> Option<Resolution> {
        match self.state(slot)? {
            SlotState::Loading => None,
            SlotState::Settled(resolution) => Some(resolution),
        }
    }
}

impl SlotWriter {
    #[must_use]
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Publish the final content of this slot.
    pub fn settle(self, resolution: Resolution) {
        if self.tx.send(SlotState::Settled(resolution)).is_err() {
            tracing::trace!(slot = self.slot.0, "View dropped before slot settled");
        }
    }
}

/// Create a linked handle/signal pair for "the view is displayed".
#[must_use]
pub fn attach_channel() -> (AttachHandle, AttachSignal) {
    let (tx, rx) = oneshot::channel();
    (AttachHandle { tx }, AttachSignal { rx: Some(rx) })
}

/// Held by whoever displays the view. Call [`attach`](Self::attach) once the
/// placeholders exist on screen; dropping it cancels resolution.
#[derive(Debug)]
pub struct AttachHandle {
    tx: oneshot::Sender<()>,
}

impl AttachHandle {
    pub fn attach(self) {
        // The resolver may already be gone; nothing to do then.
        let _ = self.tx.send(());
    }
}

/// Awaited by the resolver before any fetch starts.
#[derive(Debug)]
pub struct AttachSignal {
    rx: Option<oneshot::Receiver<()>>,
}

impl AttachSignal {
    /// Signal that is already attached.
    #[must_use]
    pub fn immediate() -> Self {
        Self { rx: None }
    }

    /// Resolves to `true` once attached, `false` if the handle was dropped.
    pub async fn attached(self) -> bool {
        match self.rx {
            Some(rx) => rx.await.is_ok(),
            None => true,
        }
    }
}
