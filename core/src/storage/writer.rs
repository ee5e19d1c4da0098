//! Background layout writer
//!
//! Saves are handed to a dedicated thread over a channel so the UI thread
//! never waits on the filesystem. Snapshots that queue up behind a slow write
//! are coalesced: only the newest one is written.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use super::{PersistedLayout, write_layout_atomic};

enum WriterMessage {
    Save(PersistedLayout),
    /// Acknowledged once everything queued before it has been written
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to the writer thread; dropping it drains the queue and joins
pub(super) struct LayoutWriter {
    tx: UnboundedSender<WriterMessage>,
    handle: Option<JoinHandle<()>>,
}

impl LayoutWriter {
    pub(super) fn spawn(path: PathBuf) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = thread::Builder::new()
            .name("layout-writer".into())
            .spawn(move || run(path, rx))?;
        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    pub(super) fn save(&self, layout: PersistedLayout) -> bool {
        self.tx.send(WriterMessage::Save(layout)).is_ok()
    }

    /// Block until every save queued so far is on disk. Panics if called
    /// from inside an async runtime context.
    pub(super) fn flush(&self) -> bool {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Flush(ack_tx)).is_err() {
            return false;
        }
        ack_rx.blocking_recv().is_ok()
    }
}

impl Drop for LayoutWriter {
    fn drop(&mut self) {
        let _ = self.tx.send(WriterMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Layout writer thread panicked");
            }
        }
    }
}

fn run(path: PathBuf, mut rx: UnboundedReceiver<WriterMessage>) {
    tracing::debug!(path = %path.display(), "Layout writer started");

    while let Some(message) = rx.blocking_recv() {
        let mut latest = None;
        let mut acks = Vec::new();
        let mut shutdown = false;

        match message {
            WriterMessage::Save(layout) => latest = Some(layout),
            WriterMessage::Flush(ack) => acks.push(ack),
            WriterMessage::Shutdown => shutdown = true,
        }

        // Coalesce whatever else is already queued
        while !shutdown {
            match rx.try_recv() {
                Ok(WriterMessage::Save(layout)) => latest = Some(layout),
                Ok(WriterMessage::Flush(ack)) => acks.push(ack),
                Ok(WriterMessage::Shutdown) => shutdown = true,
                Err(_) => break,
            }
        }

        if let Some(layout) = latest {
            match write_layout_atomic(&path, &layout) {
                Ok(()) => tracing::debug!(widgets = layout.len(), "Layout saved"),
                Err(e) => tracing::error!(error = %e, path = %path.display(), "Failed to save layout"),
            }
        }

        for ack in acks {
            let _ = ack.send(());
        }

        if shutdown {
            break;
        }
    }

    tracing::debug!("Layout writer stopped");
}
