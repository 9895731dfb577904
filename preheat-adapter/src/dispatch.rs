use std::sync::mpsc;

/// Creates the worker → UI hop: a clonable sender for worker-pool callbacks
/// and a single-consumer inbox for the UI-affine context.
///
/// Shared state (the session, the slot board, the live view) must only be
/// touched from the context that owns it. Work finishing elsewhere sends its
/// result through this channel and the owning context drains it at its own
/// pace; the hop is explicit in the types rather than hidden inside captured
/// callbacks.
pub fn ui_channel<T>() -> (RemoteSender<T>, UiInbox<T>) {
    let (tx, rx) = mpsc::channel();
    (RemoteSender { tx }, UiInbox { rx })
}

/// The sending half of the hop. Clone freely into worker callbacks; dropping
/// every clone disconnects the inbox.
pub struct RemoteSender<T> {
    tx: mpsc::Sender<T>,
}

impl<T> RemoteSender<T> {
    /// Queues a value for the owning context.
    ///
    /// Returns `false` when the inbox is gone (the session was torn down);
    /// the value is dropped, which is the correct fate for a late delivery.
    pub fn send(&self, value: T) -> bool {
        let delivered = self.tx.send(value).is_ok();
        if !delivered {
            ptrace!("delivery dropped: inbox disconnected");
        }
        delivered
    }
}

impl<T> Clone for RemoteSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> core::fmt::Debug for RemoteSender<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("RemoteSender(..)")
    }
}

/// The receiving half of the hop, owned by the UI-affine context.
///
/// Nothing here blocks: the owning context polls on its own schedule
/// (typically once per frame or event-loop turn).
pub struct UiInbox<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> UiInbox<T> {
    /// Takes the next queued value, if any.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drains everything currently queued, in arrival order. Returns how many
    /// values were handed to `f`.
    pub fn drain(&mut self, mut f: impl FnMut(T)) -> usize {
        let mut n = 0;
        while let Some(value) = self.try_next() {
            f(value);
            n += 1;
        }
        n
    }
}

impl<T> core::fmt::Debug for UiInbox<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("UiInbox(..)")
    }
}
