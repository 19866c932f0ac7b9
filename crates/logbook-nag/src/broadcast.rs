use logbook_core::ReminderEvent;
use tokio::sync::broadcast;

use crate::scheduler::BannerState;

/// Changes buffered per receiver before the slowest one starts lagging.
pub const CHANGE_CAPACITY: usize = 64;

/// Observable state change emitted by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub enum NagChange {
    Banner(BannerState),
    Recorded(ReminderEvent),
    /// Number of pending notifications after the change.
    Pending(usize),
}

/// Fan-out of [`NagChange`]s over a tokio broadcast channel.
///
/// Sending never blocks and needs no runtime; receivers drain with
/// `try_recv` or `recv().await`.
#[derive(Debug, Clone)]
pub struct ChangeBroadcaster {
    tx: broadcast::Sender<NagChange>,
}

impl ChangeBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NagChange> {
        self.tx.subscribe()
    }

    /// Number of receivers reached. Zero when nobody is listening.
    pub fn broadcast(&self, change: NagChange) -> usize {
        self.tx.send(change).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeBroadcaster {
    fn default() -> Self {
        Self::new(CHANGE_CAPACITY)
    }
}

/// Everything currently buffered for `rx`, skipping over any lag gap.
pub fn drain(rx: &mut broadcast::Receiver<NagChange>) -> Vec<NagChange> {
    use broadcast::error::TryRecvError;

    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(change) => out.push(change),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => return out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_out_and_drop() {
        let b = ChangeBroadcaster::default();
        let mut rx1 = b.subscribe();
        let mut rx2 = b.subscribe();
        assert_eq!(b.broadcast(NagChange::Pending(3)), 2);
        assert_eq!(rx1.try_recv().unwrap(), NagChange::Pending(3));
        assert_eq!(rx2.try_recv().unwrap(), NagChange::Pending(3));

        drop(rx1);
        assert_eq!(b.broadcast(NagChange::Pending(0)), 1);
        assert_eq!(b.subscriber_count(), 1);
        assert_eq!(rx2.try_recv().unwrap(), NagChange::Pending(0));
    }

    #[test]
    fn no_subscribers_is_fine() {
        let b = ChangeBroadcaster::default();
        assert_eq!(b.broadcast(NagChange::Pending(1)), 0);
    }

    #[test]
    fn slow_receiver_keeps_newest() {
        let b = ChangeBroadcaster::new(2);
        let mut rx = b.subscribe();
        for n in 0..5 {
            b.broadcast(NagChange::Pending(n));
        }
        assert_eq!(
            drain(&mut rx),
            vec![NagChange::Pending(3), NagChange::Pending(4)]
        );
        assert!(drain(&mut rx).is_empty());
    }
}
