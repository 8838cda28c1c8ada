use crossbeam_channel::{Receiver, Sender, TryRecvError};

// One-shot "the host can draw 3D now" signal. The host keeps the
// `ReadySignal` and fires it once the environment is interactive; the visual
// polls its `ReadinessGate` each frame. The gate starts closed and, once
// open, stays open.

pub fn readiness_channel() -> (ReadySignal, ReadinessGate) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (
        ReadySignal { tx: Some(tx) },
        ReadinessGate {
            rx: Some(rx),
            ready: false,
        },
    )
}

#[derive(Debug)]
pub struct ReadySignal {
    tx: Option<Sender<()>>,
}

impl ReadySignal {
    // Consumes the sender, so later calls are no-ops.
    pub fn notify(&mut self) {
        if let Some(tx) = self.tx.take() {
            if tx.try_send(()).is_err() {
                log::debug!("Readiness gate dropped before notification");
            }
        }
    }
}

#[derive(Debug)]
pub struct ReadinessGate {
    rx: Option<Receiver<()>>,
    ready: bool,
}

impl ReadinessGate {
    /// A gate that is open from the start, for hosts that are interactive by
    /// construction.
    pub fn open() -> Self {
        ReadinessGate {
            rx: None,
            ready: true,
        }
    }

    // Checks for the host's notification. Returns whether the gate is open.
    pub fn poll(&mut self) -> bool {
        if self.ready {
            return true;
        }
        let rx = match &self.rx {
            Some(rx) => rx,
            None => return false,
        };
        match rx.try_recv() {
            Ok(()) => {
                log::info!("Render surface ready");
                self.ready = true;
                self.rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // The host went away without confirming; stay closed for good.
                self.rx = None;
            }
        }
        self.ready
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let (_signal, mut gate) = readiness_channel();
        assert!(!gate.is_ready());
        assert!(!gate.poll());
        assert!(!gate.poll());
    }

    #[test]
    fn opens_once_after_notify() {
        let (mut signal, mut gate) = readiness_channel();
        assert!(!gate.poll());
        signal.notify();
        assert!(signal.tx.is_none());
        // The transition is only observed on the next poll.
        assert!(!gate.is_ready());
        assert!(gate.poll());
        assert!(gate.is_ready());
        signal.notify();
        assert!(gate.poll());
    }

    #[test]
    fn notify_from_another_thread() {
        let (mut signal, mut gate) = readiness_channel();
        std::thread::spawn(move || signal.notify())
            .join()
            .unwrap();
        assert!(gate.poll());
    }

    #[test]
    fn dropped_signal_keeps_gate_closed() {
        let (signal, mut gate) = readiness_channel();
        drop(signal);
        assert!(!gate.poll());
        assert!(!gate.poll());
        assert!(!gate.is_ready());
    }

    #[test]
    fn open_gate() {
        let mut gate = ReadinessGate::open();
        assert!(gate.is_ready());
        assert!(gate.poll());
    }
}
