/// Token for one requested frame notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequest(pub u64);

/// The host's "call me before the next repaint" mechanism.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Frame host without a display: requests queue up until the driver takes
/// them.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next: u64,
    pending: Vec<FrameRequest>,
    cancelled: u64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the requests that are due, in request order.
    pub fn take_pending(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Requests cancelled before delivery.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameHost for HeadlessHost {
    fn request_frame(&mut self) -> FrameRequest {
        let request = FrameRequest(self.next);
        self.next += 1;
        self.pending.push(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        let before = self.pending.len();
        self.pending.retain(|r| *r != request);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_unique_and_queued() {
        let mut host = HeadlessHost::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.take_pending(), vec![a, b]);
        assert_eq!(host.pending_count(), 0);
    }

    #[test]
    fn cancel_removes_pending_request() {
        let mut host = HeadlessHost::new();
        let a = host.request_frame();
        host.cancel_frame(a);
        host.cancel_frame(a);
        assert_eq!(host.pending_count(), 0);
        assert_eq!(host.cancelled_count(), 1);
    }
}
