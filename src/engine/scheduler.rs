/// Handle for one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Host animation-frame facility (`requestAnimationFrame` and friends).
///
/// When a requested frame fires, the host calls [`crate::Scrubber::tick`]. Requests must be
/// cancelable; the scrubber cancels its outstanding request on teardown.
pub trait FrameScheduler {
    /// Ask for one callback on the next animation frame.
    fn request_frame(&mut self) -> FrameRequest;
    /// Drop a request that has not fired. Unknown requests are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Scheduler for headless hosts and tests: requests are recorded and fired by hand.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameRequest>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding (requested, not yet fired or cancelled) frames.
    pub fn pending(&self) -> &[FrameRequest] {
        &self.pending
    }

    /// Fire the oldest outstanding request, if any.
    pub fn fire(&mut self) -> Option<FrameRequest> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }

    /// Total requests made.
    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    /// Total requests cancelled before firing.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        self.requested += 1;
        let req = FrameRequest(self.next_id);
        self.pending.push(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Some(pos) = self.pending.iter().position(|r| *r == request) {
            self.pending.remove(pos);
            self.cancelled += 1;
        }
    }
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for &mut T {
    fn request_frame(&mut self) -> FrameRequest {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        (**self).cancel_frame(request)
    }
}
