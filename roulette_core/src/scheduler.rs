use std::collections::VecDeque;

/// Handle for one requested frame. Cancelling it guarantees the engine will
/// not act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Frame-scheduling primitive: "call me back on the next display refresh".
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Queue of requested frames for a host loop to drain once per refresh.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next: u64,
    pending: VecDeque<FrameToken>,
    cancelled: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest frame that is still due.
    pub fn pop(&mut self) -> Option<FrameToken> {
        self.pending.pop_front()
    }

    /// Takes every frame due right now. Frames requested while handling
    /// these land in the next batch.
    pub fn take_due(&mut self) -> Vec<FrameToken> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next);
        self.next += 1;
        self.pending.push_back(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.pending.len();
        self.pending.retain(|t| *t != token);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> FrameToken {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        (**self).cancel_frame(token);
    }
}
