pub type RequestSeq = u64;

/// Per-resource request counter used to discard stale responses.
///
/// Every request for a logical resource (articles, stats, detail) is issued a
/// strictly increasing sequence number. Responses carry their number back and
/// are only applied when the sequencer accepts them, so a consumer never
/// regresses to an older response whatever the arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sequencer {
    issued: RequestSeq,
    applied: RequestSeq,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestSeq {
        self.issued += 1;
        self.issued
    }

    pub fn latest_issued(&self) -> RequestSeq {
        self.issued
    }

    pub fn latest_applied(&self) -> RequestSeq {
        self.applied
    }

    /// True while a response newer than the last applied one is outstanding.
    pub fn is_pending(&self) -> bool {
        self.applied < self.issued
    }

    /// Accepts a response newer than anything applied so far.
    pub fn accept(&mut self, seq: RequestSeq) -> bool {
        if seq > self.applied && seq <= self.issued {
            self.applied = seq;
            true
        } else {
            false
        }
    }

    /// Accepts only the response to the most recently issued request.
    pub fn accept_latest(&mut self, seq: RequestSeq) -> bool {
        if seq == self.issued {
            self.accept(seq)
        } else {
            false
        }
    }
}
