//! Non-blocking full refresh
//!
//! A full refresh takes seconds. With async support enabled the controller
//! starts it, returns to the caller, and polls BUSY at the start of every
//! following cycle. Requests arriving meanwhile are skipped with a reason that
//! names their class, so the next cycle can promote them again.

use platform::EinkPanel;

use crate::decision::{Decision, Reason};
use crate::flags::FrameFlags;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    Running,
    /// `end_async_full` went through; `end_update` is still owed.
    Finishing,
}

/// In-progress tracking for a detached full refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsyncFullRefresh {
    state: State,
}

impl AsyncFullRefresh {
    /// No refresh running.
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    /// A detached full refresh has not been seen to finish yet.
    pub fn is_running(&self) -> bool {
        self.state != State::Idle
    }

    /// Check on a running refresh.
    ///
    /// Busy: returns the blocked verdict for `flags`. Idle: finishes the
    /// refresh on the panel and returns `None`. Not running: returns `None`
    /// without touching the panel.
    ///
    /// Each finishing call is made once per refresh. If `end_update` fails,
    /// the next poll retries only `end_update`.
    pub fn poll<P: EinkPanel>(
        &mut self,
        panel: &mut P,
        flags: FrameFlags,
    ) -> Result<Option<Decision>, P::Error> {
        match self.state {
            State::Idle => return Ok(None),
            State::Running => {
                if panel.is_busy()? {
                    return Ok(Some(Decision::Skipped(blocked_reason(flags))));
                }
                panel.end_async_full()?;
                self.state = State::Finishing;
            }
            State::Finishing => {}
        }

        panel.end_update()?;
        self.state = State::Idle;
        debug!("async full refresh complete");
        Ok(None)
    }

    /// After a refresh was triggered: detach a full one, finish a fast one.
    pub fn end_or_detach<P: EinkPanel>(
        &mut self,
        panel: &mut P,
        decision: Decision,
    ) -> Result<(), P::Error> {
        match decision {
            Decision::Full(_) => {
                self.state = State::Running;
                debug!("async full refresh started");
            }
            _ => panel.end_update()?,
        }
        Ok(())
    }
}

fn blocked_reason(flags: FrameFlags) -> Reason {
    if flags.contains(FrameFlags::DEMAND_FAST) {
        Reason::AsyncBlockedDemandFast
    } else if flags.contains(FrameFlags::COSMETIC) {
        Reason::AsyncBlockedCosmetic
    } else if flags.contains(FrameFlags::RESPONSIVE) {
        Reason::AsyncBlockedResponsive
    } else {
        Reason::AsyncBlockedBackground
    }
}
