use super::stage::Stage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    Advance(Stage),
    RevealSplit,
    ShowTapOtherSide,
    EnterEmotionSelection,
    ShowBeliefBuilder,
    ShowMergedView,
}

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    token: TimerToken,
    due_ms: f64,
    action: TimerAction,
    scheduled_in: Stage,
}

/// Delayed session actions. Each is bound to the stage it was scheduled in
/// and is dropped if the session has left that stage.
#[derive(Debug, Default)]
pub struct Timers {
    next_token: u64,
    pending: Vec<PendingTimer>,
}

impl Timers {
    pub fn schedule(
        &mut self,
        now_ms: f64,
        delay_ms: f64,
        action: TimerAction,
        scheduled_in: Stage,
    ) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        log::debug!("timer {token:?}: {action:?} in {delay_ms:.0} ms ({scheduled_in:?})");
        self.pending.push(PendingTimer {
            token,
            due_ms: now_ms + delay_ms,
            action,
            scheduled_in,
        });
        token
    }

    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.token != token);
        before != self.pending.len()
    }

    /// Drops every timer that belongs to a stage other than `stage`.
    pub fn cancel_outside(&mut self, stage: Stage) {
        self.pending.retain(|timer| {
            let keep = timer.scheduled_in == stage;
            if !keep {
                log::debug!("timer {:?}: {:?} cancelled", timer.token, timer.action);
            }
            keep
        });
    }

    /// Removes the earliest due action. Due timers whose stage no longer
    /// matches `current` are dropped on the way.
    pub fn pop_due(&mut self, now_ms: f64, current: Stage) -> Option<TimerAction> {
        loop {
            let index = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, timer)| timer.due_ms <= now_ms)
                .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
                .map(|(index, _)| index)?;
            let timer = self.pending.remove(index);
            if timer.scheduled_in == current {
                return Some(timer.action);
            }
            log::debug!("timer {:?}: {:?} dropped as stale", timer.token, timer.action);
        }
    }
}

#[cfg(test)]
impl Timers {
    fn is_pending(&self, action: TimerAction) -> bool {
        self.pending.iter().any(|timer| timer.action == action)
    }

    fn drain_due(&mut self, now_ms: f64, current: Stage) -> Vec<TimerAction> {
        std::iter::from_fn(|| self.pop_due(now_ms, current)).collect()
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}
