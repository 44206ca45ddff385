//! Tick-based one-shot timers with cancellation tokens
//!
//! Every delayed phase change is an entry in the scheduler. Each slot keeps a
//! generation counter; scheduling or cancelling on a slot bumps it, so any
//! entry issued under an older generation is stale and never fires.

/// Independent timer lanes. A lane holds at most one live transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSlot {
    /// Phase transitions of the round state machine
    Phase,
    /// Once-per-second repeat cooldown countdown
    Cooldown,
}

impl TimerSlot {
    const COUNT: usize = 2;

    fn index(self) -> usize {
        match self {
            TimerSlot::Phase => 0,
            TimerSlot::Cooldown => 1,
        }
    }
}

/// Deferred state changes the controller can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Ready -> Flashing with a freshly generated sequence
    BeginRound,
    /// Move the flash cursor to the next bulb
    AdvanceFlash,
    /// Flashing -> Clear
    EnterClear,
    /// Clear -> Input
    EnterInput,
    /// Checking -> Success | Fail
    Resolve,
    /// Success -> Ready at the next level
    FinishSuccess,
    /// Fail -> Input with the slots emptied
    FinishFail,
    /// One second of repeat cooldown elapsed
    CooldownStep,
}

/// Identifies one scheduled transition; stale once its slot moves on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    slot: TimerSlot,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Scheduled {
    token: TimerToken,
    due_tick: u64,
    transition: Transition,
}

/// One-shot transition scheduler
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    generations: [u64; TimerSlot::COUNT],
    queue: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `transition` on `slot` to fire at `due_tick`.
    ///
    /// Supersedes whatever was pending on the same slot.
    pub fn schedule(
        &mut self,
        slot: TimerSlot,
        transition: Transition,
        due_tick: u64,
    ) -> TimerToken {
        let token = self.bump(slot);
        self.queue.push(Scheduled {
            token,
            due_tick,
            transition,
        });
        token
    }

    /// Invalidate whatever is pending on `slot`
    pub fn cancel(&mut self, slot: TimerSlot) {
        self.bump(slot);
    }

    /// Whether `token` would still fire
    #[cfg(test)]
    pub fn is_live(&self, token: TimerToken) -> bool {
        self.generations[token.slot.index()] == token.generation
            && self.queue.iter().any(|s| s.token == token)
    }

    /// The live transition pending on `slot`, if any
    #[cfg(test)]
    pub fn pending(&self, slot: TimerSlot) -> Option<Transition> {
        let generation = self.generations[slot.index()];
        self.queue
            .iter()
            .find(|s| s.token.slot == slot && s.token.generation == generation)
            .map(|s| s.transition)
    }

    /// Remove and return the earliest live transition due at or before `now`.
    ///
    /// Stale entries encountered along the way are discarded.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerSlot, Transition)> {
        let generations = self.generations;
        self.queue
            .retain(|s| generations[s.token.slot.index()] == s.token.generation);

        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_tick <= now)
            .min_by_key(|(_, s)| s.due_tick)
            .map(|(i, _)| i)?;

        let fired = self.queue.remove(idx);
        Some((fired.token.slot, fired.transition))
    }

    fn bump(&mut self, slot: TimerSlot) -> TimerToken {
        let generation = &mut self.generations[slot.index()];
        *generation += 1;
        let token = TimerToken {
            slot,
            generation: *generation,
        };
        self.queue
            .retain(|s| s.token.slot != slot || s.token.generation == token.generation);
        token
    }
}
