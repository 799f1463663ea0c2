/// Deferred visual effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Show auto-reveal element `ordinal` on `slide`.
    AutoReveal { slide: usize, ordinal: usize },
    /// Drop the exit mark of `slide`.
    ClearExit { slide: usize },
    /// Stop the invalid-click shake on a unit.
    ClearShake { widget: usize, unit: usize },
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due_ms: u64,
    visit: u64,
    effect: Effect,
}

/// Fire-and-forget timers tagged with the slide visit that created them.
///
/// The scheduler only orders and releases timers; whoever applies an effect
/// compares the visit against the current one and drops stale effects.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn schedule(&mut self, due_ms: u64, visit: u64, effect: Effect) {
        self.timers.push(Timer {
            due_ms,
            visit,
            effect,
        });
    }

    /// Remove and return every timer due at `now_ms`, earliest first.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<(u64, Effect)> {
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.due_ms <= now_ms {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| t.due_ms);
        due.into_iter().map(|t| (t.visit, t.effect)).collect()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timers.iter().map(|t| t.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_due_order() {
        let mut s = Scheduler::default();
        s.schedule(300, 1, Effect::ClearExit { slide: 1 });
        s.schedule(100, 1, Effect::AutoReveal { slide: 2, ordinal: 0 });
        s.schedule(900, 1, Effect::AutoReveal { slide: 2, ordinal: 1 });
        assert_eq!(s.next_due(), Some(100));

        let fired = s.drain_due(300);
        assert_eq!(
            fired,
            vec![
                (1, Effect::AutoReveal { slide: 2, ordinal: 0 }),
                (1, Effect::ClearExit { slide: 1 }),
            ]
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_due(), Some(900));
    }

    #[test]
    fn test_nothing_due() {
        let mut s = Scheduler::default();
        s.schedule(50, 0, Effect::ClearShake { widget: 0, unit: 1 });
        assert!(s.drain_due(49).is_empty());
        assert!(!s.is_empty());
    }
}
