#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Which side a leaving slide slides out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSide {
    Left,
    Right,
}

impl From<Direction> for ExitSide {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => ExitSide::Left,
            Direction::Backward => ExitSide::Right,
        }
    }
}

/// Exit mark on the slide that was just left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub slide: usize,
    pub side: ExitSide,
    pub started_ms: u64,
}

/// A successful slide change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Current slide (1-based) and everything derived from it.
#[derive(Debug, Clone)]
pub struct SlideNavigator {
    current: usize,
    total: usize,
    exiting: Option<Exit>,
    /// Incremented on every slide change; timers compare against it.
    visit: u64,
}

impl SlideNavigator {
    pub fn new(total: usize) -> Self {
        Self {
            current: 1,
            total: total.max(1),
            exiting: None,
            visit: 0,
        }
    }

    /// Place the navigator on slide `n` without a transition. Out-of-range
    /// values fall back to the nearest valid slide.
    pub fn start_at(&mut self, n: usize) {
        self.current = n.clamp(1, self.total);
        self.exiting = None;
        self.visit += 1;
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn visit(&self) -> u64 {
        self.visit
    }

    pub fn exiting(&self) -> Option<Exit> {
        self.exiting
    }

    pub fn contains(&self, n: usize) -> bool {
        (1..=self.total).contains(&n)
    }

    /// Move to slide `n`. Out-of-range targets and the current slide are no-ops.
    pub fn go_to(&mut self, n: usize, now_ms: u64) -> Option<Move> {
        if !self.contains(n) || n == self.current {
            return None;
        }
        let from = self.current;
        let direction = if n > from {
            Direction::Forward
        } else {
            Direction::Backward
        };

        self.exiting = Some(Exit {
            slide: from,
            side: direction.into(),
            started_ms: now_ms,
        });
        self.current = n;
        self.visit += 1;

        Some(Move {
            from,
            to: n,
            direction,
        })
    }

    /// Clear the exit mark if it still belongs to `slide` and `visit`.
    pub fn clear_exit(&mut self, slide: usize, visit: u64) -> bool {
        let matches = self.visit == visit && self.exiting.is_some_and(|e| e.slide == slide);
        if matches {
            self.exiting = None;
        }
        matches
    }

    /// Fraction of the deck passed, `(current - 1) / (total - 1)`.
    pub fn progress(&self) -> f32 {
        if self.total <= 1 {
            return 1.0;
        }
        (self.current - 1) as f32 / (self.total - 1) as f32
    }

    pub fn readout(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }

    pub fn can_go_prev(&self) -> bool {
        self.current > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.total
    }
}
