//! The number draw and the endpoint variants that serve it

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;

/// Smallest value a draw can produce
pub const NUMBER_MIN: u8 = 1;

/// Largest value a draw can produce
pub const NUMBER_MAX: u8 = 10;

/// Closed range every endpoint answers from
pub const NUMBER_RANGE: RangeInclusive<u8> = NUMBER_MIN..=NUMBER_MAX;

/// Draw a uniform integer in `[1, 10]`
pub fn draw() -> u8 {
    rand::rng().random_range(NUMBER_RANGE)
}

/// How an endpoint waits before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// No delay
    Immediate,
    /// Sleeps on the serving worker thread
    Blocking,
    /// Sleeps on the dispatcher's blocking pool
    BlockingPool,
    /// Awaits a timer on the serving runtime
    Suspend,
    /// Awaits a timer inside a task spawned on the dispatcher
    SuspendRedispatched,
}

impl Variant {
    /// Every variant, in route order
    pub const ALL: [Variant; 5] = [
        Variant::Immediate,
        Variant::Blocking,
        Variant::BlockingPool,
        Variant::Suspend,
        Variant::SuspendRedispatched,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Variant::Immediate => "/need-a-number",
            Variant::Blocking => "/need-a-number1",
            Variant::BlockingPool => "/need-a-number2",
            Variant::Suspend => "/need-a-number3",
            Variant::SuspendRedispatched => "/need-a-number4",
        }
    }

    /// Short name of the waiting strategy
    pub fn strategy(self) -> &'static str {
        match self {
            Variant::Immediate => "none",
            Variant::Blocking => "thread sleep",
            Variant::BlockingPool => "thread sleep on blocking pool",
            Variant::Suspend => "timer",
            Variant::SuspendRedispatched => "timer on dispatcher",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Variant::Immediate => "Returns a number immediately",
            Variant::Blocking => "Blocks the serving thread, then returns a number",
            Variant::BlockingPool => {
                "Blocks a thread of the isolated blocking pool, then returns a number"
            }
            Variant::Suspend => "Suspends the task without holding a thread, then returns a number",
            Variant::SuspendRedispatched => {
                "Moves to the dispatcher runtime and suspends there, then returns a number"
            }
        }
    }

    /// Whether the endpoint waits before answering
    pub fn is_delayed(self) -> bool {
        !matches!(self, Variant::Immediate)
    }

    /// Whether the wait occupies a thread
    pub fn blocks_thread(self) -> bool {
        matches!(self, Variant::Blocking | Variant::BlockingPool)
    }

    pub fn from_path(path: &str) -> Option<Variant> {
        Self::ALL.into_iter().find(|v| v.path() == path)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
