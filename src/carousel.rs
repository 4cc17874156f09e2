//! Testimonial carousel state.
//!
//! Pure index arithmetic plus an autoplay deadline; callers pass the current
//! `Instant` so the behaviour does not depend on wall-clock timers.
//!
//! The HTTP endpoint is stateless: the page sends its current index and an
//! action. Autoplay belongs to whoever keeps a `Carousel` alive between
//! frames and calls `tick`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Direction of the slide transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideDirection {
    #[default]
    Forward,
    Backward,
}

/// Manual navigation actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselAction {
    Next,
    Previous,
    GoTo(usize),
}

#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    direction: SlideDirection,
    interval: Duration,
    last_change: Instant,
}

impl Carousel {
    pub fn new(len: usize, now: Instant) -> Self {
        Self::with_interval(len, DEFAULT_INTERVAL, now)
    }

    pub fn with_interval(len: usize, interval: Duration, now: Instant) -> Self {
        Self {
            len,
            index: 0,
            direction: SlideDirection::Forward,
            interval,
            last_change: now,
        }
    }

    /// Start at `index` (wrapped into range)
    pub fn at(len: usize, index: usize, now: Instant) -> Self {
        let mut carousel = Self::new(len, now);
        carousel.index = wrap(index, len);
        carousel
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    pub fn next(&mut self, now: Instant) -> usize {
        self.advance();
        self.last_change = now;
        self.index
    }

    pub fn previous(&mut self, now: Instant) -> usize {
        if self.len > 0 {
            self.index = self.index.checked_sub(1).unwrap_or(self.len - 1);
            self.direction = SlideDirection::Backward;
        }
        self.last_change = now;
        self.index
    }

    pub fn go_to(&mut self, index: usize, now: Instant) -> usize {
        if self.len > 0 {
            let target = wrap(index, self.len);
            if target != self.index {
                self.direction = if target > self.index {
                    SlideDirection::Forward
                } else {
                    SlideDirection::Backward
                };
                self.index = target;
            }
        }
        self.last_change = now;
        self.index
    }

    pub fn apply(&mut self, action: CarouselAction, now: Instant) -> usize {
        match action {
            CarouselAction::Next => self.next(now),
            CarouselAction::Previous => self.previous(now),
            CarouselAction::GoTo(index) => self.go_to(index, now),
        }
    }

    /// Autoplay step: advance once the interval since the last change has
    /// elapsed. Returns whether the slide changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.len < 2 || now.duration_since(self.last_change) < self.interval {
            return false;
        }
        self.advance();
        self.last_change = now;
        true
    }

    fn advance(&mut self) {
        if self.len > 0 {
            self.index = wrap(self.index + 1, self.len);
            self.direction = SlideDirection::Forward;
        }
    }
}

fn wrap(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index % len
    }
}
