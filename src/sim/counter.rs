//! Bounded up/down counter
//!
//! Counts 1, 2, ..., limit, limit-1, ..., 0, 1, ... one step per call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingPong {
    limit: u32,
    value: u32,
    rising: bool,
}

impl PingPong {
    /// A limit of zero is raised to one
    pub fn new(limit: u32) -> Self {
        if limit == 0 {
            log::warn!("PingPong limit must be > 0, using 1");
        }
        Self {
            limit: limit.max(1),
            value: 0,
            rising: true,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Current value without stepping
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Step and return the new value
    pub fn step(&mut self) -> u32 {
        if self.rising {
            self.value += 1;
            if self.value >= self.limit {
                self.rising = false;
            }
        } else {
            self.value -= 1;
            if self.value == 0 {
                self.rising = true;
            }
        }
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
        self.rising = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up_and_back_down() {
        let mut counter = PingPong::new(3);
        let values: Vec<u32> = (0..9).map(|_| counter.step()).collect();
        assert_eq!(values, vec![1, 2, 3, 2, 1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let mut counter = PingPong::new(0);
        assert_eq!(counter.limit(), 1);
        assert_eq!(counter.step(), 1);
        assert_eq!(counter.step(), 0);
        assert_eq!(counter.step(), 1);
    }
}
