//! Time-driven interpolation of a single value.
//!
//! Tweens are advanced by the game loop with the frame's model time, so they
//! run in lockstep with the simulation instead of on a separate clock.

/// Finish tolerance for accumulated frame time (1/60 s sums drift below the duration).
const FINISH_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out: fast at first, gentle at the end
    Power1Out,
}

impl Ease {
    fn apply(self, t: f64) -> f64 {
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: f64,
    elapsed: f64,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f64 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * self.ease.apply(t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + FINISH_EPSILON >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_hits_midpoint() {
        let mut tween = Tween::new(1.0, 0.0, 15.0, Ease::Linear);
        assert!((tween.advance(7.5) - 0.5).abs() < 1e-12);
        assert!(!tween.is_finished());
    }

    #[test]
    fn power1_out_is_quadratic_decay() {
        let mut tween = Tween::new(0.03, 0.0, 0.1, Ease::Power1Out);
        let v = tween.advance(0.05);
        assert!((v - 0.0075).abs() < 1e-12);
    }

    #[test]
    fn frame_steps_reach_target_exactly() {
        let mut tween = Tween::new(0.03, 0.0, 0.1, Ease::Power1Out);
        for _ in 0..6 {
            tween.advance(1.0 / 60.0);
        }
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 0.0);
    }

    #[test]
    fn zero_duration_is_immediately_finished() {
        let tween = Tween::new(5.0, -3.15, 0.0, Ease::Power1Out);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), -3.15);
    }

    #[test]
    fn overshoot_clamps_to_target() {
        let mut tween = Tween::new(0.0, -3.15, 0.45, Ease::Power1Out);
        assert_eq!(tween.advance(10.0), -3.15);
    }
}
