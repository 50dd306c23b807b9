//! HUD animation primitives
//!
//! Animations are a tagged union interpreted by a single driver rather
//! than a trait-object hierarchy: the set of kinds is small and closed,
//! and composites nest the same enum.

/// Quadratic ease-in/ease-out over `t` in [0, 1].
pub fn ease_in_out_quadratic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

/// Critically damped spring toward a target value. Used for the combo
/// counter's scale pulse.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub value: f32,
    pub velocity: f32,
    pub target: f32,
    /// Angular frequency; higher settles faster
    pub omega: f32,
}

impl Spring {
    pub fn new(value: f32, omega: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            omega,
        }
    }

    /// Kick the spring to `value`; it will settle back to the target.
    pub fn pulse(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }

    /// Exact integration of the critically damped response over `dt`.
    pub fn update(&mut self, dt: f32) {
        let x = self.value - self.target;
        let v = self.velocity;
        let w = self.omega;
        let decay = (-w * dt).exp();
        self.value = self.target + (x + (v + w * x) * dt) * decay;
        self.velocity = (v - (v + w * x) * w * dt) * decay;
    }
}

/// One HUD animation: either a primitive over a fixed duration, or a
/// composite of nested animations.
#[derive(Debug, Clone)]
pub enum Animation {
    ScalePulse {
        from: f32,
        to: f32,
        duration: f32,
        time: f32,
    },
    Fade {
        from: f32,
        to: f32,
        duration: f32,
        time: f32,
    },
    /// Children run one after another
    Sequence(Vec<Animation>),
    /// Children run together
    Parallel(Vec<Animation>),
}

impl Animation {
    pub fn scale_pulse(from: f32, to: f32, duration: f32) -> Self {
        Animation::ScalePulse {
            from,
            to,
            duration,
            time: 0.0,
        }
    }

    pub fn fade(from: f32, to: f32, duration: f32) -> Self {
        Animation::Fade {
            from,
            to,
            duration,
            time: 0.0,
        }
    }

    pub fn sequence(children: Vec<Animation>) -> Self {
        Animation::Sequence(children)
    }

    pub fn parallel(children: Vec<Animation>) -> Self {
        Animation::Parallel(children)
    }

    pub fn finished(&self) -> bool {
        match self {
            Animation::ScalePulse { time, duration, .. }
            | Animation::Fade { time, duration, .. } => time >= duration,
            Animation::Sequence(children) | Animation::Parallel(children) => {
                children.iter().all(Animation::finished)
            }
        }
    }

    /// Advance by `dt`; returns true once the animation has finished.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.advance_inner(dt);
        self.finished()
    }

    /// Drives the animation and returns the unconsumed time, so a
    /// sequence can hand leftover time to its next child.
    fn advance_inner(&mut self, dt: f32) -> f32 {
        match self {
            Animation::ScalePulse { time, duration, .. }
            | Animation::Fade { time, duration, .. } => {
                let remaining = *duration - *time;
                if dt >= remaining {
                    *time = *duration;
                    dt - remaining
                } else {
                    *time += dt;
                    0.0
                }
            }
            Animation::Sequence(children) => {
                let mut dt = dt;
                for child in children {
                    if dt <= 0.0 {
                        break;
                    }
                    if !child.finished() {
                        dt = child.advance_inner(dt);
                    }
                }
                dt
            }
            Animation::Parallel(children) => {
                let mut leftover = dt;
                for child in children {
                    leftover = leftover.min(child.advance_inner(dt));
                }
                leftover
            }
        }
    }

    /// Current scale factor contributed by this animation.
    pub fn scale(&self) -> f32 {
        match self {
            Animation::ScalePulse {
                from,
                to,
                duration,
                time,
            } => {
                let t = ease_in_out_quadratic(time / duration.max(f32::EPSILON));
                from + (to - from) * t
            }
            Animation::Fade { .. } => 1.0,
            Animation::Sequence(children) => children
                .iter()
                .find(|child| !child.finished())
                .or(children.last())
                .map_or(1.0, Animation::scale),
            Animation::Parallel(children) => children.iter().map(Animation::scale).product(),
        }
    }

    /// Current alpha contributed by this animation.
    pub fn alpha(&self) -> f32 {
        match self {
            Animation::Fade {
                from,
                to,
                duration,
                time,
            } => {
                let t = ease_in_out_quadratic(time / duration.max(f32::EPSILON));
                from + (to - from) * t
            }
            Animation::ScalePulse { .. } => 1.0,
            Animation::Sequence(children) => children
                .iter()
                .find(|child| !child.finished())
                .or(children.last())
                .map_or(1.0, Animation::alpha),
            Animation::Parallel(children) => children.iter().map(Animation::alpha).product(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_bounds() {
        assert_eq!(ease_in_out_quadratic(0.0), 0.0);
        assert_eq!(ease_in_out_quadratic(1.0), 1.0);
        assert!((ease_in_out_quadratic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_spring_settles_without_overshoot() {
        let mut spring = Spring::new(1.0, 12.0);
        spring.pulse(1.5);
        let mut prev = spring.value;
        for _ in 0..240 {
            spring.update(1.0 / 60.0);
            // critically damped: monotonic decay back to the target
            assert!(spring.value <= prev + 1e-5);
            assert!(spring.value >= spring.target - 1e-3);
            prev = spring.value;
        }
        assert!((spring.value - spring.target).abs() < 1e-3);
    }

    #[test]
    fn test_fade_interpolates() {
        let mut fade = Animation::fade(1.0, 0.0, 0.5);
        assert_eq!(fade.alpha(), 1.0);
        assert!(!fade.advance(0.25));
        assert!((fade.alpha() - 0.5).abs() < 1e-5);
        assert!(fade.advance(0.25));
        assert_eq!(fade.alpha(), 0.0);
        assert_eq!(fade.scale(), 1.0);
    }

    #[test]
    fn test_sequence_runs_in_order() {
        let mut anim = Animation::sequence(vec![
            Animation::scale_pulse(2.0, 1.0, 0.1),
            Animation::fade(1.0, 0.0, 0.1),
        ]);
        assert_eq!(anim.scale(), 2.0);
        anim.advance(0.1);
        assert!(!anim.finished());
        // now in the fade, scale held at the pulse's end value
        assert!((anim.scale() - 1.0).abs() < 1e-5);
        anim.advance(0.05);
        assert!((anim.alpha() - 0.5).abs() < 1e-5);
        assert!(anim.advance(0.05));
    }

    #[test]
    fn test_parallel_combines() {
        let mut anim = Animation::parallel(vec![
            Animation::scale_pulse(2.0, 1.0, 0.2),
            Animation::fade(1.0, 0.0, 0.2),
        ]);
        anim.advance(0.1);
        assert!(anim.scale() < 2.0);
        assert!(anim.alpha() < 1.0);
        assert!(anim.advance(0.1));
    }
}
