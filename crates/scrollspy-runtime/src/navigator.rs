#![forbid(unsafe_code)]

//! Animated programmatic scrolling.
//!
//! When the reader clicks a navigation entry, the document scrolls smoothly
//! until the target section's heading sits just below the fixed top bar.
//! The animation is a smoothstep tween over an explicit millisecond clock:
//! callers pass `now_ms` into every call, which keeps replays deterministic
//! and needs no wall-clock reads.
//!
//! # Design
//!
//! - The destination is `target_top - top_bar_px - anchor_buffer_px`,
//!   clamped to the scrollable range, so the heading is never hidden under
//!   the fixed header.
//! - `go_to` is idempotent: a second call toward the same destination while
//!   a tween is in flight is absorbed. A call toward a different
//!   destination retargets from the currently sampled position instead of
//!   compounding.
//! - Passive observation keeps running while the tween plays; the engine
//!   never suppresses the intermediate sections the animation passes
//!   through.

/// Tuning for [`ScrollNavigator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigatorConfig {
    /// Height of the fixed top bar that would otherwise cover the target
    /// heading.
    pub top_bar_px: f64,
    /// Extra breathing room between the top bar and the heading.
    pub anchor_buffer_px: f64,
    /// Tween duration. Zero is treated as one millisecond.
    pub duration_ms: u64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            top_bar_px: 64.0,
            anchor_buffer_px: 36.0,
            duration_ms: 360,
        }
    }
}

/// How a navigation request was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStart {
    /// A new tween was started.
    Started,
    /// An in-flight tween was redirected to a new destination.
    Retargeted,
    /// The request matched the in-flight destination (or the current
    /// position) and was absorbed.
    Absorbed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NavTween {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
}

impl NavTween {
    fn new(from: f64, to: f64, start_ms: u64, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
        }
    }

    fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    fn sample(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
        let eased = smoothstep(t);
        (self.from + (self.to - self.from) * eased).max(0.0)
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Drives one animated scroll at a time toward an anchored destination.
#[derive(Debug, Clone, Default)]
pub struct ScrollNavigator {
    config: NavigatorConfig,
    tween: Option<NavTween>,
}

impl ScrollNavigator {
    /// Create a navigator with the given configuration.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            tween: None,
        }
    }

    /// Create a navigator with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(NavigatorConfig::default())
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> NavigatorConfig {
        self.config
    }

    /// Whether a tween is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Destination of the in-flight tween, if any.
    #[must_use]
    pub fn destination(&self) -> Option<f64> {
        self.tween.map(|t| t.to)
    }

    /// The anchored scroll offset for a section whose top edge sits at
    /// `target_top`, clamped to `[0, max_scroll]`.
    #[must_use]
    pub fn anchor_offset(&self, target_top: f64, max_scroll: f64) -> f64 {
        (target_top - self.config.top_bar_px - self.config.anchor_buffer_px)
            .clamp(0.0, max_scroll.max(0.0))
    }

    /// Begin (or redirect) an animated scroll toward `target_top`.
    pub fn go_to(
        &mut self,
        target_top: f64,
        current_scroll: f64,
        max_scroll: f64,
        now_ms: u64,
    ) -> NavStart {
        let dest = self.anchor_offset(target_top, max_scroll);

        if let Some(tween) = self.tween {
            if (tween.to - dest).abs() < 0.5 {
                return NavStart::Absorbed;
            }
            // Retarget from wherever the animation currently sits, so two
            // quick clicks converge instead of compounding.
            let from = tween.sample(now_ms);
            self.tween = Some(NavTween::new(from, dest, now_ms, self.config.duration_ms));
            tracing::debug!(from, dest, "navigation retargeted");
            return NavStart::Retargeted;
        }

        if (current_scroll - dest).abs() < 0.5 {
            return NavStart::Absorbed;
        }

        self.tween = Some(NavTween::new(
            current_scroll,
            dest,
            now_ms,
            self.config.duration_ms,
        ));
        tracing::debug!(from = current_scroll, dest, "navigation started");
        NavStart::Started
    }

    /// Sample the tween at `now_ms`. Returns the scroll offset to apply, or
    /// `None` once the animation has settled (the final offset is returned
    /// exactly once, on the settling call).
    pub fn tick(&mut self, now_ms: u64) -> Option<f64> {
        let tween = self.tween?;
        if tween.is_done(now_ms) {
            self.tween = None;
            return Some(tween.to);
        }
        Some(tween.sample(now_ms))
    }

    /// Abandon any in-flight tween. Harmless mid-animation: the document
    /// simply stays wherever the last tick left it.
    pub fn cancel(&mut self) {
        self.tween = None;
    }
}
