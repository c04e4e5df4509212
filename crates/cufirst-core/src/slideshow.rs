//! Hero slideshow controller.
//!
//! [`Slideshow`] owns the current index and the autoplay timer. The timer is
//! an opaque handle `H` produced by a caller-supplied spawn function; the
//! slideshow only stores it and drops it to cancel. In the browser `H` is a
//! `gloo_timers::callback::Interval`.

use std::time::Duration;

use tracing::debug;

/// Autoplay interval when none is configured.
pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_secs(5);

/// What the slideshow drives: a set of slides and their indicators.
pub trait SlideView {
    /// Number of slides.
    fn slide_count(&self) -> usize;

    /// Marks slide `index` and its indicator active, all others inactive.
    fn activate(&mut self, index: usize);
}

/// Keys the slideshow reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKey {
    Previous,
    Next,
}

impl SlideKey {
    /// Maps a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Previous),
            "ArrowRight" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Why autoplay is held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// The pointer is over the slider.
    Hover,
    /// Keyboard focus is inside the slider.
    Focus,
}

/// Slideshow state over a [`SlideView`].
#[derive(Debug)]
pub struct Slideshow<V, H> {
    view: V,
    current: usize,
    interval: Duration,
    timer: Option<H>,
    hovered: bool,
    focused: bool,
    /// Autoplay was running when the first pause reason arrived.
    suspended: bool,
}

impl<V: SlideView, H> Slideshow<V, H> {
    /// Creates a stopped slideshow and shows the first slide.
    pub fn new(view: V) -> Self {
        let mut show = Self {
            view,
            current: 0,
            interval: DEFAULT_SLIDE_INTERVAL,
            timer: None,
            hovered: false,
            focused: false,
            suspended: false,
        };
        show.show(0);
        show
    }

    /// Builder method to set the autoplay interval.
    ///
    /// A zero interval keeps the default.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.interval = interval;
        }
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.view.slide_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the active slide.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Shows slide `index`, wrapping out-of-range values.
    ///
    /// Returns the slide actually shown, or `None` when there are no slides.
    pub fn show(&mut self, index: isize) -> Option<usize> {
        let count = self.len();
        if count == 0 {
            return None;
        }
        let wrapped = index.rem_euclid(count as isize) as usize;
        self.current = wrapped;
        self.view.activate(wrapped);
        Some(wrapped)
    }

    pub fn next(&mut self) -> Option<usize> {
        self.show(self.current as isize + 1)
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.show(self.current as isize - 1)
    }

    /// Starts autoplay, replacing any running timer.
    ///
    /// Does nothing and returns `false` with fewer than two slides.
    pub fn start<F>(&mut self, spawn: F) -> bool
    where
        F: FnOnce(Duration) -> H,
    {
        if self.len() < 2 {
            return false;
        }
        self.timer = None;
        self.timer = Some(spawn(self.interval));
        self.suspended = false;
        true
    }

    /// Stops autoplay.
    pub fn stop(&mut self) {
        self.timer = None;
        self.suspended = false;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Restarts the timer if autoplay is running, so the next automatic
    /// advance is a full interval away.
    pub fn restart<F>(&mut self, spawn: F) -> bool
    where
        F: FnOnce(Duration) -> H,
    {
        if !self.is_running() {
            return false;
        }
        self.start(spawn)
    }

    /// Suspends autoplay while the visitor hovers or focuses the slider.
    pub fn pause(&mut self, reason: PauseReason) {
        match reason {
            PauseReason::Hover => self.hovered = true,
            PauseReason::Focus => self.focused = true,
        }
        if self.timer.take().is_some() {
            debug!(?reason, "slideshow paused");
            self.suspended = true;
        }
    }

    /// Returns `true` while autoplay is suspended by a pause reason.
    pub fn is_paused(&self) -> bool {
        self.suspended
    }

    /// Clears a pause reason, resuming autoplay once none is left.
    pub fn resume<F>(&mut self, reason: PauseReason, spawn: F) -> bool
    where
        F: FnOnce(Duration) -> H,
    {
        match reason {
            PauseReason::Hover => self.hovered = false,
            PauseReason::Focus => self.focused = false,
        }
        if !self.suspended || self.hovered || self.focused {
            return false;
        }
        self.start(spawn)
    }

    /// User navigation to `index`; restarts autoplay when it is running.
    pub fn navigate<F>(&mut self, index: isize, spawn: F) -> Option<usize>
    where
        F: FnOnce(Duration) -> H,
    {
        let shown = self.show(index)?;
        self.restart(spawn);
        Some(shown)
    }

    /// Handles a key press. Returns the slide shown, if the key was ours.
    pub fn handle_key<F>(&mut self, key: &str, spawn: F) -> Option<usize>
    where
        F: FnOnce(Duration) -> H,
    {
        let target = match SlideKey::from_key(key)? {
            SlideKey::Previous => self.current as isize - 1,
            SlideKey::Next => self.current as isize + 1,
        };
        self.navigate(target, spawn)
    }
}
