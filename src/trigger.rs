use crate::core::Viewport;
use crate::error::{TidelineError, TidelineResult};
use crate::stage::{ElementId, Stage};
use crate::timeline::Timeline;

/// Scroll range over which a binding is engaged, expressed as
/// viewport-relative fractions of the reference element's top edge.
///
/// `start` and `end` may be given in either order; progress runs 0 at
/// `start` and 1 at `end`, whichever direction the page scrolls. A
/// degenerate window (`start == end`) is rejected at construction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActivationWindow {
    pub start: f64,
    pub end: f64,
}

impl ActivationWindow {
    pub fn new(start: f64, end: f64) -> TidelineResult<Self> {
        if !(start.is_finite() && end.is_finite()) {
            return Err(TidelineError::invalid_window(
                "thresholds must be finite fractions",
            ));
        }
        if start == end {
            return Err(TidelineError::invalid_window(format!(
                "start and end thresholds coincide at {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Unclamped progress of a sample through the window: < 0 before,
    /// 0..=1 inside, > 1 after.
    fn progress(&self, p: f64) -> f64 {
        (p - self.start) / (self.end - self.start)
    }
}

/// What a binding does with its timeline as the window is crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TriggerMode {
    /// Play forward on enter; exits leave the timeline where it is.
    PlayOnce,
    /// Play forward on enter, run backward when the window is left.
    PlayReverseOnExit,
    /// Timeline progress is bound continuously to window progress.
    Scrub,
    /// `Scrub`, with the reference element's layout position locked while
    /// the window is active.
    PinAndScrub,
}

/// Observable state of the binding's state machine. `Entering` only exists
/// as the transition edge; a settled binding is never seen in it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    Before,
    Entering,
    Active,
    After,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Before,
    Inside,
    After,
}

fn region(progress: f64) -> Region {
    if progress < 0.0 {
        Region::Before
    } else if progress > 1.0 {
        Region::After
    } else {
        Region::Inside
    }
}

/// Scroll-position-driven controller that starts, reverses or scrubs one
/// [`Timeline`].
///
/// The binding is a four-state machine over the reference element's
/// viewport fraction. A sample that jumps across the whole window still
/// fires both the entry and exit transitions, in window order, within the
/// same update.
#[derive(Clone, Debug)]
pub struct TriggerBinding {
    element: ElementId,
    window: ActivationWindow,
    mode: TriggerMode,
    replay_on_enter: bool,
    phase: Phase,
    pinned: bool,
}

impl TriggerBinding {
    pub fn new(
        element: ElementId,
        window: ActivationWindow,
        mode: TriggerMode,
    ) -> Self {
        Self {
            element,
            window,
            mode,
            replay_on_enter: false,
            phase: Phase::Before,
            pinned: false,
        }
    }

    /// Restart the timeline from current computed values on every entry,
    /// from either direction. Used for symmetric transitions such as theme
    /// cross-fades, where entering back must re-apply rather than reverse.
    pub fn replay_on_enter(mut self) -> Self {
        self.replay_on_enter = true;
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Feed one viewport sample through the state machine.
    ///
    /// A detached reference element degrades to an implicit forward exit;
    /// it is never an error.
    pub fn update(&mut self, viewport: &Viewport, timeline: &mut Timeline, stage: &mut dyn Stage) {
        let bounds = match stage.bounds(self.element) {
            Some(b) if stage.is_attached(self.element) => b,
            _ => {
                if self.phase != Phase::After {
                    tracing::debug!(element = self.element.0, "reference element detached");
                    self.exit_forward(timeline, stage);
                    self.phase = Phase::After;
                }
                return;
            }
        };

        let p = viewport.fraction_of(bounds);
        let progress = self.window.progress(p);
        let target = region(progress);

        // On the first sample the machine starts in `Before` and walks to
        // wherever the page already is, so mid-scroll loads fire the same
        // transitions a real scroll would have.
        loop {
            match (self.phase, target) {
                (Phase::Before, Region::Inside | Region::After) => {
                    self.enter(Direction::Forward, timeline, stage);
                }
                (Phase::Active, Region::After) => {
                    self.exit_forward(timeline, stage);
                    self.phase = Phase::After;
                }
                (Phase::After, Region::Inside | Region::Before) => {
                    self.enter(Direction::Backward, timeline, stage);
                }
                (Phase::Active, Region::Before) => {
                    self.exit_backward(timeline, stage);
                    self.phase = Phase::Before;
                }
                _ => break,
            }
        }

        if self.phase == Phase::Active
            && matches!(self.mode, TriggerMode::Scrub | TriggerMode::PinAndScrub)
        {
            timeline.progress_to(progress.clamp(0.0, 1.0), stage);
        }
    }

    fn enter(&mut self, direction: Direction, timeline: &mut Timeline, stage: &mut dyn Stage) {
        self.phase = Phase::Entering;
        tracing::debug!(element = self.element.0, ?direction, "entering window");
        match (self.mode, direction) {
            (TriggerMode::PlayOnce, _) if self.replay_on_enter => timeline.restart(),
            (TriggerMode::PlayOnce, Direction::Forward) => timeline.play(),
            (TriggerMode::PlayOnce, Direction::Backward) => {}
            (TriggerMode::PlayReverseOnExit, Direction::Forward) => timeline.play(),
            (TriggerMode::PlayReverseOnExit, Direction::Backward) => timeline.reverse(),
            (TriggerMode::Scrub, _) => {}
            (TriggerMode::PinAndScrub, _) => self.pin(stage, true),
        }
        self.phase = Phase::Active;
    }

    fn exit_forward(&mut self, timeline: &mut Timeline, stage: &mut dyn Stage) {
        tracing::debug!(element = self.element.0, "leaving window forward");
        match self.mode {
            TriggerMode::PlayOnce | TriggerMode::PlayReverseOnExit => {}
            TriggerMode::Scrub => timeline.progress_to(1.0, stage),
            TriggerMode::PinAndScrub => {
                timeline.progress_to(1.0, stage);
                self.pin(stage, false);
            }
        }
    }

    fn exit_backward(&mut self, timeline: &mut Timeline, stage: &mut dyn Stage) {
        tracing::debug!(element = self.element.0, "leaving window backward");
        match self.mode {
            TriggerMode::PlayOnce => {}
            TriggerMode::PlayReverseOnExit => timeline.reverse(),
            TriggerMode::Scrub => timeline.progress_to(0.0, stage),
            TriggerMode::PinAndScrub => {
                timeline.progress_to(0.0, stage);
                self.pin(stage, false);
            }
        }
    }

    fn pin(&mut self, stage: &mut dyn Stage, pinned: bool) {
        if self.pinned != pinned {
            self.pinned = pinned;
            stage.set_pinned(self.element, pinned);
        }
    }

    /// Release any held pin lock; called during scope teardown.
    pub(crate) fn release(&mut self, stage: &mut dyn Stage) {
        self.pin(stage, false);
    }
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Forward,
    Backward,
}
