use std::collections::BTreeMap;

use crate::ease::Ease;
use crate::error::{TidelineError, TidelineResult};
use crate::stage::{ElementId, Stage};
use crate::value::{Lerp, Tween, TweenSpec, Value};

/// Start-offset specification for an appended step.
///
/// Mirrors the authoring grammar: an absolute time, `+=d` past the previous
/// step's end, `-=d` overlapping it, `<d` relative to the previous step's
/// start, or a named label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Position {
    /// After the previous step's end (the default when nothing is given).
    Auto,
    /// Absolute time in seconds.
    At(f64),
    /// `+=d`: d seconds past the previous step's end.
    After(f64),
    /// `-=d`: d seconds before the previous step's end, clamped at 0.
    Overlap(f64),
    /// `<d`: d seconds past the previous step's start (`<` itself is 0.0).
    WithPrevious(f64),
    /// At a previously defined label.
    Label(String),
}

/// Per-step options: duration, ease and per-target stagger, all in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepSpec {
    pub duration: f64,
    pub ease: Ease,
    pub stagger: f64,
}

impl StepSpec {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            ease: Ease::Linear,
            stagger: 0.0,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn stagger(mut self, stagger: f64) -> Self {
        self.stagger = stagger;
        self
    }
}

/// Stable handle to an appended step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StepId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Playback {
    Idle,
    Playing,
    Reversing,
}

#[derive(Clone, Debug)]
struct Step {
    targets: Vec<ElementId>,
    tweens: Vec<Tween>,
    duration: f64,
    ease: Ease,
    stagger: f64,
    start: f64,
    /// Endpoints resolved at first activation: `[target][tween] -> (from, to)`.
    resolved: Option<Vec<Vec<(Value, Value)>>>,
}

impl Step {
    fn span(&self) -> f64 {
        self.duration + self.stagger * (self.targets.len().saturating_sub(1)) as f64
    }

    fn end(&self) -> f64 {
        self.start + self.span()
    }

    fn capture(
        &mut self,
        stage: &dyn Stage,
        baselines: &mut BTreeMap<(ElementId, crate::value::Property), Value>,
    ) {
        if self.resolved.is_some() {
            return;
        }
        let mut all = Vec::with_capacity(self.targets.len());
        for &el in &self.targets {
            let mut per = Vec::with_capacity(self.tweens.len());
            for tween in &self.tweens {
                let current = stage
                    .read(el, &tween.property)
                    .unwrap_or_else(|| tween.property.default_value());
                baselines
                    .entry((el, tween.property.clone()))
                    .or_insert_with(|| current.clone());
                let (from, to) = match &tween.spec {
                    TweenSpec::To(v) => (current, v.clone()),
                    TweenSpec::From(v) => (v.clone(), current),
                    TweenSpec::FromTo { from, to } => (from.clone(), to.clone()),
                };
                per.push((from, to));
            }
            all.push(per);
        }
        self.resolved = Some(all);
    }

    fn apply_at(
        &mut self,
        cursor: f64,
        stage: &mut dyn Stage,
        baselines: &mut BTreeMap<(ElementId, crate::value::Property), Value>,
    ) {
        if cursor < self.start && self.resolved.is_none() {
            // Not reached yet; leave the element untouched.
            return;
        }
        if cursor >= self.start {
            self.capture(&*stage, baselines);
        }
        let Some(resolved) = &self.resolved else {
            return;
        };
        for (ti, &el) in self.targets.iter().enumerate() {
            let local_start = self.start + self.stagger * ti as f64;
            let t = if self.duration <= 0.0 {
                if cursor >= local_start { 1.0 } else { 0.0 }
            } else {
                ((cursor - local_start) / self.duration).clamp(0.0, 1.0)
            };
            let te = self.ease.apply(t);
            for (tween, (from, to)) in self.tweens.iter().zip(&resolved[ti]) {
                stage.write(el, &tween.property, Value::lerp(from, to, te));
            }
        }
    }
}

/// An ordered list of property transitions with a single playback cursor.
///
/// Steps are appended with explicit or relative offsets; start times resolve
/// deterministically at append time and are immutable afterward. Steps apply
/// in append order every time the cursor moves, so a later step wins any
/// property overlap for the overlapping interval.
#[derive(Clone, Debug)]
pub struct Timeline {
    steps: Vec<Step>,
    labels: BTreeMap<String, f64>,
    cursor: f64,
    state: Playback,
    delay: f64,
    delay_remaining: f64,
    baselines: BTreeMap<(ElementId, crate::value::Property), Value>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            labels: BTreeMap::new(),
            cursor: 0.0,
            state: Playback::Idle,
            delay: 0.0,
            delay_remaining: 0.0,
            baselines: BTreeMap::new(),
        }
    }

    /// Timeline that waits `delay` seconds after `play` before advancing.
    pub fn with_delay(delay: f64) -> Self {
        let mut tl = Self::new();
        tl.delay = delay.max(0.0);
        tl.delay_remaining = tl.delay;
        tl
    }

    /// Define a label. `Position::Auto` pins it to the current end time.
    pub fn add_label(&mut self, name: impl Into<String>, at: Position) -> TidelineResult<f64> {
        let name = name.into();
        if self.labels.contains_key(&name) {
            return Err(TidelineError::validation(format!(
                "duplicate label '{name}'"
            )));
        }
        let time = self.resolve(&at)?;
        self.labels.insert(name, time);
        Ok(time)
    }

    /// Resolve and append a step; returns its stable handle.
    ///
    /// Fails without appending anything when the offset references an
    /// undefined label or the options are malformed.
    pub fn append(
        &mut self,
        targets: Vec<ElementId>,
        tweens: Vec<Tween>,
        spec: StepSpec,
        at: Position,
    ) -> TidelineResult<StepId> {
        if targets.is_empty() {
            return Err(TidelineError::validation("step needs at least one target"));
        }
        if tweens.is_empty() {
            return Err(TidelineError::validation("step needs at least one tween"));
        }
        if !(spec.duration.is_finite() && spec.duration >= 0.0) {
            return Err(TidelineError::validation("step duration must be >= 0"));
        }
        if !(spec.stagger.is_finite() && spec.stagger >= 0.0) {
            return Err(TidelineError::validation("step stagger must be >= 0"));
        }

        let start = self.resolve(&at)?;
        let id = StepId(self.steps.len());
        self.steps.push(Step {
            targets,
            tweens,
            duration: spec.duration,
            ease: spec.ease,
            stagger: spec.stagger,
            start,
            resolved: None,
        });
        tracing::trace!(step = id.0, start, "appended step");
        Ok(id)
    }

    fn resolve(&self, at: &Position) -> TidelineResult<f64> {
        let prev_end = self.steps.last().map(Step::end).unwrap_or(0.0);
        let prev_start = self.steps.last().map(|s| s.start).unwrap_or(0.0);
        let start = match at {
            Position::Auto => prev_end,
            Position::At(t) => *t,
            Position::After(d) => prev_end + d,
            Position::Overlap(d) => (prev_end - d).max(0.0),
            Position::WithPrevious(d) => prev_start + d,
            Position::Label(name) => *self
                .labels
                .get(name)
                .ok_or_else(|| TidelineError::UnresolvedLabel(name.clone()))?,
        };
        if !(start.is_finite() && start >= 0.0) {
            return Err(TidelineError::validation(
                "resolved step start must be finite and >= 0",
            ));
        }
        Ok(start)
    }

    pub fn total_duration(&self) -> f64 {
        self.steps.iter().map(Step::end).fold(0.0, f64::max)
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn progress(&self) -> f64 {
        let total = self.total_duration();
        if total <= 0.0 {
            0.0
        } else {
            (self.cursor / total).clamp(0.0, 1.0)
        }
    }

    pub fn is_running(&self) -> bool {
        self.state != Playback::Idle
    }

    /// Resume forward playback from the current cursor. At the end this is a
    /// no-op, which makes repeated enter triggers observable exactly once.
    pub fn play(&mut self) {
        if self.cursor < self.total_duration() {
            self.state = Playback::Playing;
        }
    }

    /// Run backward from the current cursor toward 0.
    pub fn reverse(&mut self) {
        if self.cursor > 0.0 {
            self.state = Playback::Reversing;
        } else {
            self.state = Playback::Idle;
        }
    }

    /// Rewind to 0, drop resolved endpoints so they re-capture from current
    /// computed values, and play again. Recorded baselines are kept: revert
    /// still restores the values from before the very first run.
    pub fn restart(&mut self) {
        self.cursor = 0.0;
        self.delay_remaining = self.delay;
        for step in &mut self.steps {
            step.resolved = None;
        }
        self.state = Playback::Playing;
    }

    /// Set progress directly from an external clock (scrub modes); `t` is a
    /// fraction of total duration, clamped to `[0, 1]`.
    pub fn progress_to(&mut self, t: f64, stage: &mut dyn Stage) {
        self.state = Playback::Idle;
        self.cursor = t.clamp(0.0, 1.0) * self.total_duration();
        self.apply(stage);
    }

    /// Advance the cursor by one frame tick and re-apply every step.
    pub fn advance(&mut self, dt: f64, stage: &mut dyn Stage) {
        if dt <= 0.0 {
            return;
        }
        match self.state {
            Playback::Idle => {}
            Playback::Playing => {
                let mut dt = dt;
                if self.delay_remaining > 0.0 {
                    let consumed = self.delay_remaining.min(dt);
                    self.delay_remaining -= consumed;
                    dt -= consumed;
                    if dt <= 0.0 {
                        return;
                    }
                }
                let total = self.total_duration();
                self.cursor = (self.cursor + dt).min(total);
                if self.cursor >= total {
                    self.state = Playback::Idle;
                }
                self.apply(stage);
            }
            Playback::Reversing => {
                self.cursor = (self.cursor - dt).max(0.0);
                if self.cursor <= 0.0 {
                    self.state = Playback::Idle;
                }
                self.apply(stage);
            }
        }
    }

    fn apply(&mut self, stage: &mut dyn Stage) {
        let cursor = self.cursor;
        for step in &mut self.steps {
            step.apply_at(cursor, stage, &mut self.baselines);
        }
    }

    /// Restore every animated property to the value it held immediately
    /// before the first step that touched it ran, then reset playback state.
    pub fn revert(&mut self, stage: &mut dyn Stage) {
        for ((el, property), value) in &self.baselines {
            if stage.is_attached(*el) {
                stage.write(*el, property, value.clone());
            }
        }
        self.baselines.clear();
        for step in &mut self.steps {
            step.resolved = None;
        }
        self.cursor = 0.0;
        self.delay_remaining = self.delay;
        self.state = Playback::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rect;
    use crate::stage::MemoryStage;
    use crate::value::Property;

    fn stage_with(n: usize) -> (MemoryStage, Vec<ElementId>) {
        let mut stage = MemoryStage::new();
        let els = (0..n)
            .map(|i| stage.insert(Rect::new(0.0, i as f64 * 100.0, 100.0, i as f64 * 100.0 + 50.0)))
            .collect();
        (stage, els)
    }

    #[test]
    fn relative_offsets_resolve_against_previous_step() {
        let (_, els) = stage_with(1);
        let mut tl = Timeline::new();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.3),
            Position::At(0.0),
        )
        .unwrap();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::X, Value::Scalar(10.0))],
            StepSpec::new(0.3),
            Position::Overlap(0.1),
        )
        .unwrap();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::Y, Value::Scalar(10.0))],
            StepSpec::new(0.2),
            Position::After(0.1),
        )
        .unwrap();
        // B starts at 0.2, ends at 0.5; C starts at 0.6, ends at 0.8.
        assert!((tl.total_duration() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn overlap_is_clamped_at_zero() {
        let (_, els) = stage_with(1);
        let mut tl = Timeline::new();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.2),
            Position::Auto,
        )
        .unwrap();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::X, Value::Scalar(1.0))],
            StepSpec::new(0.2),
            Position::Overlap(5.0),
        )
        .unwrap();
        assert!((tl.total_duration() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn unresolved_label_fails_without_appending() {
        let (_, els) = stage_with(1);
        let mut tl = Timeline::new();
        let err = tl
            .append(
                vec![els[0]],
                vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
                StepSpec::new(0.3),
                Position::Label("intro".into()),
            )
            .unwrap_err();
        assert!(matches!(err, TidelineError::UnresolvedLabel(_)));
        assert_eq!(tl.total_duration(), 0.0);

        tl.add_label("intro", Position::At(1.0)).unwrap();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.5),
            Position::Label("intro".into()),
        )
        .unwrap();
        assert!((tl.total_duration() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let mut tl = Timeline::new();
        tl.add_label("x", Position::At(0.0)).unwrap();
        assert!(tl.add_label("x", Position::At(1.0)).is_err());
    }

    #[test]
    fn later_step_wins_property_overlap() {
        let (mut stage, els) = stage_with(1);
        let el = els[0];
        let mut tl = Timeline::new();
        // A: 0..0.3 opacity -> 0; B: 0.2..0.5 opacity -> 0.5 (appended later).
        tl.append(
            vec![el],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.3),
            Position::At(0.0),
        )
        .unwrap();
        tl.append(
            vec![el],
            vec![Tween::from_to(
                Property::Opacity,
                Value::Scalar(1.0),
                Value::Scalar(0.5),
            )],
            StepSpec::new(0.3),
            Position::Overlap(0.1),
        )
        .unwrap();

        tl.play();
        tl.advance(0.25, &mut stage);
        // B's interpolation at local t = (0.25 - 0.2) / 0.3, not A's at 0.8333.
        let t = (0.25 - 0.2) / 0.3;
        let expected = 1.0 + (0.5 - 1.0) * t;
        let got = stage.scalar(el, &Property::Opacity).unwrap();
        assert!((got - expected).abs() < 1e-9, "got {got}, want {expected}");
    }

    #[test]
    fn stagger_extends_span_and_offsets_targets() {
        let (mut stage, els) = stage_with(3);
        let mut tl = Timeline::new();
        tl.append(
            els.clone(),
            vec![Tween::from_to(
                Property::Y,
                Value::Scalar(40.0),
                Value::Scalar(0.0),
            )],
            StepSpec::new(1.0).stagger(0.2),
            Position::Auto,
        )
        .unwrap();
        assert!((tl.total_duration() - 1.4).abs() < 1e-12);

        tl.play();
        tl.advance(0.2, &mut stage);
        // First target is 20% through; later targets sit at their from value.
        let y0 = stage.scalar(els[0], &Property::Y).unwrap();
        let y1 = stage.scalar(els[1], &Property::Y).unwrap();
        assert!((y0 - 32.0).abs() < 1e-9);
        assert_eq!(y1, 40.0);
    }

    #[test]
    fn reverse_returns_to_initial_values() {
        let (mut stage, els) = stage_with(1);
        let el = els[0];
        stage.write(el, &Property::Opacity, Value::Scalar(0.8));
        let mut tl = Timeline::new();
        tl.append(
            vec![el],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.5).ease(Ease::OutCubic),
            Position::Auto,
        )
        .unwrap();

        tl.play();
        tl.advance(0.5, &mut stage);
        assert!((stage.scalar(el, &Property::Opacity).unwrap()).abs() < 1e-9);

        tl.reverse();
        tl.advance(0.5, &mut stage);
        let got = stage.scalar(el, &Property::Opacity).unwrap();
        assert!((got - 0.8).abs() < 1e-9);
    }

    #[test]
    fn play_at_end_is_a_no_op() {
        let (mut stage, els) = stage_with(1);
        let mut tl = Timeline::new();
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.2),
            Position::Auto,
        )
        .unwrap();
        tl.play();
        tl.advance(1.0, &mut stage);
        assert!(!tl.is_running());
        tl.play();
        assert!(!tl.is_running());
    }

    #[test]
    fn progress_to_jump_applies_completed_steps() {
        let (mut stage, els) = stage_with(1);
        let el = els[0];
        let mut tl = Timeline::new();
        tl.append(
            vec![el],
            vec![Tween::to(Property::X, Value::Scalar(100.0))],
            StepSpec::new(0.5),
            Position::Auto,
        )
        .unwrap();
        tl.append(
            vec![el],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.5),
            Position::Auto,
        )
        .unwrap();

        tl.progress_to(1.0, &mut stage);
        assert_eq!(stage.scalar(el, &Property::X), Some(100.0));
        assert_eq!(stage.scalar(el, &Property::Opacity), Some(0.0));

        tl.progress_to(0.0, &mut stage);
        assert_eq!(stage.scalar(el, &Property::X), Some(0.0));
        assert_eq!(stage.scalar(el, &Property::Opacity), Some(1.0));
    }

    #[test]
    fn delay_holds_cursor_before_playback() {
        let (mut stage, els) = stage_with(1);
        let mut tl = Timeline::with_delay(1.0);
        tl.append(
            vec![els[0]],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(0.5),
            Position::Auto,
        )
        .unwrap();
        tl.play();
        tl.advance(0.6, &mut stage);
        assert_eq!(tl.cursor(), 0.0);
        tl.advance(0.6, &mut stage);
        assert!((tl.cursor() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn revert_restores_pre_sequence_values_mid_flight() {
        let (mut stage, els) = stage_with(1);
        let el = els[0];
        stage.write(el, &Property::Y, Value::Scalar(12.0));
        let mut tl = Timeline::new();
        tl.append(
            vec![el],
            vec![
                Tween::to(Property::Y, Value::Scalar(-50.0)),
                Tween::to(Property::Opacity, Value::Scalar(0.0)),
            ],
            StepSpec::new(1.0),
            Position::Auto,
        )
        .unwrap();
        tl.play();
        tl.advance(0.4, &mut stage);
        tl.revert(&mut stage);
        assert_eq!(stage.scalar(el, &Property::Y), Some(12.0));
        assert_eq!(stage.scalar(el, &Property::Opacity), Some(1.0));
        assert_eq!(tl.cursor(), 0.0);
    }
}
