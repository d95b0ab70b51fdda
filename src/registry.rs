use crate::core::Viewport;
use crate::stage::{ElementId, Stage};
use crate::timeline::Timeline;
use crate::trigger::{Phase, TriggerBinding};

/// Stable handle to one registered sequence. Handles go stale when their
/// owning view ends; stale handles simply stop resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(u64);

/// Tag for sequences created on behalf of one view. Obtained from
/// [`SequenceRegistry::begin_view`] and passed back on registration.
#[derive(Clone, Debug)]
pub struct ViewScope {
    view: String,
    root: ElementId,
}

impl ViewScope {
    pub fn view(&self) -> &str {
        &self.view
    }

    /// The view's element subtree root, as handed over on activation.
    pub fn root(&self) -> ElementId {
        self.root
    }
}

#[derive(Debug)]
struct Entry {
    id: SequenceId,
    view: String,
    timeline: Timeline,
    binding: Option<TriggerBinding>,
}

/// Page-view-wide registry of active timelines and trigger bindings.
///
/// All playback runs through [`SequenceRegistry::tick`], the shared frame
/// callback: bindings are evaluated first, then timelines advance, so one
/// tick never observes a phase change with a stale timeline position.
/// Raw scroll events only store the latest [`Viewport`] sample via
/// [`SequenceRegistry::set_viewport`]; nothing mutates outside the tick.
///
/// [`SequenceRegistry::end_view`] is the cancellation boundary: it reverts
/// and removes every entry of a view synchronously, so work queued for a
/// later tick can no longer touch anything that view animated.
#[derive(Debug, Default)]
pub struct SequenceRegistry {
    next_id: u64,
    entries: Vec<Entry>,
    viewport: Option<Viewport>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope for a view that is being activated; `root` is the
    /// view's mounted element subtree.
    #[tracing::instrument(skip(self))]
    pub fn begin_view(&mut self, view: &str, root: ElementId) -> ViewScope {
        ViewScope {
            view: view.into(),
            root,
        }
    }

    /// Register a timeline, optionally driven by a trigger binding, under
    /// the given view scope.
    ///
    /// A sequence without a binding is load-linked: it starts playing on
    /// the next tick. A bound sequence waits for its trigger.
    pub fn register(
        &mut self,
        scope: &ViewScope,
        mut timeline: Timeline,
        binding: Option<TriggerBinding>,
    ) -> SequenceId {
        let id = SequenceId(self.next_id);
        self.next_id += 1;
        if binding.is_none() {
            timeline.play();
        }
        tracing::debug!(view = %scope.view, id = id.0, bound = binding.is_some(), "registered sequence");
        self.entries.push(Entry {
            id,
            view: scope.view.clone(),
            timeline,
            binding,
        });
        id
    }

    /// Store the latest viewport/scroll sample for the next tick. Called
    /// from the raw scroll or resize handler; does no layout work itself.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// One frame tick: evaluate every binding against the latest viewport
    /// sample, then advance every playing timeline by `dt` seconds.
    #[tracing::instrument(skip(self, stage))]
    pub fn tick(&mut self, dt: f64, stage: &mut dyn Stage) {
        if let Some(vp) = self.viewport {
            for entry in &mut self.entries {
                if let Some(binding) = &mut entry.binding {
                    binding.update(&vp, &mut entry.timeline, stage);
                }
            }
        }
        for entry in &mut self.entries {
            entry.timeline.advance(dt, stage);
        }
    }

    /// Tear down everything a view created: stop in-flight playback,
    /// release pin locks and restore every animated property to its
    /// pre-sequence value. Synchronous and idempotent; must run before the
    /// collaborator removes the element subtree.
    #[tracing::instrument(skip(self, stage))]
    pub fn end_view(&mut self, view: &str, stage: &mut dyn Stage) {
        let mut kept = Vec::with_capacity(self.entries.len());
        for mut entry in std::mem::take(&mut self.entries) {
            if entry.view == view {
                if let Some(binding) = &mut entry.binding {
                    binding.release(stage);
                }
                entry.timeline.revert(stage);
                tracing::debug!(view, id = entry.id.0, "disposed sequence");
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
    }

    /// Dispose every registered sequence, regardless of view.
    pub fn flush(&mut self, stage: &mut dyn Stage) {
        for mut entry in std::mem::take(&mut self.entries) {
            if let Some(binding) = &mut entry.binding {
                binding.release(stage);
            }
            entry.timeline.revert(stage);
        }
    }

    pub fn timeline(&self, id: SequenceId) -> Option<&Timeline> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.timeline)
    }

    pub fn phase(&self, id: SequenceId) -> Option<Phase> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .and_then(|e| e.binding.as_ref())
            .map(|b| b.phase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_view(&self, view: &str) -> bool {
        self.entries.iter().any(|e| e.view == view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rect;
    use crate::stage::MemoryStage;
    use crate::timeline::{Position, StepSpec};
    use crate::trigger::{ActivationWindow, TriggerMode};
    use crate::value::{Property, Tween, Value};

    fn fade(el: crate::stage::ElementId) -> Timeline {
        let mut tl = Timeline::new();
        tl.append(
            vec![el],
            vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
            StepSpec::new(1.0),
            Position::Auto,
        )
        .unwrap();
        tl
    }

    #[test]
    fn unbound_sequences_autoplay_on_tick() {
        let mut stage = MemoryStage::new();
        let el = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = SequenceRegistry::new();
        let scope = reg.begin_view("hero", el);
        reg.register(&scope, fade(el), None);
        reg.tick(0.5, &mut stage);
        assert!((stage.scalar(el, &Property::Opacity).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn begin_then_end_before_any_tick_leaves_no_residue() {
        let mut stage = MemoryStage::new();
        let el = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = SequenceRegistry::new();
        let scope = reg.begin_view("hero", el);
        reg.register(&scope, fade(el), None);
        reg.end_view("hero", &mut stage);
        assert!(reg.is_empty());
        assert_eq!(stage.read(el, &Property::Opacity), None);
        reg.tick(1.0, &mut stage);
        assert_eq!(stage.read(el, &Property::Opacity), None);
    }

    #[test]
    fn end_view_is_idempotent() {
        let mut stage = MemoryStage::new();
        let el = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        stage.write(el, &Property::Opacity, Value::Scalar(0.6));
        let mut reg = SequenceRegistry::new();
        let scope = reg.begin_view("hero", el);
        reg.register(&scope, fade(el), None);
        reg.tick(0.25, &mut stage);
        reg.end_view("hero", &mut stage);
        let after_first = stage.scalar(el, &Property::Opacity);
        reg.end_view("hero", &mut stage);
        assert_eq!(stage.scalar(el, &Property::Opacity), after_first);
        assert_eq!(after_first, Some(0.6));
    }

    #[test]
    fn end_view_only_reverts_its_own_view() {
        let mut stage = MemoryStage::new();
        let a = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = stage.insert(Rect::new(0.0, 100.0, 10.0, 110.0));
        let mut reg = SequenceRegistry::new();
        let hero = reg.begin_view("hero", a);
        let about = reg.begin_view("about", b);
        reg.register(&hero, fade(a), None);
        reg.register(&about, fade(b), None);
        reg.tick(0.5, &mut stage);
        reg.end_view("hero", &mut stage);
        assert_eq!(stage.scalar(a, &Property::Opacity), Some(1.0));
        assert!((stage.scalar(b, &Property::Opacity).unwrap() - 0.5).abs() < 1e-9);
        assert!(reg.has_view("about"));
        assert!(!reg.has_view("hero"));
    }

    #[test]
    fn stale_handles_stop_resolving_after_end_view() {
        let mut stage = MemoryStage::new();
        let el = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut reg = SequenceRegistry::new();
        let scope = reg.begin_view("hero", el);
        let id = reg.register(&scope, fade(el), None);
        assert!(reg.timeline(id).is_some());
        reg.end_view("hero", &mut stage);
        assert!(reg.timeline(id).is_none());
        assert!(reg.phase(id).is_none());
    }

    #[test]
    fn end_view_releases_pins_and_stops_scrub() {
        let mut stage = MemoryStage::new();
        let animated = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        let trigger = stage.insert(Rect::new(0.0, 400.0, 100.0, 1200.0));
        let mut reg = SequenceRegistry::new();
        let scope = reg.begin_view("hero", trigger);
        let binding = TriggerBinding::new(
            trigger,
            ActivationWindow::new(0.0, 1.0).unwrap(),
            TriggerMode::PinAndScrub,
        );
        reg.register(&scope, fade(animated), Some(binding));
        reg.set_viewport(Viewport::new(1000.0, 800.0).unwrap().at_scroll(0.0));
        reg.tick(1.0 / 60.0, &mut stage);
        assert!(stage.is_pinned(trigger));
        reg.end_view("hero", &mut stage);
        assert!(!stage.is_pinned(trigger));
        // Scrub had applied 0.5; revert restores the pre-sequence value.
        assert_eq!(stage.scalar(animated, &Property::Opacity), Some(1.0));
    }

    #[test]
    fn bindings_are_evaluated_before_timelines_advance() {
        let mut stage = MemoryStage::new();
        let animated = stage.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
        let trigger = stage.insert(Rect::new(0.0, 400.0, 100.0, 1200.0));
        let mut reg = SequenceRegistry::new();
        let scope = reg.begin_view("hero", trigger);
        let binding = TriggerBinding::new(
            trigger,
            ActivationWindow::new(1.0, 0.0).unwrap(),
            TriggerMode::PlayReverseOnExit,
        );
        let id = reg.register(&scope, fade(animated), Some(binding));
        // Trigger is inside the window at scroll 0 (fraction 0.5): the same
        // tick that flips the phase also starts consuming play time.
        reg.set_viewport(Viewport::new(1000.0, 800.0).unwrap());
        reg.tick(0.25, &mut stage);
        assert_eq!(reg.phase(id), Some(Phase::Active));
        assert!((stage.scalar(animated, &Property::Opacity).unwrap() - 0.75).abs() < 1e-9);
    }
}
