use crate::core::Rgba8;
use crate::ease::Ease;
use crate::error::TidelineResult;
use crate::registry::{SequenceId, SequenceRegistry, ViewScope};
use crate::stage::{ElementId, Stage};
use crate::timeline::{Position, StepSpec, Timeline};
use crate::trigger::{ActivationWindow, TriggerBinding, TriggerMode};
use crate::value::{Property, Tween, Value};

/// Named color channels a theme writes on the page root.
pub const ACCENT: &str = "--color-accent";
pub const SECONDARY: &str = "--color-secondary";
pub const BORDER: &str = "--color-border";
pub const GRID: &str = "--color-grid";

/// Accent palette applied by one page section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThemePalette {
    pub accent: Rgba8,
    pub secondary: Rgba8,
    pub border: Rgba8,
    pub grid: Rgba8,
}

impl ThemePalette {
    fn channels(&self) -> [(&'static str, Rgba8); 4] {
        [
            (ACCENT, self.accent),
            (SECONDARY, self.secondary),
            (BORDER, self.border),
            (GRID, self.grid),
        ]
    }
}

/// Seed the page-wide theme channels on the root element. Runs once at
/// page composition start; `end_view` on the owning scope restores them.
pub fn init_theme(stage: &mut dyn Stage, root: ElementId, palette: &ThemePalette) {
    for (name, color) in palette.channels() {
        stage.write(root, &Property::var(name), Value::Color(color));
    }
}

/// Cross-fade the root's theme channels to `palette` whenever `section`
/// is entered, from either scroll direction.
///
/// Entering re-captures the current channel values, so the fade always
/// starts from whatever palette the previous section left behind; leaving
/// does nothing, the next section's binding takes over.
pub fn theme_crossfade(
    registry: &mut SequenceRegistry,
    scope: &ViewScope,
    root: ElementId,
    section: ElementId,
    palette: ThemePalette,
    window: ActivationWindow,
    duration: f64,
) -> TidelineResult<SequenceId> {
    let mut timeline = Timeline::new();
    let tweens = palette
        .channels()
        .into_iter()
        .map(|(name, color)| Tween::to(Property::var(name), Value::Color(color)))
        .collect();
    timeline.append(
        vec![root],
        tweens,
        StepSpec::new(duration).ease(Ease::OutCubic),
        Position::Auto,
    )?;

    let binding = TriggerBinding::new(section, window, TriggerMode::PlayOnce).replay_on_enter();
    Ok(registry.register(scope, timeline, Some(binding)))
}
