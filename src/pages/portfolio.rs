//! The agency portfolio page: a loader curtain, a delayed page-load
//! sequence, per-card reveal triggers and per-section theme cross-fades.

use crate::core::{Rect, Rgba8, Viewport};
use crate::ease::Ease;
use crate::error::TidelineResult;
use crate::pages::preset;
use crate::registry::SequenceRegistry;
use crate::stage::{ElementId, MemoryStage};
use crate::theme::{init_theme, theme_crossfade, ThemePalette};
use crate::timeline::{Position, StepSpec, Timeline};
use crate::trigger::{ActivationWindow, TriggerBinding, TriggerMode};
use crate::value::{Property, Tween, Value};

pub const VIEW_LOADER: &str = "loader";
pub const VIEW_INTRO: &str = "intro";
pub const VIEW_REVEALS: &str = "reveals";
pub const VIEW_THEME: &str = "theme";

pub const EMERALD: ThemePalette = ThemePalette {
    accent: Rgba8::opaque(52, 211, 153),
    secondary: Rgba8::opaque(167, 243, 208),
    border: Rgba8::opaque(6, 95, 70),
    grid: Rgba8::opaque(6, 78, 59),
};

pub const CYAN: ThemePalette = ThemePalette {
    accent: Rgba8::opaque(34, 211, 238),
    secondary: Rgba8::opaque(165, 243, 252),
    border: Rgba8::opaque(21, 94, 117),
    grid: Rgba8::opaque(22, 78, 99),
};

pub const VIOLET: ThemePalette = ThemePalette {
    accent: Rgba8::opaque(139, 92, 246),
    secondary: Rgba8::opaque(221, 214, 254),
    border: Rgba8::opaque(91, 33, 182),
    grid: Rgba8::opaque(76, 29, 149),
};

pub struct ProjectCard {
    pub card: ElementId,
    pub visual_lines: [ElementId; 2],
}

pub struct PortfolioPage {
    pub root: ElementId,
    pub loader: ElementId,
    pub loader_texts: [ElementId; 2],
    pub header_items: Vec<ElementId>,
    pub hero: ElementId,
    pub hero_lines: [ElementId; 3],
    pub hero_subtext: ElementId,
    pub hero_cta: ElementId,
    pub hero_graphic: ElementId,
    pub about: ElementId,
    pub about_reveals: [ElementId; 2],
    pub skills: ElementId,
    pub projects: ElementId,
    pub projects_title: ElementId,
    pub cards: Vec<ProjectCard>,
    pub contact: ElementId,
    pub contact_reveals: [ElementId; 3],
}

pub fn build(stage: &mut MemoryStage, vp: &Viewport) -> PortfolioPage {
    let w = vp.width;
    let h = vp.height;

    let root = stage.insert(Rect::new(0.0, 0.0, w, 4000.0));
    let loader = stage.insert(Rect::new(0.0, 0.0, w, h));
    let loader_texts = [
        stage.insert(Rect::new(w * 0.35, h * 0.48, w * 0.48, h * 0.52)),
        stage.insert(Rect::new(w * 0.52, h * 0.48, w * 0.65, h * 0.52)),
    ];
    let header_items = (0..4)
        .map(|i| {
            let x0 = 48.0 + 120.0 * i as f64;
            stage.insert(Rect::new(x0, 24.0, x0 + 100.0, 56.0))
        })
        .collect();

    let hero = stage.insert(Rect::new(0.0, 0.0, w, 800.0));
    let hero_lines = [
        stage.insert(Rect::new(w * 0.2, 220.0, w * 0.8, 320.0)),
        stage.insert(Rect::new(w * 0.25, 330.0, w * 0.75, 430.0)),
        stage.insert(Rect::new(w * 0.3, 440.0, w * 0.7, 540.0)),
    ];
    let hero_subtext = stage.insert(Rect::new(w * 0.3, 560.0, w * 0.7, 610.0));
    let hero_cta = stage.insert(Rect::new(w * 0.44, 630.0, w * 0.56, 680.0));
    let hero_graphic = stage.insert(Rect::new(0.0, 0.0, w, 800.0));

    let about = stage.insert(Rect::new(0.0, 800.0, w, 1600.0));
    let about_reveals = [
        stage.insert(Rect::new(w * 0.25, 950.0, w * 0.75, 1050.0)),
        stage.insert(Rect::new(w * 0.25, 1080.0, w * 0.75, 1250.0)),
    ];
    let skills = stage.insert(Rect::new(0.0, 1600.0, w, 2000.0));

    let projects = stage.insert(Rect::new(0.0, 2000.0, w, 3200.0));
    let projects_title = stage.insert(Rect::new(w * 0.3, 2080.0, w * 0.7, 2160.0));
    let cards = (0..3)
        .map(|i| {
            let x0 = w * 0.06 + (w * 0.3) * i as f64;
            let card = stage.insert(Rect::new(x0, 2250.0, x0 + w * 0.27, 2900.0));
            let visual_lines = [
                stage.insert(Rect::new(x0 + 10.0, 2270.0, x0 + w * 0.25, 2380.0)),
                stage.insert(Rect::new(x0 + 10.0, 2290.0, x0 + w * 0.25, 2400.0)),
            ];
            ProjectCard { card, visual_lines }
        })
        .collect::<Vec<_>>();

    let contact = stage.insert(Rect::new(0.0, 3200.0, w, 4000.0));
    let contact_reveals = [
        stage.insert(Rect::new(w * 0.3, 3350.0, w * 0.7, 3450.0)),
        stage.insert(Rect::new(w * 0.3, 3480.0, w * 0.7, 3580.0)),
        stage.insert(Rect::new(w * 0.4, 3620.0, w * 0.6, 3690.0)),
    ];

    // Static styling the sequences animate away from: loader copy sits
    // below its clip box, project visuals have their dash fully offset.
    preset(stage, &loader_texts, Property::Y, 40.0);
    for c in &cards {
        preset(
            stage,
            &c.visual_lines,
            Property::var("stroke-dashoffset"),
            100.0,
        );
    }

    PortfolioPage {
        root,
        loader,
        loader_texts,
        header_items,
        hero,
        hero_lines,
        hero_subtext,
        hero_cta,
        hero_graphic,
        about,
        about_reveals,
        skills,
        projects,
        projects_title,
        cards,
        contact,
        contact_reveals,
    }
}

pub fn mount(
    registry: &mut SequenceRegistry,
    stage: &mut MemoryStage,
    vp: &Viewport,
) -> TidelineResult<PortfolioPage> {
    let page = build(stage, vp);
    mount_loader_view(registry, vp, &page)?;
    mount_intro_view(registry, &page)?;
    mount_reveal_view(registry, stage, vp, &page)?;
    mount_theme_view(registry, stage, vp, &page)?;
    Ok(page)
}

/// Loader curtain: raise the copy, drop it away, slide the curtain up.
fn mount_loader_view(
    registry: &mut SequenceRegistry,
    vp: &Viewport,
    page: &PortfolioPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_LOADER, page.loader);
    let mut tl = Timeline::new();
    tl.append(
        page.loader_texts.to_vec(),
        vec![Tween::to(Property::Y, Value::Scalar(0.0))],
        StepSpec::new(0.7).ease(Ease::OutCubic).stagger(0.2),
        Position::Auto,
    )?;
    tl.append(
        page.loader_texts.to_vec(),
        vec![
            Tween::to(Property::Y, Value::Scalar(-20.0)),
            Tween::to(Property::Opacity, Value::Scalar(0.0)),
        ],
        StepSpec::new(0.5).ease(Ease::InCubic).stagger(0.1),
        Position::After(1.0),
    )?;
    tl.append(
        vec![page.loader],
        vec![Tween::to(Property::Y, Value::Scalar(-vp.height))],
        StepSpec::new(0.8).ease(Ease::InOutQuart),
        Position::Overlap(0.2),
    )?;
    registry.register(&scope, tl, None);
    Ok(())
}

/// Page-load sequence, delayed until the loader has cleared.
fn mount_intro_view(
    registry: &mut SequenceRegistry,
    page: &PortfolioPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_INTRO, page.root);
    let mut tl = Timeline::with_delay(2.5);
    tl.append(
        page.header_items.clone(),
        vec![
            Tween::from(Property::Y, Value::Scalar(-30.0)),
            Tween::from(Property::Opacity, Value::Scalar(0.0)),
        ],
        StepSpec::new(0.6).ease(Ease::OutCubic).stagger(0.1),
        Position::Auto,
    )?;
    tl.append(
        page.hero_lines.to_vec(),
        vec![Tween::from(Property::Y, Value::Scalar(100.0))],
        StepSpec::new(0.8).ease(Ease::OutQuart).stagger(0.15),
        Position::WithPrevious(0.2),
    )?;
    tl.append(
        vec![page.hero_subtext, page.hero_cta],
        vec![
            Tween::from(Property::Y, Value::Scalar(50.0)),
            Tween::from(Property::Opacity, Value::Scalar(0.0)),
        ],
        StepSpec::new(0.8).ease(Ease::OutCubic),
        Position::WithPrevious(0.5),
    )?;
    tl.append(
        vec![page.hero_graphic],
        vec![
            Tween::from_to(Property::Opacity, Value::Scalar(0.0), Value::Scalar(1.0)),
            Tween::from_to(Property::Scale, Value::Scalar(0.9), Value::Scalar(1.0)),
        ],
        StepSpec::new(1.0).ease(Ease::OutCubic),
        Position::WithPrevious(0.0),
    )?;
    registry.register(&scope, tl, None);
    Ok(())
}

/// One play-once reveal per annotated element, plus the project cards'
/// dash-draw sequences.
fn mount_reveal_view(
    registry: &mut SequenceRegistry,
    stage: &MemoryStage,
    vp: &Viewport,
    page: &PortfolioPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_REVEALS, page.root);

    let mut reveals: Vec<ElementId> = Vec::new();
    reveals.extend(page.about_reveals);
    reveals.push(page.projects_title);
    reveals.extend(page.cards.iter().map(|c| c.card));
    reveals.extend(page.contact_reveals);

    for el in reveals {
        let mut tl = Timeline::new();
        tl.append(
            vec![el],
            vec![
                Tween::from(Property::Y, Value::Scalar(50.0)),
                Tween::from(Property::Opacity, Value::Scalar(0.0)),
            ],
            StepSpec::new(1.0).ease(Ease::OutQuart),
            Position::Auto,
        )?;
        let window = reveal_window(stage, vp, el, 0.9)?;
        let binding = TriggerBinding::new(el, window, TriggerMode::PlayOnce);
        registry.register(&scope, tl, Some(binding));
    }

    for card in &page.cards {
        let mut tl = Timeline::new();
        tl.append(
            card.visual_lines.to_vec(),
            vec![Tween::to(
                Property::var("stroke-dashoffset"),
                Value::Scalar(0.0),
            )],
            StepSpec::new(1.5).ease(Ease::InOutCubic).stagger(0.2),
            Position::Auto,
        )?;
        let window = reveal_window(stage, vp, card.card, 0.8)?;
        let binding = TriggerBinding::new(card.card, window, TriggerMode::PlayOnce);
        registry.register(&scope, tl, Some(binding));
    }
    Ok(())
}

/// Window from "element top at `start` of the viewport" down to "element
/// bottom at the viewport top".
fn reveal_window(
    stage: &MemoryStage,
    vp: &Viewport,
    el: ElementId,
    start: f64,
) -> TidelineResult<ActivationWindow> {
    use crate::stage::Stage as _;
    let height = stage.bounds(el).map(|b| b.height()).unwrap_or(vp.height);
    ActivationWindow::new(start, -height / vp.height)
}

/// Per-section accent palettes, symmetric in scroll direction.
fn mount_theme_view(
    registry: &mut SequenceRegistry,
    stage: &mut MemoryStage,
    vp: &Viewport,
    page: &PortfolioPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_THEME, page.root);
    init_theme(stage, page.root, &EMERALD);

    let sections = [
        (page.hero, 800.0, EMERALD),
        (page.about, 800.0, CYAN),
        (page.skills, 400.0, CYAN),
        (page.projects, 1200.0, VIOLET),
        (page.contact, 800.0, EMERALD),
    ];
    for (section, height, palette) in sections {
        // Engaged while the section spans the 40% viewport line.
        let window = ActivationWindow::new(0.4, 0.4 - height / vp.height)?;
        theme_crossfade(registry, &scope, page.root, section, palette, window, 0.8)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage as _;
    use crate::theme::ACCENT;

    fn drive(reg: &mut SequenceRegistry, stage: &mut MemoryStage, seconds: f64) {
        let dt = 1.0 / 60.0;
        let steps = (seconds / dt).ceil() as usize;
        for _ in 0..steps {
            reg.tick(dt, stage);
        }
    }

    #[test]
    fn loader_clears_and_intro_lands_after_delay() {
        let mut stage = MemoryStage::new();
        let vp = Viewport::new(1280.0, 800.0).unwrap();
        let mut reg = SequenceRegistry::new();
        let page = mount(&mut reg, &mut stage, &vp).unwrap();
        reg.set_viewport(vp);

        drive(&mut reg, &mut stage, 1.0);
        // Loader copy has risen but the intro is still inside its delay.
        assert_eq!(stage.scalar(page.loader_texts[0], &Property::Y), Some(0.0));
        assert_eq!(stage.read(page.header_items[0], &Property::Opacity), None);

        drive(&mut reg, &mut stage, 5.0);
        assert_eq!(stage.scalar(page.loader, &Property::Y), Some(-800.0));
        assert_eq!(
            stage.scalar(page.header_items[3], &Property::Opacity),
            Some(1.0)
        );
        assert_eq!(stage.scalar(page.hero_lines[2], &Property::Y), Some(0.0));
    }

    #[test]
    fn scrolling_to_projects_reveals_cards_and_shifts_theme() {
        let mut stage = MemoryStage::new();
        let vp = Viewport::new(1280.0, 800.0).unwrap();
        let mut reg = SequenceRegistry::new();
        let page = mount(&mut reg, &mut stage, &vp).unwrap();

        // Land mid-page so the projects section is in view.
        reg.set_viewport(vp.at_scroll(2100.0));
        drive(&mut reg, &mut stage, 3.0);

        let card = &page.cards[0];
        assert_eq!(stage.scalar(card.card, &Property::Opacity), Some(1.0));
        assert_eq!(
            stage.scalar(card.visual_lines[1], &Property::var("stroke-dashoffset")),
            Some(0.0)
        );
        let accent = stage
            .read(page.root, &Property::var(ACCENT))
            .and_then(|v| v.as_color())
            .unwrap();
        assert_eq!(accent, VIOLET.accent);
    }

    #[test]
    fn reveals_do_not_reverse_when_scrolled_back() {
        let mut stage = MemoryStage::new();
        let vp = Viewport::new(1280.0, 800.0).unwrap();
        let mut reg = SequenceRegistry::new();
        let page = mount(&mut reg, &mut stage, &vp).unwrap();

        reg.set_viewport(vp.at_scroll(2100.0));
        drive(&mut reg, &mut stage, 3.0);
        reg.set_viewport(vp.at_scroll(0.0));
        drive(&mut reg, &mut stage, 1.0);
        assert_eq!(
            stage.scalar(page.projects_title, &Property::Opacity),
            Some(1.0)
        );
    }
}
