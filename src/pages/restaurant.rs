//! The restaurant page: a pinned hero with a fullscreen image reveal, a
//! split-text about section and a navigation bar that slides in once the
//! about section reaches the top of the viewport.

use crate::core::{ClipInset, Rect, Viewport};
use crate::ease::Ease;
use crate::error::TidelineResult;
use crate::pages::{preset, split_text};
use crate::registry::SequenceRegistry;
use crate::stage::{ElementId, MemoryStage, Stage};
use crate::timeline::{Position, StepSpec, Timeline};
use crate::trigger::{ActivationWindow, TriggerBinding, TriggerMode};
use crate::value::{Property, Tween, Value};

pub const VIEW_APP: &str = "app";
pub const VIEW_HERO: &str = "hero";
pub const VIEW_ABOUT: &str = "about";

/// Extra scroll distance, in pixels, the pinned hero scrub spans.
const HERO_SCRUB_SPAN_PX: f64 = 1500.0;

/// Element handles for the restaurant page.
pub struct RestaurantPage {
    pub header: ElementId,
    pub hero: ElementId,
    pub hero_header: ElementId,
    pub hero_title: ElementId,
    pub hero_tagline: ElementId,
    pub hero_footer: ElementId,
    pub footer_caption: ElementId,
    pub footer_arrow: ElementId,
    pub image_placeholder: ElementId,
    pub fullscreen_image: ElementId,
    pub about: ElementId,
    pub about_line1: Vec<ElementId>,
    pub about_line2: Vec<ElementId>,
    pub about_line3: Vec<ElementId>,
    pub paragraphs: [ElementId; 2],
    pub cta: ElementId,
}

/// Lay the page out in document space and apply the static presets the
/// markup would carry (off-screen navigation bar, hidden call-to-action).
pub fn build(stage: &mut MemoryStage, vp: &Viewport) -> RestaurantPage {
    let w = vp.width;
    let h = vp.height;

    let header = stage.insert(Rect::new(0.0, 0.0, w, 64.0));
    let hero = stage.insert(Rect::new(0.0, 0.0, w, h));
    let hero_header = stage.insert(Rect::new(0.0, 48.0, w, 220.0));
    let hero_title = stage.insert(Rect::new(w * 0.1, 48.0, w * 0.9, 160.0));
    let hero_tagline = stage.insert(Rect::new(w * 0.2, 180.0, w * 0.8, 220.0));
    let hero_footer = stage.insert(Rect::new(0.0, h - 120.0, w, h - 32.0));
    let footer_caption = stage.insert(Rect::new(w * 0.3, h - 120.0, w * 0.7, h - 90.0));
    let footer_arrow = stage.insert(Rect::new(w * 0.49, h - 70.0, w * 0.51, h - 46.0));
    let placeholder_w = 0.3 * h;
    let placeholder_h = 0.4 * h;
    let image_placeholder = stage.insert(Rect::new(
        (w - placeholder_w) / 2.0,
        (h - placeholder_h) / 2.0,
        (w + placeholder_w) / 2.0,
        (h + placeholder_h) / 2.0,
    ));
    let fullscreen_image = stage.insert(Rect::new(0.0, 0.0, w, h));

    let about = stage.insert(Rect::new(0.0, h, w, h + 1000.0));
    let about_line1 = split_text(
        stage,
        Rect::new(w * 0.15, h + 180.0, w * 0.85, h + 240.0),
        "Sabor que conta histórias,",
    );
    let about_line2 = split_text(
        stage,
        Rect::new(w * 0.2, h + 250.0, w * 0.8, h + 310.0),
        "tradição que abraça.",
    );
    let about_line3 = split_text(
        stage,
        Rect::new(w * 0.25, h + 330.0, w * 0.75, h + 370.0),
        "em cada espeto, uma memória.",
    );
    let paragraphs = [
        stage.insert(Rect::new(w * 0.25, h + 430.0, w * 0.75, h + 560.0)),
        stage.insert(Rect::new(w * 0.25, h + 580.0, w * 0.75, h + 710.0)),
    ];
    let cta = stage.insert(Rect::new(w * 0.42, h + 760.0, w * 0.58, h + 810.0));

    // Static styling: the nav bar sits above the viewport and the
    // call-to-action is hidden and shifted down until its step runs.
    preset(stage, &[header], Property::Y, -64.0);
    preset(stage, &[cta], Property::Opacity, 0.0);
    preset(stage, &[cta], Property::Y, 32.0);

    RestaurantPage {
        header,
        hero,
        hero_header,
        hero_title,
        hero_tagline,
        hero_footer,
        footer_caption,
        footer_arrow,
        image_placeholder,
        fullscreen_image,
        about,
        about_line1,
        about_line2,
        about_line3,
        paragraphs,
        cta,
    }
}

/// Register every view's sequences. Fails loudly before registering
/// anything for a view whose configuration is malformed.
pub fn mount(
    registry: &mut SequenceRegistry,
    stage: &mut MemoryStage,
    vp: &Viewport,
) -> TidelineResult<RestaurantPage> {
    let page = build(stage, vp);
    mount_app_view(registry, vp, &page)?;
    mount_hero_view(registry, stage, vp, &page)?;
    mount_about_view(registry, vp, &page)?;
    Ok(page)
}

/// Slide the nav bar in once the about section reaches the viewport top;
/// slide it back out when the hero returns.
fn mount_app_view(
    registry: &mut SequenceRegistry,
    vp: &Viewport,
    page: &RestaurantPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_APP, page.header);
    let mut tl = Timeline::new();
    tl.append(
        vec![page.header],
        vec![Tween::to(Property::Y, Value::Scalar(0.0))],
        StepSpec::new(0.6).ease(Ease::OutCubic),
        Position::Auto,
    )?;
    let about_h = 1000.0;
    let window = ActivationWindow::new(0.0, -about_h / vp.height)?;
    let binding = TriggerBinding::new(page.about, window, TriggerMode::PlayReverseOnExit);
    registry.register(&scope, tl, Some(binding));
    Ok(())
}

/// Hero view: a load-linked intro plus a pinned scrub that fades the hero
/// furniture out while the fullscreen image unclips from the placeholder.
fn mount_hero_view(
    registry: &mut SequenceRegistry,
    stage: &mut MemoryStage,
    vp: &Viewport,
    page: &RestaurantPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_HERO, page.hero);

    let mut intro = Timeline::new();
    intro.append(
        vec![page.hero_title, page.hero_tagline],
        vec![
            Tween::from(Property::Opacity, Value::Scalar(0.0)),
            Tween::from(Property::Y, Value::Scalar(-40.0)),
        ],
        StepSpec::new(1.2).ease(Ease::OutQuart).stagger(0.2),
        Position::Auto,
    )?;
    intro.append(
        vec![page.image_placeholder],
        vec![
            Tween::from(Property::Opacity, Value::Scalar(0.0)),
            Tween::from(Property::Scale, Value::Scalar(0.95)),
        ],
        StepSpec::new(1.0).ease(Ease::OutCubic),
        Position::Overlap(0.8),
    )?;
    intro.append(
        vec![page.footer_caption, page.footer_arrow],
        vec![
            Tween::from(Property::Opacity, Value::Scalar(0.0)),
            Tween::from(Property::Y, Value::Scalar(40.0)),
        ],
        StepSpec::new(1.0).ease(Ease::OutQuart).stagger(0.2),
        Position::Overlap(0.7),
    )?;
    registry.register(&scope, intro, None);

    // The fullscreen image starts clipped down to the placeholder's box,
    // measured at mount time, and opens to the full viewport.
    let viewport_rect = Rect::new(0.0, 0.0, vp.width, vp.height);
    let placeholder_rect = stage.bounds(page.image_placeholder).unwrap_or(viewport_rect);
    let start_clip = ClipInset::around(viewport_rect, placeholder_rect, 10.0);

    let mut scrub = Timeline::new();
    scrub.append(
        vec![page.hero_header],
        vec![
            Tween::to(Property::Opacity, Value::Scalar(0.0)),
            Tween::to(Property::Y, Value::Scalar(-50.0)),
        ],
        StepSpec::new(0.5),
        Position::Auto,
    )?;
    scrub.append(
        vec![page.hero_footer],
        vec![
            Tween::to(Property::Opacity, Value::Scalar(0.0)),
            Tween::to(Property::Y, Value::Scalar(50.0)),
        ],
        StepSpec::new(0.5),
        Position::WithPrevious(0.0),
    )?;
    scrub.append(
        vec![page.image_placeholder],
        vec![Tween::to(Property::Opacity, Value::Scalar(0.0))],
        StepSpec::new(0.5),
        Position::WithPrevious(0.0),
    )?;
    scrub.append(
        vec![page.fullscreen_image],
        vec![Tween::from_to(
            Property::Clip,
            Value::Inset(start_clip),
            Value::Inset(ClipInset::NONE),
        )],
        StepSpec::new(1.0).ease(Ease::InOutCubic),
        Position::WithPrevious(0.0),
    )?;

    let window = ActivationWindow::new(0.0, -HERO_SCRUB_SPAN_PX / vp.height)?;
    let binding = TriggerBinding::new(page.hero, window, TriggerMode::PinAndScrub);
    registry.register(&scope, scrub, Some(binding));
    Ok(())
}

/// About view: staggered per-character headline reveal, then the body
/// paragraphs and the call-to-action; reverses when scrolled back above.
fn mount_about_view(
    registry: &mut SequenceRegistry,
    vp: &Viewport,
    page: &RestaurantPage,
) -> TidelineResult<()> {
    let scope = registry.begin_view(VIEW_ABOUT, page.about);
    let mut tl = Timeline::new();
    let line_spec = StepSpec::new(0.3).ease(Ease::OutCubic).stagger(0.05);
    let line_tweens = vec![
        Tween::from(Property::Y, Value::Scalar(20.0)),
        Tween::from(Property::Opacity, Value::Scalar(0.0)),
    ];
    tl.append(
        page.about_line1.clone(),
        line_tweens.clone(),
        line_spec,
        Position::Auto,
    )?;
    tl.append(
        page.about_line2.clone(),
        line_tweens.clone(),
        line_spec,
        Position::Overlap(0.3),
    )?;
    tl.append(
        page.about_line3.clone(),
        line_tweens,
        line_spec,
        Position::Overlap(0.3),
    )?;
    tl.append(
        page.paragraphs.to_vec(),
        vec![
            Tween::from(Property::Y, Value::Scalar(30.0)),
            Tween::from(Property::Opacity, Value::Scalar(0.0)),
        ],
        StepSpec::new(0.6).ease(Ease::OutCubic).stagger(0.2),
        Position::After(0.2),
    )?;
    tl.append(
        vec![page.cta],
        vec![
            Tween::to(Property::Y, Value::Scalar(0.0)),
            Tween::to(Property::Opacity, Value::Scalar(1.0)),
        ],
        StepSpec::new(0.8).ease(Ease::OutCubic),
        Position::After(0.1),
    )?;

    let about_h = 1000.0;
    let window = ActivationWindow::new(0.5, -about_h / vp.height)?;
    let binding = TriggerBinding::new(page.about, window, TriggerMode::PlayReverseOnExit);
    registry.register(&scope, tl, Some(binding));
    Ok(())
}
