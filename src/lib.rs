//! Tideline drives scroll-linked and load-linked animation sequences over a
//! page of views.
//!
//! The moving parts, leaf first:
//!
//! 1. **Timeline**: an ordered list of property transitions ([`Timeline`],
//!    [`StepSpec`], [`Position`]) with one playback cursor.
//! 2. **Trigger binding**: a scroll-position state machine
//!    ([`TriggerBinding`]) that plays, reverses or scrubs its timeline as an
//!    activation window is crossed.
//! 3. **Registry**: [`SequenceRegistry`] owns every live sequence per view,
//!    drives them all from one frame tick, and tears a view down
//!    synchronously with `end_view`, reverting every animated property.
//!
//! The DOM-like collaborator sits behind the [`Stage`] trait;
//! [`MemoryStage`] is the in-process implementation used by tests and the
//! demo pages in [`pages`].
#![forbid(unsafe_code)]

pub mod core;
pub mod ease;
pub mod error;
pub mod pages;
pub mod registry;
pub mod stage;
pub mod theme;
pub mod timeline;
pub mod trigger;
pub mod value;

pub use core::{ClipInset, Point, Rect, Rgba8, Vec2, Viewport};
pub use ease::Ease;
pub use error::{TidelineError, TidelineResult};
pub use registry::{SequenceId, SequenceRegistry, ViewScope};
pub use stage::{ElementId, MemoryStage, Stage};
pub use theme::{init_theme, theme_crossfade, ThemePalette};
pub use timeline::{Position, StepId, StepSpec, Timeline};
pub use trigger::{ActivationWindow, Phase, TriggerBinding, TriggerMode};
pub use value::{Lerp, Property, Tween, TweenSpec, Value};
