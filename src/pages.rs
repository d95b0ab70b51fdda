//! Page compositions built on the orchestration core.
//!
//! Each page is a set of views, one view per logical section, built against
//! a [`MemoryStage`](crate::stage::MemoryStage) so the whole composition can
//! be driven headlessly. Views own their sequences through the registry and
//! are torn down with `end_view`.

pub mod portfolio;
pub mod restaurant;

use crate::core::Rect;
use crate::stage::{ElementId, MemoryStage};
use crate::value::{Property, Value};

/// Insert one element per character of `text`, laid out across `line`.
///
/// Split-text headlines animate per character; the glyph boxes only need
/// plausible geometry, not typography.
pub(crate) fn split_text(stage: &mut MemoryStage, line: Rect, text: &str) -> Vec<ElementId> {
    let count = text.chars().count().max(1);
    let advance = line.width() / count as f64;
    (0..count)
        .map(|i| {
            let x0 = line.x0 + advance * i as f64;
            stage.insert(Rect::new(x0, line.y0, x0 + advance, line.y1))
        })
        .collect()
}

/// Write an initial scalar property on a batch of elements, the way static
/// styling would have before any sequence runs.
pub(crate) fn preset(
    stage: &mut MemoryStage,
    els: &[ElementId],
    property: Property,
    value: f64,
) {
    for &el in els {
        use crate::stage::Stage as _;
        stage.write(el, &property, Value::Scalar(value));
    }
}
