use crate::error::{TidelineError, TidelineResult};

pub use kurbo::{Point, Rect, Vec2};

/// Viewport metrics sampled from the scrolling collaborator.
///
/// `scroll_y` is the document-space offset of the viewport top edge. Element
/// bounds are document-space rects; [`Viewport::fraction_of`] converts an
/// element's top edge into the viewport-relative fraction that trigger
/// bindings consume (0.0 = viewport top, 1.0 = viewport bottom).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> TidelineResult<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(TidelineError::validation("Viewport width must be > 0"));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(TidelineError::validation("Viewport height must be > 0"));
        }
        Ok(Self {
            width,
            height,
            scroll_y: 0.0,
        })
    }

    pub fn at_scroll(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    pub fn fraction_of(&self, bounds: Rect) -> f64 {
        (bounds.y0 - self.scroll_y) / self.height
    }
}

/// Straight-alpha RGBA8 color, the value type behind named color channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Rectangular clip-region descriptor: distances inset from each edge of the
/// element box, with uniformly rounded corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipInset {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub radius: f64,
}

impl ClipInset {
    /// Fully open clip (nothing hidden).
    pub const NONE: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
        radius: 0.0,
    };

    /// Inset that clips `outer` down to `inner`.
    ///
    /// Used to start a fullscreen element clipped to a placeholder's box and
    /// animate toward [`ClipInset::NONE`].
    pub fn around(outer: Rect, inner: Rect, radius: f64) -> Self {
        Self {
            top: inner.y0 - outer.y0,
            right: outer.x1 - inner.x1,
            bottom: outer.y1 - inner.y1,
            left: inner.x0 - outer.x0,
            radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_rejects_degenerate_dimensions() {
        assert!(Viewport::new(0.0, 800.0).is_err());
        assert!(Viewport::new(1280.0, f64::NAN).is_err());
        assert!(Viewport::new(1280.0, 800.0).is_ok());
    }

    #[test]
    fn fraction_tracks_scroll() {
        let vp = Viewport::new(1000.0, 800.0).unwrap();
        let el = Rect::new(0.0, 400.0, 100.0, 500.0);
        assert_eq!(vp.fraction_of(el), 0.5);
        assert_eq!(vp.at_scroll(400.0).fraction_of(el), 0.0);
        assert_eq!(vp.at_scroll(800.0).fraction_of(el), -0.5);
    }

    #[test]
    fn clip_around_recovers_inner_box() {
        let outer = Rect::new(0.0, 0.0, 1280.0, 800.0);
        let inner = Rect::new(490.0, 200.0, 790.0, 600.0);
        let inset = ClipInset::around(outer, inner, 10.0);
        assert_eq!(inset.top, 200.0);
        assert_eq!(inset.right, 490.0);
        assert_eq!(inset.bottom, 200.0);
        assert_eq!(inset.left, 490.0);
    }
}
