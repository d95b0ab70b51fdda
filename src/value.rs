use crate::core::{ClipInset, Rgba8};

/// The fixed, enumerable set of visual properties this layer mutates.
///
/// `Var` addresses a named channel (theme color variables and other
/// property-like values) on its target element.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Property {
    X,
    Y,
    Opacity,
    Scale,
    Clip,
    Var(String),
}

impl Property {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Value an element holds for this property when nothing has set it.
    pub fn default_value(&self) -> Value {
        match self {
            Self::X | Self::Y => Value::Scalar(0.0),
            Self::Opacity | Self::Scale => Value::Scalar(1.0),
            Self::Clip => Value::Inset(ClipInset::NONE),
            Self::Var(_) => Value::Scalar(0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Scalar(f64),
    Color(Rgba8),
    Inset(ClipInset),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba8> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_inset(&self) -> Option<ClipInset> {
        match self {
            Self::Inset(v) => Some(*v),
            _ => None,
        }
    }
}

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

impl Lerp for ClipInset {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            top: <f64 as Lerp>::lerp(&a.top, &b.top, t),
            right: <f64 as Lerp>::lerp(&a.right, &b.right, t),
            bottom: <f64 as Lerp>::lerp(&a.bottom, &b.bottom, t),
            left: <f64 as Lerp>::lerp(&a.left, &b.left, t),
            radius: <f64 as Lerp>::lerp(&a.radius, &b.radius, t),
        }
    }
}

impl Lerp for Value {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(<f64 as Lerp>::lerp(x, y, t)),
            (Value::Color(x), Value::Color(y)) => Value::Color(<Rgba8 as Lerp>::lerp(x, y, t)),
            (Value::Inset(x), Value::Inset(y)) => Value::Inset(<ClipInset as Lerp>::lerp(x, y, t)),
            // Mismatched endpoint kinds snap to the destination.
            _ => b.clone(),
        }
    }
}

/// Endpoint specification for one property transition.
///
/// `To` tweens from the current computed value, `From` tweens toward it;
/// both resolve the implicit endpoint when the owning step first runs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TweenSpec {
    To(Value),
    From(Value),
    FromTo { from: Value, to: Value },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tween {
    pub property: Property,
    pub spec: TweenSpec,
}

impl Tween {
    pub fn to(property: Property, value: Value) -> Self {
        Self {
            property,
            spec: TweenSpec::To(value),
        }
    }

    pub fn from(property: Property, value: Value) -> Self {
        Self {
            property,
            spec: TweenSpec::From(value),
        }
    }

    pub fn from_to(property: Property, from: Value, to: Value) -> Self {
        Self {
            property,
            spec: TweenSpec::FromTo { from, to },
        }
    }
}
