use std::collections::BTreeMap;

use crate::core::Rect;
use crate::value::{Property, Value};

/// Opaque handle to one element of the collaborator's subtree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u64);

/// Boundary to the rendering/viewport collaborators.
///
/// The orchestration layer only ever touches elements through this trait:
/// document-space bounds queries, named property reads/writes, attachment
/// checks and pin locks. Implementations must treat writes against detached
/// elements as no-ops; the core absorbs detachment rather than failing.
pub trait Stage {
    /// Document-space bounding box, `None` when the element is unknown.
    fn bounds(&self, el: ElementId) -> Option<Rect>;

    /// Current computed value, `None` when nothing has set the property.
    fn read(&self, el: ElementId, property: &Property) -> Option<Value>;

    fn write(&mut self, el: ElementId, property: &Property, value: Value);

    fn is_attached(&self, el: ElementId) -> bool;

    /// Lock or release an element's layout position in the viewport.
    fn set_pinned(&mut self, el: ElementId, pinned: bool);
}

/// In-memory [`Stage`] used by tests, the demo pages and the demo binary.
#[derive(Clone, Debug, Default)]
pub struct MemoryStage {
    next_id: u64,
    elements: BTreeMap<ElementId, MemoryElement>,
}

#[derive(Clone, Debug)]
struct MemoryElement {
    bounds: Rect,
    props: BTreeMap<Property, Value>,
    attached: bool,
    pinned: bool,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bounds: Rect) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            MemoryElement {
                bounds,
                props: BTreeMap::new(),
                attached: true,
                pinned: false,
            },
        );
        id
    }

    /// Mark an element as removed from the live subtree. Its recorded
    /// properties stay readable so teardown behavior can be asserted on.
    pub fn detach(&mut self, el: ElementId) {
        if let Some(e) = self.elements.get_mut(&el) {
            e.attached = false;
            e.pinned = false;
        }
    }

    pub fn is_pinned(&self, el: ElementId) -> bool {
        self.elements.get(&el).is_some_and(|e| e.pinned)
    }

    /// Convenience scalar read for assertions.
    pub fn scalar(&self, el: ElementId, property: &Property) -> Option<f64> {
        self.read(el, property).and_then(|v| v.as_scalar())
    }
}

impl Stage for MemoryStage {
    fn bounds(&self, el: ElementId) -> Option<Rect> {
        self.elements.get(&el).map(|e| e.bounds)
    }

    fn read(&self, el: ElementId, property: &Property) -> Option<Value> {
        self.elements
            .get(&el)
            .and_then(|e| e.props.get(property).cloned())
    }

    fn write(&mut self, el: ElementId, property: &Property, value: Value) {
        if let Some(e) = self.elements.get_mut(&el)
            && e.attached
        {
            e.props.insert(property.clone(), value);
        }
    }

    fn is_attached(&self, el: ElementId) -> bool {
        self.elements.get(&el).is_some_and(|e| e.attached)
    }

    fn set_pinned(&mut self, el: ElementId, pinned: bool) {
        if let Some(e) = self.elements.get_mut(&el)
            && e.attached
        {
            e.pinned = pinned;
        }
    }
}
