//! Floor-plan document: the element collection and its ordering.

use crate::constants::{default_label, z_layer};
use crate::element::{Element, ElementId, ElementType};
use crate::error::{EditorError, EditorResult};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A floor plan containing all placed elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    /// Unique plan identifier.
    pub id: String,
    /// Plan name.
    pub name: String,
    /// All elements in the plan, keyed by ID.
    pub elements: HashMap<ElementId, Element>,
    /// Insertion order (oldest first).
    #[serde(default)]
    pub z_order: Vec<ElementId>,
}

impl Default for FloorPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl FloorPlan {
    /// Create a new empty plan.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            elements: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    /// Add an element on top of its layer.
    pub fn add(&mut self, element: Element) -> EditorResult<()> {
        if self.elements.contains_key(&element.id) {
            return Err(EditorError::DuplicateElement(element.id));
        }
        self.z_order.push(element.id);
        self.elements.insert(element.id, element);
        Ok(())
    }

    /// Remove an element by ID.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&element_id| element_id != id);
        self.elements.remove(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Elements in draw order: by type layer, then by insertion.
    pub fn draw_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.z_order.iter().filter_map(|id| self.elements.get(id)).collect();
        // Stable sort keeps insertion order inside a layer.
        ordered.sort_by_key(|element| z_layer(element.element_type()));
        ordered
    }

    /// Bounding box of every element's visual outline.
    pub fn bounds(&self) -> Option<Rect> {
        self.elements
            .values()
            .map(Element::bounding_box)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Number of elements of a given type.
    pub fn count_of(&self, kind: ElementType) -> usize {
        self.elements.values().filter(|e| e.element_type() == kind).count()
    }

    /// Label for the next element of `kind`, e.g. `"Rack 3"`.
    pub fn next_label(&self, kind: ElementType) -> String {
        default_label(kind, self.count_of(kind) + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Serialize the plan to JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a plan from JSON, repairing an inconsistent `z_order`.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let mut plan: Self = serde_json::from_str(json)?;
        plan.repair_order();
        Ok(plan)
    }

    /// Drop unknown or repeated ids from `z_order` and append any element
    /// it is missing.
    fn repair_order(&mut self) {
        let mut seen = std::collections::HashSet::new();
        let elements = &self.elements;
        self.z_order.retain(|id| elements.contains_key(id) && seen.insert(*id));

        let mut missing: Vec<&Element> = self.elements.values().filter(|e| !seen.contains(&e.id)).collect();
        if !missing.is_empty() {
            log::warn!("{} elements missing from z_order, appending", missing.len());
            // HashMap order is arbitrary; pick something deterministic.
            missing.sort_by(|a, b| a.id.cmp(&b.id));
            self.z_order.extend(missing.into_iter().map(|e| e.id));
        }
    }
}
