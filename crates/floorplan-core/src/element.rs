//! Placeable floor-plan elements.
//!
//! An [`Element`] carries the data shared by every placeable item (position,
//! rotation, label, color) plus an [`ElementKind`] holding the type-specific
//! dimension fields. Geometry that depends on which field is "horizontal"
//! goes through one table, [`ElementType::axes`], so footprint, bounding box
//! and resize translation all agree.

use crate::constants::{self, DOOR_DEPTH, MIN_DIMENSION};
use crate::snap::normalize_degrees;
use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Generate a fresh element id.
pub fn new_element_id() -> ElementId {
    Uuid::new_v4()
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ElementColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for ElementColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<ElementColor> for Color {
    fn from(color: ElementColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Discriminant of an element, without its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Zone,
    Aisle,
    Rack,
    Wall,
    Door,
    Office,
}

/// A named dimension field of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimField {
    Width,
    Depth,
    Length,
    Thickness,
}

/// How an element type maps its fields onto the horizontal/vertical axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMap {
    /// Field along the local x axis.
    pub primary: DimField,
    /// Field along the local y axis (`None` = fixed depth).
    pub secondary: Option<DimField>,
    /// At a quarter turn the on-screen axes trade fields.
    pub swap_on_rotation: bool,
}

impl ElementType {
    /// Every element type, in toolbar order.
    pub const ALL: [ElementType; 6] = [
        ElementType::Zone,
        ElementType::Aisle,
        ElementType::Rack,
        ElementType::Wall,
        ElementType::Door,
        ElementType::Office,
    ];

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ElementType::Zone => "Zone",
            ElementType::Aisle => "Aisle",
            ElementType::Rack => "Rack",
            ElementType::Wall => "Wall",
            ElementType::Door => "Door",
            ElementType::Office => "Office",
        }
    }

    /// The field-to-axis table for this type.
    pub fn axes(self) -> AxisMap {
        match self {
            ElementType::Zone | ElementType::Rack | ElementType::Office => AxisMap {
                primary: DimField::Width,
                secondary: Some(DimField::Depth),
                swap_on_rotation: true,
            },
            ElementType::Aisle => AxisMap {
                primary: DimField::Length,
                secondary: Some(DimField::Width),
                swap_on_rotation: true,
            },
            ElementType::Wall => AxisMap {
                primary: DimField::Length,
                secondary: Some(DimField::Thickness),
                swap_on_rotation: true,
            },
            ElementType::Door => AxisMap {
                primary: DimField::Width,
                secondary: None,
                swap_on_rotation: true,
            },
        }
    }

    /// Rotate-handle behavior: walls and aisles toggle between 0° and 90°,
    /// everything else turns in 45° steps.
    pub fn next_rotation(self, rotation: f64) -> f64 {
        match self {
            ElementType::Wall | ElementType::Aisle => {
                if is_quarter_turn(rotation) { 0.0 } else { 90.0 }
            }
            _ => normalize_degrees(rotation + constants::ROTATION_STEP_DEGREES),
        }
    }
}

/// Type-specific dimensions. Missing fields deserialize as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Zone {
        #[serde(default)]
        width: f64,
        #[serde(default)]
        depth: f64,
    },
    Aisle {
        #[serde(default)]
        length: f64,
        #[serde(default)]
        width: f64,
    },
    Rack {
        #[serde(default)]
        width: f64,
        #[serde(default)]
        depth: f64,
        #[serde(default)]
        levels: u32,
        #[serde(default, rename = "binsPerShelf", alias = "bins_per_shelf")]
        bins_per_shelf: u32,
    },
    Wall {
        #[serde(default)]
        length: f64,
        #[serde(default)]
        thickness: f64,
    },
    Door {
        #[serde(default)]
        width: f64,
    },
    Office {
        #[serde(default)]
        width: f64,
        #[serde(default)]
        depth: f64,
    },
}

impl ElementKind {
    /// Default dimensions for a newly placed element of `kind`.
    pub fn default_for(kind: ElementType) -> Self {
        let (a, b) = constants::default_size(kind);
        match kind {
            ElementType::Zone => ElementKind::Zone { width: a, depth: b },
            ElementType::Aisle => ElementKind::Aisle { length: a, width: b },
            ElementType::Rack => {
                let (levels, bins_per_shelf) = constants::DEFAULT_RACK_LAYOUT;
                ElementKind::Rack { width: a, depth: b, levels, bins_per_shelf }
            }
            ElementType::Wall => ElementKind::Wall { length: a, thickness: b },
            ElementType::Door => ElementKind::Door { width: a },
            ElementType::Office => ElementKind::Office { width: a, depth: b },
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Zone { .. } => ElementType::Zone,
            ElementKind::Aisle { .. } => ElementType::Aisle,
            ElementKind::Rack { .. } => ElementType::Rack,
            ElementKind::Wall { .. } => ElementType::Wall,
            ElementKind::Door { .. } => ElementType::Door,
            ElementKind::Office { .. } => ElementType::Office,
        }
    }

    /// Read a dimension field, if this kind has it.
    pub fn dimension(&self, field: DimField) -> Option<f64> {
        match (self, field) {
            (ElementKind::Zone { width, .. }, DimField::Width)
            | (ElementKind::Rack { width, .. }, DimField::Width)
            | (ElementKind::Office { width, .. }, DimField::Width)
            | (ElementKind::Aisle { width, .. }, DimField::Width)
            | (ElementKind::Door { width }, DimField::Width) => Some(*width),
            (ElementKind::Zone { depth, .. }, DimField::Depth)
            | (ElementKind::Rack { depth, .. }, DimField::Depth)
            | (ElementKind::Office { depth, .. }, DimField::Depth) => Some(*depth),
            (ElementKind::Aisle { length, .. }, DimField::Length)
            | (ElementKind::Wall { length, .. }, DimField::Length) => Some(*length),
            (ElementKind::Wall { thickness, .. }, DimField::Thickness) => Some(*thickness),
            _ => None,
        }
    }

    /// Write a dimension field, clamped to [`MIN_DIMENSION`].
    /// Returns false if this kind has no such field.
    pub fn set_dimension(&mut self, field: DimField, value: f64) -> bool {
        let value = value.max(MIN_DIMENSION);
        let slot = match (self, field) {
            (ElementKind::Zone { width, .. }, DimField::Width)
            | (ElementKind::Rack { width, .. }, DimField::Width)
            | (ElementKind::Office { width, .. }, DimField::Width)
            | (ElementKind::Aisle { width, .. }, DimField::Width)
            | (ElementKind::Door { width }, DimField::Width) => width,
            (ElementKind::Zone { depth, .. }, DimField::Depth)
            | (ElementKind::Rack { depth, .. }, DimField::Depth)
            | (ElementKind::Office { depth, .. }, DimField::Depth) => depth,
            (ElementKind::Aisle { length, .. }, DimField::Length)
            | (ElementKind::Wall { length, .. }, DimField::Length) => length,
            (ElementKind::Wall { thickness, .. }, DimField::Thickness) => thickness,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Whether a rotation (degrees) is a quarter or three-quarter turn.
pub fn is_quarter_turn(rotation: f64) -> bool {
    let r = normalize_degrees(rotation);
    (r - 90.0).abs() < 1e-6 || (r - 270.0).abs() < 1e-6
}

/// Whether a rotation (degrees) is effectively zero.
pub fn is_unrotated(rotation: f64) -> bool {
    let r = normalize_degrees(rotation);
    r < 1e-6 || (360.0 - r) < 1e-6
}

/// A placeable element on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Type and type-specific dimensions.
    #[serde(flatten)]
    pub kind: ElementKind,
    /// Left edge of the unrotated footprint, in meters.
    pub x: f64,
    /// Top edge of the unrotated footprint, in meters.
    pub y: f64,
    /// Clockwise rotation in degrees around the footprint center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub label: String,
    pub color: ElementColor,
}

impl Element {
    /// Create an element of `kind` with default dimensions and color at `origin`.
    pub fn new(kind: ElementType, origin: Point) -> Self {
        Self {
            id: new_element_id(),
            kind: ElementKind::default_for(kind),
            x: origin.x,
            y: origin.y,
            rotation: 0.0,
            label: String::new(),
            color: constants::default_color(kind).into(),
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = normalize_degrees(rotation);
        self
    }

    /// Replace the dimensions.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn dim_or_zero(&self, field: Option<DimField>) -> f64 {
        match field {
            Some(f) => self.kind.dimension(f).unwrap_or(0.0),
            None => DOOR_DEPTH,
        }
    }

    /// Width/height of the footprint in its own unrotated frame.
    pub fn footprint(&self) -> Size {
        let axes = self.element_type().axes();
        Size::new(
            self.kind.dimension(axes.primary).unwrap_or(0.0),
            self.dim_or_zero(axes.secondary),
        )
    }

    /// Walls never rotate geometrically; a quarter-turned wall is an
    /// axis-aligned rectangle with length and thickness swapped.
    pub fn is_rotated_geometry(&self) -> bool {
        self.element_type() != ElementType::Wall && !is_unrotated(self.rotation)
    }

    /// Which fields the on-screen horizontal and vertical axes edit.
    /// `None` is the fixed door depth, which no handle edits.
    pub fn screen_axes(&self) -> (Option<DimField>, Option<DimField>) {
        let axes = self.element_type().axes();
        if axes.swap_on_rotation && is_quarter_turn(self.rotation) {
            (axes.secondary, Some(axes.primary))
        } else {
            (Some(axes.primary), axes.secondary)
        }
    }

    /// Size along the on-screen axes, following [`Element::screen_axes`].
    pub fn screen_size(&self) -> Size {
        let (h_field, v_field) = self.screen_axes();
        Size::new(self.dim_or_zero(h_field), self.dim_or_zero(v_field))
    }

    /// The rectangle the element occupies before rotation is applied.
    pub fn local_rect(&self) -> Rect {
        let size = if self.element_type() == ElementType::Wall {
            self.screen_size()
        } else {
            self.footprint()
        };
        Rect::from_origin_size(self.origin(), size)
    }

    /// Center of the unrotated footprint (the rotation pivot).
    pub fn center(&self) -> Point {
        self.local_rect().center()
    }

    /// World-space outline corners: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let r = self.local_rect();
        let pts = [
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ];
        if !self.is_rotated_geometry() {
            return pts;
        }
        let center = r.center().to_vec2();
        let rotate = Affine::translate(center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::translate(-center);
        pts.map(|p| rotate * p)
    }

    /// Axis-aligned world bounding box of the (possibly rotated) element.
    pub fn bounding_box(&self) -> Rect {
        let local = self.local_rect();
        if !self.is_rotated_geometry() {
            return local;
        }
        let theta = self.rotation.to_radians();
        let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
        let (w, h) = (local.width(), local.height());
        Rect::from_center_size(local.center(), Size::new(w * cos + h * sin, w * sin + h * cos))
    }

    /// Move the origin to `position`.
    pub fn move_to(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Apply a sparse update. Dimensions clamp to [`MIN_DIMENSION`];
    /// fields this kind doesn't have are skipped.
    pub fn apply_patch(&mut self, patch: &ElementPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = normalize_degrees(rotation);
        }
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        for (field, value) in patch.dimensions() {
            if !self.kind.set_dimension(field, value) {
                log::debug!("{:?} has no {:?} field, ignoring", self.element_type(), field);
            }
        }
        if let ElementKind::Rack { levels, bins_per_shelf, .. } = &mut self.kind {
            if let Some(l) = patch.levels {
                *levels = l.max(1);
            }
            if let Some(b) = patch.bins_per_shelf {
                *bins_per_shelf = b.max(1);
            }
        }
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ElementColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub levels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "binsPerShelf", alias = "bins_per_shelf")]
    pub bins_per_shelf: Option<u32>,
}

impl ElementPatch {
    /// A patch that moves the origin.
    pub fn position(position: Point) -> Self {
        Self {
            x: Some(position.x),
            y: Some(position.y),
            ..Default::default()
        }
    }

    /// A patch that sets the rotation.
    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    /// Set one dimension field.
    pub fn set_dimension(&mut self, field: DimField, value: f64) {
        let slot = match field {
            DimField::Width => &mut self.width,
            DimField::Depth => &mut self.depth,
            DimField::Length => &mut self.length,
            DimField::Thickness => &mut self.thickness,
        };
        *slot = Some(value);
    }

    /// The dimension fields present in this patch.
    pub fn dimensions(&self) -> Vec<(DimField, f64)> {
        [
            (DimField::Width, self.width),
            (DimField::Depth, self.depth),
            (DimField::Length, self.length),
            (DimField::Thickness, self.thickness),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
