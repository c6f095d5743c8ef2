use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::surface::geometry::{Point, Rect};

/// Handle to a primitive created on a [`DrawingSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct ShapeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Justification {
    Left,
    Center,
    Right,
}

/// Shape kind together with its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Rectangle {
        rect: Rect,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Text {
        anchor: Point,
        content: String,
        justification: Justification,
        font_size: f64,
        bold: bool,
    },
    Polyline {
        points: Vec<Point>,
    },
    RegularPolygon {
        center: Point,
        sides: u32,
        radius: f64,
    },
    Group {
        #[schema(value_type = Vec<usize>)]
        children: Vec<ShapeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub visible: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            visible: true,
        }
    }
}

impl Style {
    #[must_use]
    pub fn filled(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stroked(color: &str, width: f64) -> Self {
        Self {
            stroke: Some(color.to_string()),
            stroke_width: width,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = Some(color.to_string());
        self.stroke_width = width;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Vector-graphics capability used by the diagram shapes.
pub trait DrawingSurface: Send {
    fn create_shape(&mut self, geometry: Geometry, style: Style) -> ShapeId;

    fn group(&mut self, children: &[ShapeId]) -> ShapeId;

    /// # Errors
    ///
    /// Returns `AppError::Surface` if `shape` does not exist.
    fn set_fill(&mut self, shape: ShapeId, color: &str) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns `AppError::Surface` if `shape` does not exist or is not text.
    fn set_text(&mut self, shape: ShapeId, text: &str) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns `AppError::Surface` if `shape` does not exist.
    fn set_visible(&mut self, shape: ShapeId, visible: bool) -> AppResult<()>;

    /// Whole-shape rotation about `pivot`, in degrees clockwise.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Surface` if `shape` does not exist.
    fn rotate(&mut self, shape: ShapeId, degrees: f64, pivot: Point) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Rotation {
    pub degrees: f64,
    pub pivot: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SceneNode {
    #[schema(value_type = usize)]
    pub id: ShapeId,
    pub geometry: Geometry,
    pub style: Style,
    pub rotation: Option<Rotation>,
}

/// In-memory [`DrawingSurface`] that keeps every primitive as data.
///
/// Served as JSON so a browser page can paint the schematic.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: ShapeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Fill colour of `id`, if the shape exists and is filled.
    #[must_use]
    pub fn fill_of(&self, id: ShapeId) -> Option<&str> {
        self.node(id).and_then(|n| n.style.fill.as_deref())
    }

    /// Content of the text primitive `id`.
    #[must_use]
    pub fn text_of(&self, id: ShapeId) -> Option<&str> {
        match self.node(id).map(|n| &n.geometry) {
            Some(Geometry::Text { content, .. }) => Some(content.as_str()),
            _ => None,
        }
    }

    fn node_mut(&mut self, id: ShapeId) -> AppResult<&mut SceneNode> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| AppError::Surface(format!("unknown shape {}", id.0)))
    }
}

impl DrawingSurface for SceneGraph {
    fn create_shape(&mut self, geometry: Geometry, style: Style) -> ShapeId {
        let id = ShapeId(self.nodes.len());
        self.nodes.push(SceneNode {
            id,
            geometry,
            style,
            rotation: None,
        });
        id
    }

    fn group(&mut self, children: &[ShapeId]) -> ShapeId {
        self.create_shape(
            Geometry::Group {
                children: children.to_vec(),
            },
            Style::default(),
        )
    }

    fn set_fill(&mut self, shape: ShapeId, color: &str) -> AppResult<()> {
        self.node_mut(shape)?.style.fill = Some(color.to_string());
        Ok(())
    }

    fn set_text(&mut self, shape: ShapeId, text: &str) -> AppResult<()> {
        match &mut self.node_mut(shape)?.geometry {
            Geometry::Text { content, .. } => {
                text.clone_into(content);
                Ok(())
            }
            _ => Err(AppError::Surface(format!(
                "shape {} is not a text primitive",
                shape.0
            ))),
        }
    }

    fn set_visible(&mut self, shape: ShapeId, visible: bool) -> AppResult<()> {
        self.node_mut(shape)?.style.visible = visible;
        Ok(())
    }

    fn rotate(&mut self, shape: ShapeId, degrees: f64, pivot: Point) -> AppResult<()> {
        let node = self.node_mut(shape)?;
        let total = node.rotation.as_ref().map_or(0.0, |r| r.degrees) + degrees;
        node.rotation = Some(Rotation {
            degrees: total,
            pivot,
        });
        Ok(())
    }
}
