//! Diagram elements as seen by renderers.
//!
//! Elements are owned by the host editor. Renderers only read them: the
//! type tag and business-object properties drive capability predicates, and
//! the geometry feeds default drawing and outline paths.

use indexmap::IndexMap;

/// A point in diagram coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x coordinate.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y coordinate.
    pub fn y(self) -> f32 {
        self.y
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the x coordinate.
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y coordinate.
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the width.
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height.
    pub fn height(self) -> f32 {
        self.height
    }

    /// The center point of the rectangle.
    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Where an element sits on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A node occupying a rectangle.
    Shape(Bounds),
    /// An edge routed through waypoints.
    Connection(Vec<Point>),
}

/// The semantic model object behind a diagram element.
///
/// Holds the qualified type name, the names of the types it derives from and
/// free-form string properties such as `scriptFormat`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessObject {
    type_name: String,
    super_types: Vec<String>,
    properties: IndexMap<String, String>,
}

impl BusinessObject {
    /// Creates a business object of `type_name` with no supertypes or properties.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Declares a type this object is also an instance of (builder style).
    pub fn with_super_type(mut self, type_name: impl Into<String>) -> Self {
        self.super_types.push(type_name.into());
        self
    }

    /// Sets a string property (builder style).
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns the type tag.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the declared supertypes.
    pub fn super_types(&self) -> &[String] {
        &self.super_types
    }

    /// Returns a string property by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns `true` if this object's type is `type_name` or derives from it.
    pub fn is_instance_of(&self, type_name: &str) -> bool {
        self.type_name == type_name || self.super_types.iter().any(|t| t == type_name)
    }
}

/// A diagram node or edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: String,
    business_object: BusinessObject,
    geometry: Geometry,
}

impl Element {
    /// Creates a shape element occupying `bounds`.
    pub fn shape(id: impl Into<String>, business_object: BusinessObject, bounds: Bounds) -> Self {
        Self {
            id: id.into(),
            business_object,
            geometry: Geometry::Shape(bounds),
        }
    }

    /// Creates a connection element routed through `waypoints`.
    pub fn connection(
        id: impl Into<String>,
        business_object: BusinessObject,
        waypoints: Vec<Point>,
    ) -> Self {
        Self {
            id: id.into(),
            business_object,
            geometry: Geometry::Connection(waypoints),
        }
    }

    /// Returns the element id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The external type tag, e.g. `bpmn:ScriptTask`.
    pub fn type_tag(&self) -> &str {
        self.business_object.type_name()
    }

    /// Returns the semantic payload.
    pub fn business_object(&self) -> &BusinessObject {
        &self.business_object
    }

    /// Returns the element geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Bounds of a shape element, `None` for connections.
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.geometry {
            Geometry::Shape(bounds) => Some(*bounds),
            Geometry::Connection(_) => None,
        }
    }

    /// Waypoints of a connection element, empty for shapes.
    pub fn waypoints(&self) -> &[Point] {
        match &self.geometry {
            Geometry::Shape(_) => &[],
            Geometry::Connection(waypoints) => waypoints,
        }
    }

    /// Returns `true` for connection geometry.
    pub fn is_connection(&self) -> bool {
        matches!(self.geometry, Geometry::Connection(_))
    }

    /// Type check used by capability predicates.
    pub fn is(&self, type_name: &str) -> bool {
        self.business_object.is_instance_of(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_task() -> Element {
        Element::shape(
            "Task_1",
            BusinessObject::new("bpmn:ScriptTask")
                .with_super_type("bpmn:Task")
                .with_property("scriptFormat", "python"),
            Bounds::new(100.0, 80.0, 100.0, 80.0),
        )
    }

    #[test]
    fn test_is_checks_type_and_super_types() {
        let element = script_task();

        assert!(element.is("bpmn:ScriptTask"));
        assert!(element.is("bpmn:Task"));
        assert!(!element.is("bpmn:UserTask"));
        assert_eq!(element.type_tag(), "bpmn:ScriptTask");
    }

    #[test]
    fn test_business_object_properties() {
        let element = script_task();

        assert_eq!(element.business_object().property("scriptFormat"), Some("python"));
        assert_eq!(element.business_object().property("resultVariable"), None);
    }

    #[test]
    fn test_geometry_accessors() {
        let shape = script_task();
        assert_eq!(shape.bounds().map(Bounds::center), Some(Point::new(150.0, 120.0)));
        assert!(shape.waypoints().is_empty());
        assert!(!shape.is_connection());

        let flow = Element::connection(
            "Flow_1",
            BusinessObject::new("bpmn:SequenceFlow"),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        );
        assert!(flow.is_connection());
        assert_eq!(flow.bounds(), None);
        assert_eq!(flow.waypoints().len(), 2);
    }
}
