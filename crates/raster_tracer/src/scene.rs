//! Scene model: graphical objects and point lights.

use raster_math::EPSILON;

use crate::{Color, Intersectable, Phong, Point3, Ray, RayIntersection, Sphere};

/// A point light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3,
    /// Intensity per channel, on the 0-255 scale
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Point3, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

/// Every primitive a scene can hold.
///
/// A closed set keeps the per-ray loop free of allocation and dynamic
/// dispatch; new primitives add a variant and an [`Intersectable`] impl.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicalObject {
    Sphere(Sphere),
}

impl Intersectable for GraphicalObject {
    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<RayIntersection> {
        match self {
            GraphicalObject::Sphere(sphere) => sphere.intersect(ray),
        }
    }
}

impl From<Sphere> for GraphicalObject {
    fn from(sphere: Sphere) -> Self {
        GraphicalObject::Sphere(sphere)
    }
}

/// Immutable scene shared read-only by all render workers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    objects: Vec<GraphicalObject>,
    lights: Vec<PointLight>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn with_object(mut self, object: impl Into<GraphicalObject>) -> Self {
        self.objects.push(object.into());
        self
    }

    /// Add a light to the scene.
    pub fn with_light(mut self, light: PointLight) -> Self {
        self.lights.push(light);
        self
    }

    pub fn objects(&self) -> &[GraphicalObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Closest intersection of `ray` with any object.
    ///
    /// A later candidate only replaces the current best when it is closer by
    /// more than [`EPSILON`], so equidistant hits resolve to the first object.
    pub fn find_closest_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let mut closest: Option<RayIntersection> = None;

        for object in &self.objects {
            let Some(candidate) = object.intersect(ray) else {
                continue;
            };
            match closest {
                Some(best) if best.distance - EPSILON <= candidate.distance => {}
                _ => closest = Some(candidate),
            }
        }

        closest
    }

    /// Five spheres lit by two lights, viewed well from `(10, 0, 0)`.
    pub fn demo() -> Self {
        let matte = |r: f64, g: f64, b: f64| Phong::new(Color::new(r, g, b), Color::splat(0.5), 10.0);

        Scene::new()
            .with_light(PointLight::new(Point3::new(10.0, 5.0, 5.0), Color::new(100.0, 100.0, 100.0)))
            .with_light(PointLight::new(Point3::new(10.0, -5.0, -2.0), Color::new(60.0, 60.0, 80.0)))
            .with_object(Sphere::new(Point3::new(0.0, 0.0, 0.0), 2.0, matte(1.0, 1.0, 1.0)))
            .with_object(Sphere::new(Point3::new(0.0, 5.0, 0.0), 2.0, matte(1.0, 0.2, 0.2)))
            .with_object(Sphere::new(Point3::new(0.0, -5.0, 0.0), 2.0, matte(0.2, 1.0, 0.2)))
            .with_object(Sphere::new(Point3::new(0.0, 0.0, 5.0), 2.0, matte(0.2, 0.2, 1.0)))
            .with_object(Sphere::new(
                Point3::new(-3.0, 0.0, -5.0),
                2.5,
                Phong::new(Color::new(1.0, 1.0, 0.3), Color::splat(0.9), 50.0),
            ))
    }
}
