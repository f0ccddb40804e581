//! Renderable scene objects.
//!
//! An [`Essence`] is a closed set of shapes. The intersector dispatches on the
//! variant tag instead of going through a trait object, so the hot loop in
//! [`Scene::intersect`](crate::Scene::intersect) stays free of indirect calls.

use glam::Vec3;
use glint_math::{normalize, Ray};

use crate::{Material, RenderError, RenderResult};

/// Dot products below this magnitude count as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A sphere primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Nearest point where the ray enters (or, from inside, leaves) the
    /// sphere in front of its origin.
    ///
    /// Roots at exactly `t == 0` are not hits, so a ray starting on the
    /// surface does not report that surface point.
    pub fn check_collision(&self, ray: &Ray) -> Option<Vec3> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let near = (-b - sqrtd) / (2.0 * a);
        if near > 0.0 {
            return Some(ray.at(near));
        }
        let far = (-b + sqrtd) / (2.0 * a);
        if far > 0.0 {
            return Some(ray.at(far));
        }
        None
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }
}

/// A planar convex patch bounded by four ordered vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub vertices: [Vec3; 4],
    pub center: Vec3,
    /// Unit normal, following the winding of the vertices
    pub normal: Vec3,
    pub material: Material,
}

impl Quad {
    /// Create a quad from four vertices listed in order around its border.
    ///
    /// The normal follows the right-hand rule over the winding. Fails if the
    /// first three vertices are collinear.
    pub fn new(vertices: [Vec3; 4], material: Material) -> RenderResult<Self> {
        let [v0, v1, v2, v3] = vertices;
        let normal = (v1 - v0)
            .cross(v2 - v0)
            .try_normalize()
            .ok_or(RenderError::DegenerateQuad)?;
        let center = (v0 + v1 + v2 + v3) / 4.0;

        Ok(Self {
            vertices,
            center,
            normal,
            material,
        })
    }

    /// A square of side `2 * half_size` around `center`, spanned by the
    /// directions `u` and `v`. Its normal is `u x v`.
    pub fn square(
        center: Vec3,
        u: Vec3,
        v: Vec3,
        half_size: f32,
        material: Material,
    ) -> RenderResult<Self> {
        let u = normalize(u)? * half_size;
        let v = normalize(v)? * half_size;
        Self::new(
            [
                center - u - v,
                center + u - v,
                center + u + v,
                center - u + v,
            ],
            material,
        )
    }

    /// Ray-plane intersection filtered by the quad's border.
    pub fn check_collision(&self, ray: &Ray) -> Option<Vec3> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.center - ray.origin).dot(self.normal) / denom;
        if t <= 0.0 {
            return None;
        }

        let point = ray.at(t);
        self.contains(point).then_some(point)
    }

    /// Whether a point on the quad's plane lies inside its border.
    ///
    /// Every edge cross product must point the same way along the normal.
    /// Points on an edge count as inside.
    fn contains(&self, point: Vec3) -> bool {
        let mut positive = false;
        let mut negative = false;

        for i in 0..4 {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % 4];
            let side = (b - a).cross(point - a).dot(self.normal);
            if side > 0.0 {
                positive = true;
            } else if side < 0.0 {
                negative = true;
            }
            if positive && negative {
                return false;
            }
        }
        true
    }
}

/// A renderable scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum Essence {
    Sphere(Sphere),
    Quad(Quad),
}

impl Essence {
    /// Reference point of the shape: a sphere's center or a quad's centroid.
    pub fn position(&self) -> Vec3 {
        match self {
            Essence::Sphere(sphere) => sphere.center,
            Essence::Quad(quad) => quad.center,
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Essence::Sphere(sphere) => &sphere.material,
            Essence::Quad(quad) => &quad.material,
        }
    }

    #[inline]
    pub fn check_collision(&self, ray: &Ray) -> Option<Vec3> {
        match self {
            Essence::Sphere(sphere) => sphere.check_collision(ray),
            Essence::Quad(quad) => quad.check_collision(ray),
        }
    }

    /// Unit surface normal at a point on the shape.
    #[inline]
    pub fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Essence::Sphere(sphere) => sphere.normal(point),
            Essence::Quad(quad) => quad.normal,
        }
    }
}

impl From<Sphere> for Essence {
    fn from(sphere: Sphere) -> Self {
        Essence::Sphere(sphere)
    }
}

impl From<Quad> for Essence {
    fn from(quad: Quad) -> Self {
        Essence::Quad(quad)
    }
}
