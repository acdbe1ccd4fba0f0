//! Small scenes, a pinhole camera and vertex builders shared by the unit
//! tests of the bidirectional path tracer.

use super::vertex::*;
use std::sync::{Arc, RwLock};
use transport_core::camera::*;
use transport_core::geometry::*;
use transport_core::interaction::*;
use transport_core::light::*;
use transport_core::material::*;
use transport_core::medium::*;
use transport_core::pbrt::*;
use transport_core::primitive::*;
use transport_core::reflection::*;
use transport_core::sampling::*;
use transport_core::scene::*;
use transport_core::spectrum::*;

/// Area of the image plane at unit distance for a 90 degree field of view.
const FILM_AREA: Float = 4.0;

/// Intersections closer than this are ignored.
const MIN_DISTANCE: Float = 1e-5;

/// Slack on the quad parametrization that closes seams between walls.
const EDGE_TOLERANCE: Float = 1e-4;

/// Pinhole camera with a square film and a 90 degree field of view that
/// looks along -z with +y up in raster space.
pub struct PinholeCamera {
    position: Point3f,
    resolution: Float,
    medium: Option<ArcMedium>,
}

impl PinholeCamera {
    /// * `position`   - Location of the pinhole.
    /// * `resolution` - Width and height of the film in pixels.
    pub fn looking_down(position: Point3f, resolution: usize) -> Self {
        Self {
            position,
            resolution: resolution as Float,
            medium: None,
        }
    }

    /// Places the pinhole inside `medium`.
    pub fn in_medium(mut self, medium: ArcMedium) -> Self {
        self.medium = Some(medium);
        self
    }

    /// Returns the cosine with the viewing direction and raster position of
    /// a direction leaving the pinhole.
    fn project(&self, d: &Vector3f) -> Option<(Float, Point2f)> {
        let d = d.normalize();
        let cos_theta = -d.z;
        if cos_theta <= 0.0 {
            return None;
        }

        let x = d.x / cos_theta;
        let y = d.y / cos_theta;
        let p_raster = Point2f::new(0.5 * (x + 1.0) * self.resolution, 0.5 * (1.0 - y) * self.resolution);
        let on_film = |v: Float| (0.0..self.resolution).contains(&v);
        if on_film(p_raster.x) && on_film(p_raster.y) {
            Some((cos_theta, p_raster))
        } else {
            None
        }
    }
}

impl Camera for PinholeCamera {
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        let x = 2.0 * sample.p_film.x / self.resolution - 1.0;
        let y = 1.0 - 2.0 * sample.p_film.y / self.resolution;
        let d = Vector3f::new(x, y, -1.0).normalize();
        (Ray::new(self.position, d, INFINITY, sample.time, self.medium.clone()), 1.0)
    }

    fn we(&self, ray: &Ray) -> (Spectrum, Option<Point2f>) {
        match self.project(&ray.d) {
            Some((cos_theta, p_raster)) => (Spectrum::new(1.0 / (FILM_AREA * cos_theta.powi(4))), Some(p_raster)),
            None => (Spectrum::ZERO, None),
        }
    }

    fn pdf_we(&self, ray: &Ray) -> PDFResult {
        match self.project(&ray.d) {
            Some((cos_theta, _)) => PDFResult::new(1.0, 1.0 / (FILM_AREA * cos_theta.powi(3))),
            None => PDFResult::new(0.0, 0.0),
        }
    }

    fn sample_wi(&self, hit: &Hit, _u: &Point2f) -> Option<CameraWi> {
        let to_lens = self.position - hit.p;
        let dist = to_lens.length();
        if dist == 0.0 {
            return None;
        }
        let wi = to_lens / dist;
        let (cos_theta, p_raster) = self.project(&-wi)?;

        Some(CameraWi {
            value: Spectrum::new(1.0 / (FILM_AREA * cos_theta.powi(4))),
            wi,
            pdf: dist * dist / cos_theta,
            p_raster,
            p_lens: Hit::new_minimal(self.position, hit.time, None),
        })
    }
}

/// Parallelogram `p0 + u e1 + v e2` for `u, v` in `[0, 1]` facing `n`.
#[derive(Copy, Clone)]
struct Quad {
    p0: Point3f,
    e1: Vector3f,
    e2: Vector3f,
    n: Normal3f,
}

impl Quad {
    fn new(p0: Point3f, e1: Vector3f, e2: Vector3f, n: Normal3f) -> Self {
        Self { p0, e1, e2, n }
    }

    fn point(&self, u: Float, v: Float) -> Point3f {
        self.p0 + self.e1 * u + self.e2 * v
    }

    fn area(&self) -> Float {
        self.e1.cross(&self.e2).length()
    }

    fn bounds(&self) -> Bounds3f {
        Bounds3f::new(self.p0, self.point(1.0, 1.0))
            .union_point(&self.point(1.0, 0.0))
            .union_point(&self.point(0.0, 1.0))
    }

    /// Returns the ray parameter and surface coordinates of the hit point.
    fn hit(&self, ray: &Ray) -> Option<(Float, Float, Float)> {
        let denom = self.n.dot(&ray.d);
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = self.n.dot(&(self.p0 - ray.o)) / denom;
        if t <= MIN_DISTANCE || t >= ray.t_max {
            return None;
        }

        let rel = ray.at(t) - self.p0;
        let u = rel.dot(&self.e1) / self.e1.length_squared();
        let v = rel.dot(&self.e2) / self.e2.length_squared();
        let inside = |c: Float| (-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&c);
        if inside(u) && inside(v) {
            Some((t, u, v))
        } else {
            None
        }
    }
}

struct QuadPrimitive {
    quad: Quad,
    material: Option<ArcMaterial>,
    area_light: Option<usize>,
    medium_interface: Option<MediumInterface>,
}

impl Primitive for QuadPrimitive {
    fn world_bound(&self) -> Bounds3f {
        self.quad.bounds()
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction> {
        let (t, u, v) = self.quad.hit(r)?;
        r.t_max = t;

        let p = r.at(t);
        let p_error = Vector3f::from(p.abs()) * gamma(7);
        let mut si = SurfaceInteraction::new(p, p_error, Point2f::new(u, v), -r.d, self.quad.n, self.quad.e1, r.time);
        si.material = self.material.clone();
        si.area_light = self.area_light;
        if let Some(mi) = self.medium_interface.as_ref() {
            // Surfaces that do not separate two media keep the ray's medium.
            si.hit.medium_interface = Some(if mi.is_medium_transition() {
                mi.clone()
            } else {
                MediumInterface::from(r.medium.clone())
            });
        }
        Some(si)
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.quad.hit(r).is_some()
    }
}

struct PrimitiveList {
    primitives: Vec<ArcPrimitive>,
}

impl Primitive for PrimitiveList {
    fn world_bound(&self) -> Bounds3f {
        self.primitives
            .iter()
            .fold(Bounds3f::default(), |b, p| b.union(&p.world_bound()))
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction> {
        // Every hit shortens `t_max` so the last one is the nearest.
        let mut nearest = None;
        for p in self.primitives.iter() {
            if let Some(si) = p.intersect(r) {
                nearest = Some(si);
            }
        }
        nearest
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(r))
    }
}

struct MatteMaterial {
    kd: Spectrum,
}

impl Material for MatteMaterial {
    fn compute_scattering_functions(&self, si: &SurfaceInteraction, _mode: TransportMode) -> BSDF {
        let mut bsdf = BSDF::new(si, None);
        bsdf.add(BxDF::LambertianReflection(LambertianReflection::new(self.kd)));
        bsdf
    }
}

struct MirrorMaterial;

impl Material for MirrorMaterial {
    fn compute_scattering_functions(&self, si: &SurfaceInteraction, _mode: TransportMode) -> BSDF {
        let mut bsdf = BSDF::new(si, None);
        bsdf.add(mirror_bxdf());
        bsdf
    }
}

/// One sided diffuse emitter on a quad.
struct QuadLight {
    quad: Quad,
    le: Spectrum,
}

impl QuadLight {
    fn hit_at(&self, p: Point3f, time: Float) -> Hit {
        Hit::new(p, time, Vector3f::ZERO, Vector3f::ZERO, self.quad.n, None)
    }
}

impl Light for QuadLight {
    fn get_type(&self) -> LightType {
        LightType::AREA_LIGHT
    }

    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<Li> {
        let p = self.quad.point(u.x, u.y);
        let wi = p - hit.p;
        let dist2 = wi.length_squared();
        if dist2 == 0.0 {
            return None;
        }

        let wi = wi.normalize();
        let cos_theta = self.quad.n.abs_dot(&wi);
        if cos_theta == 0.0 {
            return None;
        }

        let p_light = self.hit_at(p, hit.time);
        let value = self.l(&p_light, &-wi);
        Some(Li::new(wi, dist2 / (cos_theta * self.quad.area()), p_light, value))
    }

    fn power(&self) -> Spectrum {
        self.le * (self.quad.area() * PI)
    }

    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if hit.n.dot(w) > 0.0 {
            self.le
        } else {
            Spectrum::ZERO
        }
    }

    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let ray = Ray::new(hit.p, *wi, INFINITY, hit.time, None);
        match self.quad.hit(&ray) {
            Some((t, _, _)) => {
                let cos_theta = self.quad.n.abs_dot(wi);
                if cos_theta == 0.0 {
                    0.0
                } else {
                    (t * t * wi.length_squared()) / (cos_theta * self.quad.area())
                }
            }
            None => 0.0,
        }
    }

    fn sample_le(&self, u1: &Point2f, u2: &Point2f, time: Float) -> Le {
        let n = Vector3f::from(self.quad.n);
        let (s, t) = coordinate_system(&n);
        let w = cosine_sample_hemisphere(u2);
        let pdf_dir = cosine_hemisphere_pdf(w.z);
        let w = s * w.x + t * w.y + n * w.z;

        let hit = self.hit_at(self.quad.point(u1.x, u1.y), time);
        let value = self.l(&hit, &w);
        Le::new(hit.spawn_ray(&w), self.quad.n, 1.0 / self.quad.area(), pdf_dir, value)
    }

    fn pdf_le(&self, ray: &Ray, n_light: &Normal3f) -> Pdf {
        Pdf::new(1.0 / self.quad.area(), cosine_hemisphere_pdf(n_light.dot(&ray.d).max(0.0)))
    }
}

struct PointLight {
    p: Point3f,
    intensity: Spectrum,
}

impl Light for PointLight {
    fn get_type(&self) -> LightType {
        LightType::DELTA_POSITION_LIGHT
    }

    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Option<Li> {
        let wi = self.p - hit.p;
        let dist2 = wi.length_squared();
        if dist2 == 0.0 {
            return None;
        }
        let p_light = Hit::new_minimal(self.p, hit.time, None);
        Some(Li::new(wi.normalize(), 1.0, p_light, self.intensity / dist2))
    }

    fn power(&self) -> Spectrum {
        self.intensity * FOUR_PI
    }

    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }

    fn sample_le(&self, u1: &Point2f, _u2: &Point2f, time: Float) -> Le {
        let d = uniform_sample_sphere(u1);
        let ray = Ray::new(self.p, d, INFINITY, time, None);
        Le::new(ray, Normal3f::from(d), 1.0, uniform_sphere_pdf(), self.intensity)
    }

    fn pdf_le(&self, _ray: &Ray, _n_light: &Normal3f) -> Pdf {
        Pdf::new(0.0, uniform_sphere_pdf())
    }
}

/// Constant radiance arriving from every direction.
struct UniformInfiniteLight {
    le: Spectrum,

    /// Bounding sphere of the scene set by `preprocess`.
    world: RwLock<(Point3f, Float)>,
}

impl UniformInfiniteLight {
    fn world(&self) -> (Point3f, Float) {
        self.world.read().map(|w| *w).unwrap_or((Point3f::ZERO, 0.0))
    }
}

impl Light for UniformInfiniteLight {
    fn preprocess(&self, scene: &Scene) {
        if let Ok(mut world) = self.world.write() {
            *world = scene.world_bound.bounding_sphere();
        }
    }

    fn get_type(&self) -> LightType {
        LightType::INFINITE_LIGHT
    }

    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Option<Li> {
        let (_, radius) = self.world();
        let wi = uniform_sample_sphere(u);
        let p_light = Hit::new_minimal(hit.p + wi * (2.0 * radius.max(1.0)), hit.time, None);
        Some(Li::new(wi, INV_FOUR_PI, p_light, self.le))
    }

    fn power(&self) -> Spectrum {
        let (_, radius) = self.world();
        self.le * (PI * radius * radius)
    }

    fn le(&self, _ray: &Ray) -> Spectrum {
        self.le
    }

    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        INV_FOUR_PI
    }

    fn sample_le(&self, u1: &Point2f, u2: &Point2f, time: Float) -> Le {
        let (center, radius) = self.world();
        let d = -uniform_sample_sphere(u1);
        let (v1, v2) = coordinate_system(&-d);
        let cd = concentric_sample_disk(u2);
        let p_disk = center + (v1 * cd.x + v2 * cd.y) * radius;
        let ray = Ray::new(p_disk + -d * radius, d, INFINITY, time, None);
        Le::new(ray, Normal3f::from(d), 1.0 / (PI * radius * radius), INV_FOUR_PI, self.le)
    }

    fn pdf_le(&self, _ray: &Ray, _n_light: &Normal3f) -> Pdf {
        let (_, radius) = self.world();
        Pdf::new(1.0 / (PI * radius * radius), INV_FOUR_PI)
    }
}

/// Builds small test scenes from quads and lights.
#[derive(Default)]
pub struct SceneBuilder {
    primitives: Vec<QuadPrimitive>,
    lights: Vec<ArcLight>,
    medium: Option<ArcMedium>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn quad(mut self, quad: Quad, material: ArcMaterial, area_light: Option<usize>) -> Self {
        self.primitives.push(QuadPrimitive {
            quad,
            material: Some(material),
            area_light,
            medium_interface: None,
        });
        self
    }

    /// Fills the space around every quad with `medium`.
    pub fn in_medium(mut self, medium: ArcMedium) -> Self {
        self.medium = Some(medium);
        self
    }

    /// Diffuse square `[-1, 1]^2` in the plane `z = 0` facing up.
    pub fn diffuse_floor(self, rho: Float) -> Self {
        let quad = floor_quad();
        self.quad(quad, Arc::new(MatteMaterial { kd: Spectrum::new(rho) }), None)
    }

    /// Perfect mirror in place of the diffuse floor.
    pub fn mirror_floor(self) -> Self {
        self.quad(floor_quad(), Arc::new(MirrorMaterial), None)
    }

    /// Black emitter `[-0.5, 0.5]^2` in the plane `z = 1` facing down.
    pub fn quad_light_above(mut self, le: Spectrum) -> Self {
        let quad = Quad::new(
            Point3f::new(-0.5, -0.5, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::new(0.0, 0.0, -1.0),
        );
        let index = self.lights.len();
        self.lights.push(Arc::new(QuadLight { quad, le }));
        self.quad(quad, Arc::new(MatteMaterial { kd: Spectrum::ZERO }), Some(index))
    }

    /// Diffuse occluder `[-0.8, 0.8]^2` in the plane `z = 0.5`.
    pub fn blocker(self, rho: Float) -> Self {
        let quad = Quad::new(
            Point3f::new(-0.8, -0.8, 0.5),
            Vector3f::new(1.6, 0.0, 0.0),
            Vector3f::new(0.0, 1.6, 0.0),
            Normal3f::new(0.0, 0.0, 1.0),
        );
        self.quad(quad, Arc::new(MatteMaterial { kd: Spectrum::new(rho) }), None)
    }

    pub fn point_light(mut self, p: Point3f, intensity: Spectrum) -> Self {
        self.lights.push(Arc::new(PointLight { p, intensity }));
        self
    }

    pub fn uniform_infinite_light(mut self, le: Spectrum) -> Self {
        self.lights.push(Arc::new(UniformInfiniteLight {
            le,
            world: RwLock::new((Point3f::ZERO, 0.0)),
        }));
        self
    }

    pub fn build(self) -> Scene {
        let medium_interface = self.medium.map(MediumInterface::from);
        let primitives = self
            .primitives
            .into_iter()
            .map(|mut quad| {
                quad.medium_interface = medium_interface.clone();
                Arc::new(quad) as ArcPrimitive
            })
            .collect();
        let aggregate: ArcPrimitive = Arc::new(PrimitiveList { primitives });
        Scene::new(aggregate, self.lights)
    }
}

fn floor_quad() -> Quad {
    Quad::new(
        Point3f::new(-1.0, -1.0, 0.0),
        Vector3f::new(2.0, 0.0, 0.0),
        Vector3f::new(0.0, 2.0, 0.0),
        Normal3f::new(0.0, 0.0, 1.0),
    )
}

/// Inward facing wall of the cube `[-1, 1]^3`. In order: floor, ceiling,
/// `x = -1`, `x = 1`, `y = -1` and `y = 1`.
fn furnace_wall(wall: usize) -> Quad {
    let ex = Vector3f::new(2.0, 0.0, 0.0);
    let ey = Vector3f::new(0.0, 2.0, 0.0);
    let ez = Vector3f::new(0.0, 0.0, 2.0);
    match wall {
        0 => Quad::new(Point3f::new(-1.0, -1.0, -1.0), ex, ey, Normal3f::new(0.0, 0.0, 1.0)),
        1 => Quad::new(Point3f::new(-1.0, -1.0, 1.0), ex, ey, Normal3f::new(0.0, 0.0, -1.0)),
        2 => Quad::new(Point3f::new(-1.0, -1.0, -1.0), ey, ez, Normal3f::new(1.0, 0.0, 0.0)),
        3 => Quad::new(Point3f::new(1.0, -1.0, -1.0), ey, ez, Normal3f::new(-1.0, 0.0, 0.0)),
        4 => Quad::new(Point3f::new(-1.0, -1.0, -1.0), ex, ez, Normal3f::new(0.0, 1.0, 0.0)),
        _ => Quad::new(Point3f::new(-1.0, 1.0, -1.0), ex, ez, Normal3f::new(0.0, -1.0, 0.0)),
    }
}

/// Closed cube whose six walls are diffuse with albedo `rho` and emit `le`.
/// Light `i` is wall `i`.
pub fn furnace_box(rho: Float, le: Float) -> Scene {
    furnace_walls(rho, le).build()
}

/// The furnace box filled with `medium`.
pub fn furnace_box_in_medium(rho: Float, le: Float, medium: ArcMedium) -> Scene {
    furnace_walls(rho, le).in_medium(medium).build()
}

fn furnace_walls(rho: Float, le: Float) -> SceneBuilder {
    let mut builder = SceneBuilder::new();
    for wall in 0..6 {
        let quad = furnace_wall(wall);
        builder.lights.push(Arc::new(QuadLight {
            quad,
            le: Spectrum::new(le),
        }));
        builder = builder.quad(quad, Arc::new(MatteMaterial { kd: Spectrum::new(rho) }), Some(wall));
    }
    builder
}

/// Camera in the center of the furnace box looking at the floor.
pub fn furnace_camera() -> PinholeCamera {
    PinholeCamera::looking_down(Point3f::ZERO, 8)
}

/// Returns a point on a furnace wall and the wall normal.
pub fn furnace_wall_point(wall: usize, u: Float, v: Float) -> (Point3f, Normal3f) {
    let quad = furnace_wall(wall);
    (quad.point(u, v), quad.n)
}

/// Equal selection probability for all lights of a scene.
pub fn uniform_distribution(scene: &Scene) -> Distribution1D {
    Distribution1D::new(vec![1.0; scene.lights.len()])
}

pub fn lambertian_bxdf(r: Float) -> BxDF {
    BxDF::LambertianReflection(LambertianReflection::new(Spectrum::new(r)))
}

pub fn mirror_bxdf() -> BxDF {
    BxDF::SpecularReflection(SpecularReflection::new(Spectrum::ONE, Fresnel::NoOp))
}

/// Surface vertex with unit throughput, a BSDF made of `bxdfs` and `wo`
/// along the normal.
pub fn surface_vertex_at(p: Point3f, n: Normal3f, bxdfs: Vec<BxDF>) -> Vertex<'static> {
    let (dpdu, _) = coordinate_system(&Vector3f::from(n));
    let mut si = SurfaceInteraction::new(p, Vector3f::ZERO, Point2f::ZERO, Vector3f::from(n), n, dpdu, 0.0);
    let mut bsdf = BSDF::new(&si, None);
    for bxdf in bxdfs {
        bsdf.add(bxdf);
    }
    si.bsdf = Some(Arc::new(bsdf));
    Vertex::new(VertexType::Surface, VertexInteraction::Surface(si), Spectrum::ONE)
}

/// Upward facing surface vertex at the origin.
pub fn surface_vertex_with(bxdfs: Vec<BxDF>) -> Vertex<'static> {
    surface_vertex_at(Point3f::ZERO, Normal3f::new(0.0, 0.0, 1.0), bxdfs)
}

/// Diffuse surface vertex lying on the area light `light_index`.
pub fn emitting_surface_vertex(p: Point3f, n: Normal3f, light_index: usize, rho: Float) -> Vertex<'static> {
    let mut v = surface_vertex_at(p, n, vec![lambertian_bxdf(rho)]);
    if let VertexInteraction::Surface(si) = &mut v.it {
        si.area_light = Some(light_index);
    }
    v
}

/// Medium vertex in vacuum with a Henyey-Greenstein phase function.
pub fn medium_vertex_at(p: Point3f, g: Float) -> Vertex<'static> {
    let mi = MediumInteraction::new(
        p,
        Vector3f::new(1.0, 0.0, 0.0),
        0.0,
        None,
        PhaseFunction::HenyeyGreenstein(HenyeyGreenstein::new(g)),
    );
    Vertex::new(VertexType::Medium, VertexInteraction::Medium(mi), Spectrum::ONE)
}

/// Isotropically scattering medium vertex inside `medium`.
pub fn medium_vertex_in(p: Point3f, medium: &ArcMedium) -> Vertex<'static> {
    let mi = MediumInteraction::new(
        p,
        Vector3f::new(1.0, 0.0, 0.0),
        0.0,
        Some(Arc::clone(medium)),
        PhaseFunction::HenyeyGreenstein(HenyeyGreenstein::new(0.0)),
    );
    Vertex::new(VertexType::Medium, VertexInteraction::Medium(mi), Spectrum::ONE)
}

/// Homogeneous medium with the given absorption and scattering
/// coefficients and an isotropic phase function.
pub fn homogeneous_medium(sigma_a: Float, sigma_s: Float) -> ArcMedium {
    Arc::new(HomogeneousMedium::new(Spectrum::new(sigma_a), Spectrum::new(sigma_s), 0.0))
}

/// Light endpoint on `light` at `p` with surface normal `n`.
pub fn light_vertex_on<'scene>(light: LightRef<'scene>, p: Point3f, n: Normal3f) -> Vertex<'scene> {
    let hit = Hit::new(p, 0.0, Vector3f::ZERO, Vector3f::ZERO, n, None);
    let ei = EndpointInteraction::light_from_hit(hit, Some(light));
    Vertex::create_light_from_endpoint(ei, Spectrum::ONE, 0.0)
}

/// Asserts that two subpaths hold bitwise identical vertices.
pub fn assert_same_vertices(a: &[Vertex], b: &[Vertex]) {
    assert_eq!(a.len(), b.len());
    for (i, (va, vb)) in a.iter().zip(b.iter()).enumerate() {
        assert_eq!(va.vertex_type, vb.vertex_type, "vertex {i}");
        assert_eq!(va.delta, vb.delta, "vertex {i}");
        assert_eq!(va.pdf_fwd.to_bits(), vb.pdf_fwd.to_bits(), "vertex {i}");
        assert_eq!(va.pdf_rev.to_bits(), vb.pdf_rev.to_bits(), "vertex {i}");
        for c in 0..3 {
            assert_eq!(va.beta[c].to_bits(), vb.beta[c].to_bits(), "vertex {i}");
            assert_eq!(va.p()[c].to_bits(), vb.p()[c].to_bits(), "vertex {i}");
        }
    }
}
