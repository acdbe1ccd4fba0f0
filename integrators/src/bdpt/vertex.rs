//! Path Vertex

use super::common::*;
use std::fmt;
use transport_core::camera::*;
use transport_core::geometry::*;
use transport_core::interaction::*;
use transport_core::light::*;
use transport_core::material::*;
use transport_core::pbrt::*;
use transport_core::reflection::*;
use transport_core::sampling::*;
use transport_core::scene::*;
use transport_core::spectrum::*;

/// Type of vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VertexType {
    /// A path endpoint on the camera lens.
    Camera,

    /// A path endpoint on a light source, or a camera ray that escaped.
    Light,

    /// A scattering event on a surface.
    Surface,

    /// A scattering event inside a participating medium.
    Medium,
}

impl fmt::Display for VertexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "Camera"),
            Self::Light => write!(f, "Light"),
            Self::Surface => write!(f, "Surface"),
            Self::Medium => write!(f, "Medium"),
        }
    }
}

/// The geometric payload of a vertex.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the camera/light owned by the scene.
#[derive(Clone)]
pub enum VertexInteraction<'scene> {
    /// Camera or light endpoint.
    Endpoint(EndpointInteraction<'scene>),

    /// Scattering in a participating medium.
    Medium(MediumInteraction),

    /// Scattering on a surface.
    Surface(SurfaceInteraction),
}

impl<'scene> VertexInteraction<'scene> {
    /// Returns the common interaction data.
    pub fn hit(&self) -> &Hit {
        match self {
            Self::Endpoint(ei) => ei.hit(),
            Self::Medium(mi) => &mi.hit,
            Self::Surface(si) => &si.hit,
        }
    }
}

/// A vertex of a camera or light subpath.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the camera/light owned by the scene.
#[derive(Clone)]
pub struct Vertex<'scene> {
    /// Type of vertex.
    pub vertex_type: VertexType,

    /// Throughput of the subpath up to and including this vertex.
    pub beta: Spectrum,

    /// The interaction.
    pub it: VertexInteraction<'scene>,

    /// True if the vertex was sampled from a Dirac delta distribution.
    pub delta: bool,

    /// Area density of sampling this vertex walking forward along the subpath.
    pub pdf_fwd: Float,

    /// Area density of sampling this vertex walking backward along the subpath.
    pub pdf_rev: Float,
}

impl<'scene> Vertex<'scene> {
    /// Create a new vertex with zero densities.
    ///
    /// * `vertex_type` - Type of vertex.
    /// * `it`          - The interaction.
    /// * `beta`        - Throughput.
    pub fn new(vertex_type: VertexType, it: VertexInteraction<'scene>, beta: Spectrum) -> Self {
        Self {
            vertex_type,
            beta,
            it,
            delta: false,
            pdf_fwd: 0.0,
            pdf_rev: 0.0,
        }
    }

    /// Create a camera vertex at the origin of a camera ray.
    ///
    /// * `camera` - The camera.
    /// * `ray`    - The camera ray.
    /// * `beta`   - Throughput.
    pub fn create_camera_from_ray(camera: &'scene dyn Camera, ray: &Ray, beta: Spectrum) -> Self {
        let ei = EndpointInteraction::camera_from_ray(ray, camera);
        Self::new(VertexType::Camera, VertexInteraction::Endpoint(ei), beta)
    }

    /// Create a camera vertex at a point on the lens.
    ///
    /// * `camera` - The camera.
    /// * `hit`    - The point on the lens.
    /// * `beta`   - Throughput.
    pub fn create_camera_from_hit(camera: &'scene dyn Camera, hit: Hit, beta: Spectrum) -> Self {
        let ei = EndpointInteraction::camera_from_hit(hit, camera);
        Self::new(VertexType::Camera, VertexInteraction::Endpoint(ei), beta)
    }

    /// Create a light vertex at the origin of a ray leaving a light.
    ///
    /// * `light`   - The light.
    /// * `ray`     - The ray leaving the light.
    /// * `n_light` - Surface normal at the ray origin.
    /// * `le`      - Emitted radiance.
    /// * `pdf`     - Density of sampling the ray origin.
    pub fn create_light_from_ray_normal(
        light: LightRef<'scene>,
        ray: &Ray,
        n_light: Normal3f,
        le: Spectrum,
        pdf: Float,
    ) -> Self {
        let ei = EndpointInteraction::light_from_ray_and_normal(ray, n_light, Some(light));
        let mut v = Self::new(VertexType::Light, VertexInteraction::Endpoint(ei), le);
        v.pdf_fwd = pdf;
        v
    }

    /// Create a light vertex from an endpoint interaction.
    ///
    /// * `ei`   - The endpoint interaction.
    /// * `beta` - Throughput.
    /// * `pdf`  - Forward density.
    pub fn create_light_from_endpoint(ei: EndpointInteraction<'scene>, beta: Spectrum, pdf: Float) -> Self {
        let mut v = Self::new(VertexType::Light, VertexInteraction::Endpoint(ei), beta);
        v.pdf_fwd = pdf;
        v
    }

    /// Create a surface vertex. The solid angle density `pdf` of sampling
    /// the direction at `prev` is converted to area density.
    ///
    /// * `si`   - The surface interaction.
    /// * `beta` - Throughput.
    /// * `pdf`  - Solid angle density at `prev`.
    /// * `prev` - The preceding vertex.
    pub fn create_surface(si: SurfaceInteraction, beta: Spectrum, pdf: Float, prev: &Vertex<'scene>) -> Self {
        let mut v = Self::new(VertexType::Surface, VertexInteraction::Surface(si), beta);
        v.pdf_fwd = prev.convert_density(pdf, &v);
        v
    }

    /// Create a medium vertex. The solid angle density `pdf` of sampling the
    /// direction at `prev` is converted to area density.
    ///
    /// * `mi`   - The medium interaction.
    /// * `beta` - Throughput.
    /// * `pdf`  - Solid angle density at `prev`.
    /// * `prev` - The preceding vertex.
    pub fn create_medium(mi: MediumInteraction, beta: Spectrum, pdf: Float, prev: &Vertex<'scene>) -> Self {
        let mut v = Self::new(VertexType::Medium, VertexInteraction::Medium(mi), beta);
        v.pdf_fwd = prev.convert_density(pdf, &v);
        v
    }

    /// Returns the common interaction data.
    pub fn hit(&self) -> &Hit {
        self.it.hit()
    }

    /// Returns the position.
    pub fn p(&self) -> Point3f {
        self.it.hit().p
    }

    /// Returns the time.
    pub fn time(&self) -> Float {
        self.it.hit().time
    }

    /// Returns the geometric normal. It is zero for points away from surfaces.
    pub fn ng(&self) -> Normal3f {
        self.it.hit().n
    }

    /// Returns the shading normal.
    pub fn ns(&self) -> Normal3f {
        match &self.it {
            VertexInteraction::Surface(si) => si.shading.n,
            _ => self.ng(),
        }
    }

    /// Returns true if the vertex lies on a surface.
    pub fn is_on_surface(&self) -> bool {
        !self.ng().is_zero()
    }

    /// Returns the BSDF of a surface vertex.
    pub fn bsdf(&self) -> Option<&BSDF> {
        match &self.it {
            VertexInteraction::Surface(si) => si.bsdf.as_deref(),
            _ => None,
        }
    }

    /// Returns the value of the scattering function at this vertex for light
    /// leaving towards `next`. Only surface and medium vertices scatter.
    ///
    /// * `next` - The next vertex.
    /// * `mode` - Light transport mode.
    pub fn f(&self, next: &Vertex, mode: TransportMode) -> Spectrum {
        let wi = next.p() - self.p();
        if wi.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        let wi = wi.normalize();

        match &self.it {
            VertexInteraction::Surface(si) => si.bsdf.as_ref().map_or(Spectrum::ZERO, |bsdf| {
                bsdf.f(&si.hit.wo, &wi, BxDFType::BSDF_ALL) * correct_shading_normal(si, &si.hit.wo, &wi, mode)
            }),
            VertexInteraction::Medium(mi) => Spectrum::new(mi.phase.p(&mi.hit.wo, &wi)),
            VertexInteraction::Endpoint(_) => unreachable!("Vertex::f() called on {} vertex", self.vertex_type),
        }
    }

    /// Returns true if a deterministic connection can be made to this vertex.
    pub fn is_connectible(&self) -> bool {
        match &self.it {
            VertexInteraction::Medium(_) => true,
            VertexInteraction::Endpoint(EndpointInteraction::Camera { .. }) => true,
            VertexInteraction::Endpoint(EndpointInteraction::Light { light, .. }) => {
                light.map_or(true, |l| !l.light.get_type().matches(LightType::DELTA_DIRECTION_LIGHT))
            }
            VertexInteraction::Surface(_) => self
                .bsdf()
                .map_or(false, |bsdf| bsdf.num_components(BxDFType::non_specular()) > 0),
        }
    }

    /// Returns the light source this vertex lies on, if any.
    ///
    /// * `scene` - The scene.
    pub fn light<'a>(&'a self, scene: &'a Scene) -> Option<LightRef<'a>> {
        match &self.it {
            VertexInteraction::Endpoint(EndpointInteraction::Light { light, .. }) => *light,
            VertexInteraction::Surface(si) => si.area_light.map(|index| scene.light(index)),
            _ => None,
        }
    }

    /// Returns true if the vertex is a light endpoint or lies on an emitting
    /// surface.
    pub fn is_light(&self) -> bool {
        match &self.it {
            VertexInteraction::Endpoint(EndpointInteraction::Light { .. }) => true,
            VertexInteraction::Surface(si) => si.area_light.is_some(),
            _ => false,
        }
    }

    /// Returns true if the vertex is an endpoint on a delta light.
    pub fn is_delta_light(&self) -> bool {
        match &self.it {
            VertexInteraction::Endpoint(EndpointInteraction::Light { light: Some(l), .. }) => l.light.is_delta_light(),
            _ => false,
        }
    }

    /// Returns true if the vertex is an endpoint on an infinite or directional
    /// light. Escaped camera rays count as infinite lights.
    pub fn is_infinite_light(&self) -> bool {
        match &self.it {
            VertexInteraction::Endpoint(EndpointInteraction::Light { light, .. }) => light.map_or(true, |l| {
                let light_type = l.light.get_type();
                light_type.matches(LightType::INFINITE_LIGHT) || light_type.matches(LightType::DELTA_DIRECTION_LIGHT)
            }),
            _ => false,
        }
    }

    /// Returns the radiance emitted from this vertex towards `v`.
    ///
    /// * `scene` - The scene.
    /// * `v`     - The vertex receiving the light.
    pub fn le(&self, scene: &Scene, v: &Vertex) -> Spectrum {
        if !self.is_light() {
            return Spectrum::ZERO;
        }

        let w = v.p() - self.p();
        if w.length_squared() == 0.0 {
            return Spectrum::ZERO;
        }
        let w = w.normalize();

        if self.is_infinite_light() {
            // Return emitted radiance for infinite light sources.
            let ray = Ray::new(self.p(), -w, INFINITY, self.time(), None);
            scene
                .infinite_lights()
                .fold(Spectrum::ZERO, |le, light| le + light.light.le(&ray))
        } else {
            match &self.it {
                VertexInteraction::Surface(si) => si
                    .area_light
                    .map_or(Spectrum::ZERO, |index| scene.lights[index].l(&si.hit, &w)),
                _ => Spectrum::ZERO,
            }
        }
    }

    /// Converts a solid angle density of sampling `next` from this vertex to
    /// an area density at `next`. Densities towards infinite lights stay in
    /// solid angle measure.
    ///
    /// * `pdf`  - The solid angle density.
    /// * `next` - The next vertex.
    pub fn convert_density(&self, pdf: Float, next: &Vertex) -> Float {
        if next.is_infinite_light() {
            return pdf;
        }

        let w = next.p() - self.p();
        let dist_sq = w.length_squared();
        if dist_sq == 0.0 {
            return 0.0;
        }

        let inv_dist_sq = 1.0 / dist_sq;
        let mut pdf = pdf;
        if next.is_on_surface() {
            pdf *= next.ng().abs_dot(&(w * inv_dist_sq.sqrt()));
        }
        pdf * inv_dist_sq
    }

    /// Returns the area density at `next` of this vertex scattering light
    /// arriving from `prev` towards `next`. Camera vertices have no `prev`.
    ///
    /// * `scene` - The scene.
    /// * `prev`  - The preceding vertex.
    /// * `next`  - The next vertex.
    pub fn pdf(&self, scene: &Scene, prev: Option<&Vertex>, next: &Vertex) -> Float {
        if self.vertex_type == VertexType::Light {
            return self.pdf_light(scene, next);
        }

        // Compute directions to preceding and next vertex.
        let wn = next.p() - self.p();
        if wn.length_squared() == 0.0 {
            return 0.0;
        }
        let wn = wn.normalize();

        let wp = match prev {
            Some(prev) => {
                let wp = prev.p() - self.p();
                if wp.length_squared() == 0.0 {
                    return 0.0;
                }
                wp.normalize()
            }
            None => {
                assert!(self.vertex_type == VertexType::Camera);
                Vector3f::ZERO
            }
        };

        // Compute directional density depending on the vertex type.
        let pdf = match &self.it {
            VertexInteraction::Endpoint(EndpointInteraction::Camera { hit, camera }) => {
                camera.pdf_we(&hit.spawn_ray(&wn)).dir
            }
            VertexInteraction::Surface(si) => si
                .bsdf
                .as_ref()
                .map_or(0.0, |bsdf| bsdf.pdf(&wp, &wn, BxDFType::BSDF_ALL)),
            VertexInteraction::Medium(mi) => mi.phase.p(&wp, &wn),
            VertexInteraction::Endpoint(EndpointInteraction::Light { .. }) => {
                unreachable!("Vertex::pdf() dispatched a light endpoint")
            }
        };

        // Return probability per unit area at vertex `next`.
        self.convert_density(pdf, next)
    }

    /// Returns the area density at `v` of a light leaving this vertex
    /// towards `v`.
    ///
    /// * `scene` - The scene.
    /// * `v`     - The vertex receiving the light.
    pub fn pdf_light(&self, scene: &Scene, v: &Vertex) -> Float {
        let w = v.p() - self.p();
        let dist_sq = w.length_squared();
        if dist_sq == 0.0 {
            return 0.0;
        }
        let inv_dist_sq = 1.0 / dist_sq;
        let w = w * inv_dist_sq.sqrt();

        let mut pdf = if self.is_infinite_light() {
            // Compute planar sampling density for infinite light sources.
            let (_world_center, world_radius) = scene.world_bound.bounding_sphere();
            1.0 / (PI * world_radius * world_radius)
        } else {
            // Compute sampling density for non-infinite light sources.
            match self.light(scene) {
                Some(light) => {
                    let ray = Ray::new(self.p(), w, INFINITY, self.time(), None);
                    let Pdf { pdf_dir, .. } = light.light.pdf_le(&ray, &self.ng());
                    pdf_dir * inv_dist_sq
                }
                None => return 0.0,
            }
        };

        if v.is_on_surface() {
            pdf *= v.ng().abs_dot(&w);
        }
        pdf
    }

    /// Returns the density of sampling this vertex as the origin of a light
    /// subpath that continues towards `v`, including the probability of
    /// selecting the light.
    ///
    /// * `scene`       - The scene.
    /// * `v`           - The next vertex.
    /// * `light_distr` - Light selection probabilities.
    pub fn pdf_light_origin(&self, scene: &Scene, v: &Vertex, light_distr: &Distribution1D) -> Float {
        let w = v.p() - self.p();
        if w.length_squared() == 0.0 {
            return 0.0;
        }
        let w = w.normalize();

        if self.is_infinite_light() {
            // Return solid angle density for infinite light sources.
            infinite_light_density(scene, light_distr, &w)
        } else {
            // Return solid angle density for non-infinite light sources.
            match self.light(scene) {
                Some(light) => {
                    let pdf_choice = light_distr.discrete_pdf(light.index);
                    let ray = Ray::new(self.p(), w, INFINITY, self.time(), None);
                    let Pdf { pdf_pos, .. } = light.light.pdf_le(&ray, &self.ng());
                    pdf_pos * pdf_choice
                }
                None => 0.0,
            }
        }
    }
}

impl<'scene> fmt::Display for Vertex<'scene> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[type: {}, p: {}, beta: {}, pdf_fwd: {}, pdf_rev: {}, delta: {}]",
            self.vertex_type,
            self.p(),
            self.beta,
            self.pdf_fwd,
            self.pdf_rev,
            self.delta,
        )
    }
}
