//! Subpaths

use super::common::*;
use super::vertex::*;
use std::ops::{Deref, DerefMut};
use transport_core::camera::*;
use transport_core::geometry::*;
use transport_core::interaction::*;
use transport_core::light::*;
use transport_core::material::*;
use transport_core::pbrt::*;
use transport_core::reflection::*;
use transport_core::sampler::*;
use transport_core::sampling::*;
use transport_core::scene::*;
use transport_core::spectrum::*;

/// A bounded sequence of path vertices. Index 0 is the camera or light
/// endpoint. The storage is reused from one sample to the next.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the camera/light owned by the scene.
pub struct Subpath<'scene> {
    /// The vertices.
    vertices: Vec<Vertex<'scene>>,

    /// Maximum number of vertices.
    capacity: usize,
}

impl<'scene> Subpath<'scene> {
    /// Create an empty subpath.
    ///
    /// * `capacity` - Maximum number of vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the maximum number of vertices.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all vertices keeping the storage.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Appends a vertex.
    ///
    /// * `vertex` - The vertex.
    pub fn push(&mut self, vertex: Vertex<'scene>) {
        debug_assert!(self.vertices.len() < self.capacity);
        self.vertices.push(vertex);
    }
}

impl<'scene> Deref for Subpath<'scene> {
    type Target = [Vertex<'scene>];

    fn deref(&self) -> &Self::Target {
        &self.vertices
    }
}

impl<'scene> DerefMut for Subpath<'scene> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.vertices
    }
}

/// Generate the camera subpath. It returns the number of vertices in the
/// subpath.
///
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `max_depth`    - The maximum number of vertices.
/// * `camera`       - The camera.
/// * `p_film`       - The point on camera film.
/// * `rr_threshold` - Russian roulette threshold.
/// * `path`         - The subpath to fill.
pub fn generate_camera_subpath<'scene>(
    scene: &'scene Scene,
    sampler: &mut dyn Sampler,
    max_depth: usize,
    camera: &'scene dyn Camera,
    p_film: &Point2f,
    rr_threshold: Float,
    path: &mut Subpath<'scene>,
) -> usize {
    path.clear();
    if max_depth == 0 {
        return 0;
    }

    // Sample initial ray for camera subpath.
    let time = sampler.get_1d();
    let p_lens = sampler.get_2d();
    let (ray, ray_weight) = camera.generate_ray(&CameraSample::new(*p_film, p_lens, time));
    let beta = Spectrum::new(ray_weight);

    // Generate first vertex on camera subpath and start random walk.
    let PDFResult { pos: pdf_pos, dir: pdf_dir } = camera.pdf_we(&ray);
    let mut vertex = Vertex::create_camera_from_ray(camera, &ray, beta);
    vertex.pdf_fwd = pdf_pos;
    path.push(vertex);

    trace!("Starting camera subpath. Ray: {ray}, beta {beta}, pdf_pos {pdf_pos}, pdf_dir {pdf_dir}");
    let n_vertices = random_walk(
        scene,
        ray,
        sampler,
        beta,
        pdf_dir,
        max_depth - 1,
        rr_threshold,
        TransportMode::Radiance,
        path,
    );
    compute_reverse_densities(scene, path);

    n_vertices + 1
}

/// Generate the light subpath. It returns the number of vertices in the
/// subpath.
///
/// * `scene`        - The scene.
/// * `sampler`      - The sampler.
/// * `max_depth`    - The maximum number of vertices.
/// * `time`         - The time.
/// * `light_distr`  - Light selection probabilities.
/// * `rr_threshold` - Russian roulette threshold.
/// * `path`         - The subpath to fill.
pub fn generate_light_subpath<'scene>(
    scene: &'scene Scene,
    sampler: &mut dyn Sampler,
    max_depth: usize,
    time: Float,
    light_distr: &Distribution1D,
    rr_threshold: Float,
    path: &mut Subpath<'scene>,
) -> usize {
    path.clear();
    if max_depth == 0 {
        return 0;
    }

    // Sample initial ray for light subpath.
    let (light_num, light_pdf, _u_remapped) = light_distr.sample_discrete(sampler.get_1d());
    let light = scene.light(light_num);
    let u1 = sampler.get_2d();
    let u2 = sampler.get_2d();
    let Le {
        ray,
        n_light,
        pdf_pos,
        pdf_dir,
        value: le,
    } = light.light.sample_le(&u1, &u2, time);

    if pdf_pos == 0.0 || pdf_dir == 0.0 || le.is_black() {
        return 0;
    }

    // Generate first vertex on light subpath and start random walk.
    path.push(Vertex::create_light_from_ray_normal(
        light,
        &ray,
        n_light,
        le,
        pdf_pos * light_pdf,
    ));
    let beta = le * n_light.abs_dot(&ray.d) / (light_pdf * pdf_pos * pdf_dir);

    trace!("Starting light subpath. Ray: {ray}, le {le}, beta {beta}, pdf_pos {pdf_pos}, pdf_dir {pdf_dir}");
    let n_vertices = random_walk(
        scene,
        ray.clone(),
        sampler,
        beta,
        pdf_dir,
        max_depth - 1,
        rr_threshold,
        TransportMode::Importance,
        path,
    );

    // Correct subpath sampling densities for infinite area lights.
    if path[0].is_infinite_light() {
        // Set spatial density of `path[1]` for infinite area light.
        if n_vertices > 0 {
            let mut pdf_fwd = pdf_pos;
            if path[1].is_on_surface() {
                pdf_fwd *= ray.d.abs_dot(&path[1].ng());
            }
            path[1].pdf_fwd = pdf_fwd;
        }

        // Set spatial density of `path[0]` for infinite area light.
        path[0].pdf_fwd = infinite_light_density(scene, light_distr, &ray.d);
    }
    compute_reverse_densities(scene, path);

    n_vertices + 1
}

/// Extends a subpath whose endpoint is already in `path[0]`. It returns the
/// number of vertices appended.
///
/// * `scene`        - The scene.
/// * `ray`          - The ray leaving the endpoint.
/// * `sampler`      - The sampler.
/// * `beta`         - Path throughput weight.
/// * `pdf`          - Probability of sampling the ray per unit solid angle of `ray.d`.
/// * `max_depth`    - The maximum number of vertices to append.
/// * `rr_threshold` - Russian roulette threshold.
/// * `mode`         - The light transport mode.
/// * `path`         - The subpath.
#[allow(clippy::too_many_arguments)]
pub fn random_walk<'scene>(
    scene: &'scene Scene,
    mut ray: Ray,
    sampler: &mut dyn Sampler,
    mut beta: Spectrum,
    pdf: Float,
    max_depth: usize,
    rr_threshold: Float,
    mode: TransportMode,
    path: &mut Subpath<'scene>,
) -> usize {
    if max_depth == 0 {
        return 0;
    }

    let mut bounces = 0;
    let mut pdf_fwd = pdf;

    loop {
        // Trace a ray and sample the medium, if any.
        let isect = scene.intersect(&mut ray);
        let mi = match ray.medium.clone() {
            Some(medium) => {
                let (tr, mi) = medium.sample(&ray, sampler);
                beta *= tr;
                mi
            }
            None => None,
        };

        if beta.is_black() {
            break;
        }

        let prev = path.len() - 1;
        if let Some(mi) = mi {
            // Record medium interaction in `path` and compute forward density.
            let vertex = Vertex::create_medium(mi, beta, pdf_fwd, &path[prev]);
            path.push(vertex);
            bounces += 1;
            if bounces >= max_depth {
                break;
            }

            // Sample direction at the medium vertex.
            let VertexInteraction::Medium(mi) = &path[prev + 1].it else {
                unreachable!()
            };
            let (pdf, wi) = mi.phase.sample_p(&mi.hit.wo, &sampler.get_2d());
            pdf_fwd = pdf;
            ray = mi.hit.spawn_ray(&wi);
        } else {
            // Handle surface interaction for path generation.
            let Some(mut isect) = isect else {
                // Capture escaped rays when tracing from the camera.
                if mode == TransportMode::Radiance {
                    let ei = EndpointInteraction::light_from_ray(&ray, None);
                    path.push(Vertex::create_light_from_endpoint(ei, beta, pdf_fwd));
                    bounces += 1;
                }
                break;
            };

            // Compute scattering functions for `mode` and skip over medium
            // boundaries.
            isect.compute_scattering_functions(mode);
            let Some(bsdf) = isect.bsdf.clone() else {
                ray = isect.hit.spawn_ray(&ray.d);
                continue;
            };

            // Initialize `vertex` with surface intersection information.
            let vertex = Vertex::create_surface(isect, beta, pdf_fwd, &path[prev]);
            path.push(vertex);
            bounces += 1;
            if bounces >= max_depth {
                break;
            }

            // Sample BSDF at current vertex.
            let VertexInteraction::Surface(si) = &path[prev + 1].it else {
                unreachable!()
            };
            let wo = si.hit.wo;
            let BxDFSample { f, pdf, wi, bxdf_type } = bsdf.sample_f(&wo, &sampler.get_2d(), BxDFType::BSDF_ALL);
            trace!("Random walk sampled dir {wi} f: {f}, pdf: {pdf}");
            if f.is_black() || pdf == 0.0 {
                break;
            }

            let correction = correct_shading_normal(si, &wo, &wi, mode);
            beta *= f * wi.abs_dot(&si.shading.n) / pdf * correction;
            ray = si.hit.spawn_ray(&wi);

            pdf_fwd = pdf;
            if bxdf_type.contains(BxDFType::BSDF_SPECULAR) {
                path[prev + 1].delta = true;
                pdf_fwd = 0.0;
            }
        }

        // Terminate low throughput subpaths with Russian roulette.
        let max_beta = beta.max_component_value();
        if max_beta < rr_threshold {
            let q = clamp(max_beta, 0.0, 1.0);
            if sampler.get_1d() >= q {
                break;
            }
            beta /= q;
        }
    }

    bounces
}

/// Stores the density of sampling each vertex when walking the subpath in
/// reverse, starting from its last vertex.
///
/// * `scene` - The scene.
/// * `path`  - The subpath.
pub fn compute_reverse_densities(scene: &Scene, path: &mut [Vertex]) {
    for i in 1..path.len().saturating_sub(1) {
        let pdf_rev = if path[i].delta {
            0.0
        } else {
            path[i].pdf(scene, Some(&path[i + 1]), &path[i - 1])
        };
        path[i - 1].pdf_rev = pdf_rev;
    }
}

/// Per-worker storage for the two subpaths.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the camera/light owned by the scene.
pub struct SubpathBuffers<'scene> {
    /// The camera subpath.
    pub camera: Subpath<'scene>,

    /// The light subpath.
    pub light: Subpath<'scene>,
}

impl<'scene> SubpathBuffers<'scene> {
    /// Create buffers large enough for paths of the given maximum depth.
    ///
    /// * `max_depth` - Maximum path depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            camera: Subpath::with_capacity(max_depth + 2),
            light: Subpath::with_capacity(max_depth + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use float_cmp::*;
    use std::sync::Arc;
    use transport_core::sampler::RandomSampler;

    fn walk_box<'scene>(
        scene: &'scene Scene,
        camera: &'scene PinholeCamera,
        seed: u64,
        buffers: &mut SubpathBuffers<'scene>,
    ) -> (usize, usize) {
        let mut sampler = RandomSampler::new(1, seed);
        let n_camera = generate_camera_subpath(
            scene,
            &mut sampler,
            buffers.camera.capacity(),
            camera,
            &Point2f::new(4.5, 4.5),
            1.0,
            &mut buffers.camera,
        );
        let distr = uniform_distribution(scene);
        let n_light = generate_light_subpath(
            scene,
            &mut sampler,
            buffers.light.capacity(),
            0.0,
            &distr,
            1.0,
            &mut buffers.light,
        );
        (n_camera, n_light)
    }

    #[test]
    fn subpaths_are_bounded_and_rooted_at_endpoints() {
        let scene = furnace_box(0.5, 1.0);
        let camera = furnace_camera();
        let mut buffers = SubpathBuffers::new(4);
        for seed in 0..32 {
            let (n_camera, n_light) = walk_box(&scene, &camera, seed, &mut buffers);
            assert_eq!(n_camera, buffers.camera.len());
            assert_eq!(n_light, buffers.light.len());
            assert!(n_camera >= 2 && n_camera <= 6);
            assert!(n_light >= 1 && n_light <= 5);
            assert_eq!(buffers.camera[0].vertex_type, VertexType::Camera);
            assert_eq!(buffers.light[0].vertex_type, VertexType::Light);
            assert!(buffers.camera[1..].iter().all(|v| v.vertex_type == VertexType::Surface));
        }
    }

    #[test]
    fn identical_samples_reproduce_identical_subpaths() {
        let scene = furnace_box(0.5, 1.0);
        let camera = furnace_camera();
        let mut a = SubpathBuffers::new(5);
        let mut b = SubpathBuffers::new(5);
        for seed in [3, 17, 99] {
            walk_box(&scene, &camera, seed, &mut a);
            walk_box(&scene, &camera, seed, &mut b);
            assert_same_vertices(&a.camera, &b.camera);
            assert_same_vertices(&a.light, &b.light);
        }
    }

    #[test]
    fn reverse_densities_match_scattering_densities() {
        let scene = furnace_box(0.5, 1.0);
        let camera = furnace_camera();
        let mut buffers = SubpathBuffers::new(5);
        walk_box(&scene, &camera, 7, &mut buffers);

        let path = &buffers.camera;
        for i in 1..path.len() - 1 {
            let expected = path[i].pdf(&scene, Some(&path[i + 1]), &path[i - 1]);
            assert_eq!(path[i - 1].pdf_rev.to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn forward_density_of_diffuse_bounce_is_cosine_weighted() {
        let scene = furnace_box(0.5, 1.0);
        let camera = furnace_camera();
        let mut buffers = SubpathBuffers::new(5);
        walk_box(&scene, &camera, 11, &mut buffers);

        let path = &buffers.camera;
        if path.len() > 2 {
            let (prev, v, next) = (&path[0], &path[1], &path[2]);
            let wi = (next.p() - v.p()).normalize();
            let pdf = v.ns().abs_dot(&wi) * INV_PI;
            let expected = v.convert_density(pdf, next);
            assert!((next.pdf_fwd - expected).abs() <= 0.001 * expected.abs());
            assert!(prev.pdf_fwd > 0.0);
        }
    }

    #[test]
    fn walk_through_medium_converts_phase_density_without_cosine() {
        let medium = homogeneous_medium(0.0, 2.0);
        let scene = furnace_box_in_medium(0.5, 1.0, Arc::clone(&medium));
        let camera = furnace_camera().in_medium(medium);
        let mut buffers = SubpathBuffers::new(5);
        let mut medium_vertices = 0;
        let mut checked = 0;

        for seed in 0..16 {
            let mut sampler = RandomSampler::new(1, seed);
            generate_camera_subpath(
                &scene,
                &mut sampler,
                buffers.camera.capacity(),
                &camera,
                &Point2f::new(4.5, 4.5),
                0.0,
                &mut buffers.camera,
            );

            let path = &buffers.camera;
            medium_vertices += path.iter().filter(|v| v.vertex_type == VertexType::Medium).count();
            for i in 2..path.len() {
                if path[i - 1].vertex_type != VertexType::Medium {
                    continue;
                }

                // Isotropic phase function density over the squared distance,
                // with a cosine only at a surface on the receiving end.
                let w = path[i].p() - path[i - 1].p();
                let d2 = w.length_squared();
                let cos = if path[i].is_on_surface() {
                    w.normalize().abs_dot(&path[i].ng())
                } else {
                    1.0
                };
                let expected = INV_FOUR_PI * cos / d2;
                assert!(
                    (path[i].pdf_fwd - expected).abs() <= 0.001 * expected,
                    "seed {seed}, vertex {i}: {} != {expected}",
                    path[i].pdf_fwd
                );
                checked += 1;
            }
        }
        assert!(medium_vertices > 0);
        assert!(checked > 0);
    }

    #[test]
    fn mirror_bounce_marks_delta_vertex() {
        let scene = SceneBuilder::new()
            .mirror_floor()
            .quad_light_above(Spectrum::ONE)
            .build();
        let camera = PinholeCamera::looking_down(Point3f::new(0.0, 0.0, 0.5), 8);
        let mut buffers = SubpathBuffers::new(3);
        let mut sampler = RandomSampler::new(1, 5);
        let n = generate_camera_subpath(
            &scene,
            &mut sampler,
            buffers.camera.capacity(),
            &camera,
            &Point2f::new(4.5, 4.5),
            0.0,
            &mut buffers.camera,
        );
        assert!(n >= 2);
        let floor = &buffers.camera[1];
        assert_eq!(floor.vertex_type, VertexType::Surface);
        if n > 2 {
            assert!(floor.delta);
            assert_eq!(buffers.camera[2].pdf_fwd, 0.0);
            assert_eq!(buffers.camera[0].pdf_rev, 0.0);
        }
    }

    #[test]
    fn escaped_camera_ray_ends_in_light_vertex() {
        let scene = SceneBuilder::new().uniform_infinite_light(Spectrum::ONE).build();
        let camera = PinholeCamera::looking_down(Point3f::new(0.0, 0.0, 2.0), 8);
        let mut buffers = SubpathBuffers::new(3);
        let mut sampler = RandomSampler::new(1, 1);
        let n = generate_camera_subpath(
            &scene,
            &mut sampler,
            buffers.camera.capacity(),
            &camera,
            &Point2f::new(4.5, 4.5),
            0.0,
            &mut buffers.camera,
        );
        assert_eq!(n, 2);
        assert_eq!(buffers.camera[1].vertex_type, VertexType::Light);
        assert!(buffers.camera[1].is_infinite_light());
    }

    #[test]
    fn light_subpath_with_zero_depth_is_empty() {
        let scene = furnace_box(0.5, 1.0);
        let distr = uniform_distribution(&scene);
        let mut path = Subpath::with_capacity(2);
        let mut sampler = RandomSampler::new(1, 1);
        assert_eq!(generate_light_subpath(&scene, &mut sampler, 0, 0.0, &distr, 1.0, &mut path), 0);
        assert!(path.is_empty());
    }

    #[test]
    fn infinite_light_subpath_uses_disk_density() {
        let scene = SceneBuilder::new()
            .diffuse_floor(0.5)
            .uniform_infinite_light(Spectrum::ONE)
            .build();
        let distr = uniform_distribution(&scene);
        let (_, radius) = scene.world_bound.bounding_sphere();
        let mut path = Subpath::with_capacity(3);
        for seed in 0..64 {
            let mut sampler = RandomSampler::new(1, seed);
            let n = generate_light_subpath(&scene, &mut sampler, 3, 0.0, &distr, 0.0, &mut path);
            if n < 2 {
                continue;
            }
            let pdf_pos = 1.0 / (PI * radius * radius);
            assert!(path[1].pdf_fwd <= pdf_pos * 1.0001);
            assert!(approx_eq!(f32, path[0].pdf_fwd, INV_FOUR_PI, epsilon = 0.00001));
        }
    }
}
