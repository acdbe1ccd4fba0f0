//! Multiple Importance Sampling

use super::scoped_assignment::*;
use super::vertex::*;
use transport_core::pbrt::*;
use transport_core::sampling::*;
use transport_core::scene::*;

/// Maps a zero density to 1. Delta vertices have a continuous density of 0
/// and are excluded from the sum before the ratio matters.
///
/// * `f` - The density.
pub fn remap0(f: Float) -> Float {
    if f != 0.0 {
        f
    } else {
        1.0
    }
}

/// Returns the balance heuristic weight of the `(s, t)` strategy. The ratios
/// of the densities of every other strategy that could have produced the same
/// path are accumulated along both subpaths. All temporary changes to the
/// subpaths are undone before returning.
///
/// * `scene`           - The scene.
/// * `light_vertices`  - The light subpath.
/// * `camera_vertices` - The camera subpath.
/// * `sampled`         - Vertex sampled by the connection for `s=1` or `t=1`.
/// * `s`               - Number of light subpath vertices used.
/// * `t`               - Number of camera subpath vertices used.
/// * `light_distr`     - Light selection probabilities.
pub fn mis_weight<'scene>(
    scene: &Scene,
    light_vertices: &mut [Vertex<'scene>],
    camera_vertices: &mut [Vertex<'scene>],
    sampled: Option<&Vertex<'scene>>,
    s: usize,
    t: usize,
    light_distr: &Distribution1D,
) -> Float {
    if s + t == 2 {
        return 1.0;
    }

    let mut guard = ScopedAssignment::new(light_vertices, camera_vertices);

    // Update sampled vertex for `s=1` or `t=1` strategy.
    if let Some(sampled) = sampled {
        if s == 1 {
            guard.assign_vertex(PathEnd::Light, 0, sampled.clone());
        } else if t == 1 {
            guard.assign_vertex(PathEnd::Camera, 0, sampled.clone());
        }
    }

    // Mark connection vertices as non-degenerate.
    if t > 0 {
        guard.assign_delta(PathEnd::Camera, t - 1, false);
    }
    if s > 0 {
        guard.assign_delta(PathEnd::Light, s - 1, false);
    }

    // Update reverse density of vertex `pt_{t-1}`.
    if t > 0 {
        let pdf_rev = if s > 0 {
            let qs = guard.vertex(PathEnd::Light, s - 1);
            let qs_minus = (s > 1).then(|| guard.vertex(PathEnd::Light, s - 2));
            qs.pdf(scene, qs_minus, guard.vertex(PathEnd::Camera, t - 1))
        } else {
            assert!(t > 1);
            let pt = guard.vertex(PathEnd::Camera, t - 1);
            pt.pdf_light_origin(scene, guard.vertex(PathEnd::Camera, t - 2), light_distr)
        };
        guard.assign_pdf_rev(PathEnd::Camera, t - 1, pdf_rev);
    }

    // Update reverse density of vertex `pt_{t-2}`.
    if t > 1 {
        let pt = guard.vertex(PathEnd::Camera, t - 1);
        let pt_minus = guard.vertex(PathEnd::Camera, t - 2);
        let pdf_rev = if s > 0 {
            pt.pdf(scene, Some(guard.vertex(PathEnd::Light, s - 1)), pt_minus)
        } else {
            pt.pdf_light(scene, pt_minus)
        };
        guard.assign_pdf_rev(PathEnd::Camera, t - 2, pdf_rev);
    }

    // Update reverse density of vertices `qs_{s-1}` and `qs_{s-2}`.
    if s > 0 {
        let pt = (t > 0).then(|| guard.vertex(PathEnd::Camera, t - 1));
        let pt_minus = (t > 1).then(|| guard.vertex(PathEnd::Camera, t - 2));
        let pdf_rev = match pt {
            Some(pt) => pt.pdf(scene, pt_minus, guard.vertex(PathEnd::Light, s - 1)),
            None => 0.0,
        };
        guard.assign_pdf_rev(PathEnd::Light, s - 1, pdf_rev);
    }
    if s > 1 {
        let qs = guard.vertex(PathEnd::Light, s - 1);
        let pt = (t > 0).then(|| guard.vertex(PathEnd::Camera, t - 1));
        let pdf_rev = qs.pdf(scene, pt, guard.vertex(PathEnd::Light, s - 2));
        guard.assign_pdf_rev(PathEnd::Light, s - 2, pdf_rev);
    }

    let mut sum_ri = 0.0;

    // Consider hypothetical connection strategies along the camera subpath.
    let camera = guard.camera();
    let mut ri = 1.0;
    for i in (1..t).rev() {
        ri *= remap0(camera[i].pdf_rev) / remap0(camera[i].pdf_fwd);
        if !camera[i].delta && !camera[i - 1].delta {
            sum_ri += ri;
        }
    }

    // Consider hypothetical connection strategies along the light subpath.
    let light = guard.light();
    let mut ri = 1.0;
    for i in (0..s).rev() {
        ri *= remap0(light[i].pdf_rev) / remap0(light[i].pdf_fwd);
        let delta_light_vertex = if i > 0 {
            light[i - 1].delta
        } else {
            light[0].is_delta_light()
        };
        if !light[i].delta && !delta_light_vertex {
            sum_ri += ri;
        }
    }

    1.0 / (1.0 + sum_ri)
}

#[cfg(test)]
mod tests {
    use super::super::connect::*;
    use super::super::fixtures::*;
    use super::super::subpath::*;
    use super::*;
    use float_cmp::*;
    use transport_core::geometry::*;
    use transport_core::light::*;
    use transport_core::sampler::*;
    use transport_core::spectrum::*;

    /// A full path `y_0 .. y_{k-1}` from a furnace wall to the camera with
    /// the density of sampling each vertex from either direction.
    struct FullPath<'a> {
        /// `y_0` as a light endpoint followed by surfaces and the camera.
        nodes: Vec<Vertex<'a>>,

        /// `y_0` as an emitting surface hit by a camera subpath.
        emitter: Vertex<'a>,

        /// Density of `y_i` when walking from the light.
        from_light: Vec<Float>,

        /// Density of `y_i` when walking from the camera.
        from_camera: Vec<Float>,
    }

    impl<'a> FullPath<'a> {
        fn new(scene: &'a Scene, camera: &'a PinholeCamera, walls: &[(usize, Float, Float)], distr: &Distribution1D) -> Self {
            let (wall, u, v) = walls[0];
            let (p, n) = furnace_wall_point(wall, u, v);
            let mut nodes = vec![light_vertex_on(scene.light(wall), p, n)];
            let emitter = emitting_surface_vertex(p, n, wall, 0.5);
            for &(wall, u, v) in &walls[1..] {
                let (p, n) = furnace_wall_point(wall, u, v);
                nodes.push(surface_vertex_at(p, n, vec![lambertian_bxdf(0.5)]));
            }
            let camera_ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None);
            nodes.push(Vertex::create_camera_from_ray(camera, &camera_ray, Spectrum::ONE));

            let k = nodes.len();
            let mut from_light = vec![0.0; k];
            from_light[0] = nodes[0].pdf_light_origin(scene, &nodes[1], distr);
            from_light[1] = nodes[0].pdf_light(scene, &nodes[1]);
            for i in 2..k {
                from_light[i] = nodes[i - 1].pdf(scene, Some(&nodes[i - 2]), &nodes[i]);
            }

            let mut from_camera = vec![1.0; k];
            from_camera[k - 2] = nodes[k - 1].pdf(scene, None, &nodes[k - 2]);
            for i in (0..k - 2).rev() {
                from_camera[i] = nodes[i + 1].pdf(scene, Some(&nodes[i + 2]), &nodes[i]);
            }

            Self {
                nodes,
                emitter,
                from_light,
                from_camera,
            }
        }

        /// Splits the path into a light subpath of `s` vertices and a camera
        /// subpath of the remaining vertices.
        fn split(&self, s: usize) -> (Vec<Vertex<'a>>, Vec<Vertex<'a>>) {
            let k = self.nodes.len();
            let light_vertices = (0..s)
                .map(|i| {
                    let mut v = self.nodes[i].clone();
                    v.pdf_fwd = self.from_light[i];
                    v.pdf_rev = self.from_camera[i];
                    v
                })
                .collect();
            let camera_vertices = (0..k - s)
                .map(|j| {
                    let i = k - 1 - j;
                    let mut v = if i == 0 { self.emitter.clone() } else { self.nodes[i].clone() };
                    v.pdf_fwd = self.from_camera[i];
                    v.pdf_rev = self.from_light[i];
                    v
                })
                .collect();
            (light_vertices, camera_vertices)
        }
    }

    #[test]
    fn remap0_only_changes_zero() {
        assert_eq!(remap0(0.0), 1.0);
        assert_eq!(remap0(0.25), 0.25);
    }

    #[test]
    fn path_of_length_two_has_weight_one() {
        let scene = furnace_box(0.5, 1.0);
        let distr = uniform_distribution(&scene);
        let mut lv: Vec<Vertex> = Vec::new();
        let mut cv: Vec<Vertex> = Vec::new();
        assert_eq!(mis_weight(&scene, &mut lv, &mut cv, None, 0, 2, &distr), 1.0);
        assert_eq!(mis_weight(&scene, &mut lv, &mut cv, None, 2, 0, &distr), 1.0);
    }

    #[test]
    fn weights_of_all_strategies_sum_to_one() {
        let scene = furnace_box(0.5, 1.0);
        let camera = furnace_camera();
        let distr = uniform_distribution(&scene);

        // Consecutive vertices lie on different walls. The vertex before
        // the camera is on the floor inside the field of view.
        let paths: [&[(usize, Float, Float)]; 4] = [
            &[(2, 0.3, 0.6), (0, 0.55, 0.45)],
            &[(4, 0.2, 0.7), (1, 0.6, 0.5), (0, 0.4, 0.35)],
            &[(5, 0.5, 0.5), (3, 0.25, 0.8), (2, 0.7, 0.3), (0, 0.6, 0.6)],
            &[(1, 0.1, 0.9), (4, 0.5, 0.5), (3, 0.3, 0.3), (5, 0.8, 0.2), (0, 0.5, 0.45)],
        ];

        for walls in paths {
            let path = FullPath::new(&scene, &camera, walls, &distr);
            let k = path.nodes.len();
            let mut sum = 0.0;
            for s in 0..k {
                let (mut lv, mut cv) = path.split(s);
                let w = mis_weight(&scene, &mut lv, &mut cv, None, s, k - s, &distr);
                assert!(w > 0.0 && w <= 1.0, "k {k}, s {s}: weight {w}");
                sum += w;
            }
            assert!(approx_eq!(f32, sum, 1.0, epsilon = 0.0005), "k {k}: sum {sum}");
        }
    }

    #[test]
    fn evaluation_leaves_subpaths_unchanged() {
        let scene = furnace_box(0.5, 1.0);
        let camera = furnace_camera();
        let distr = uniform_distribution(&scene);
        let mut buffers = SubpathBuffers::new(4);
        let mut sampler = RandomSampler::new(1, 21);
        let n_camera = generate_camera_subpath(
            &scene,
            &mut sampler,
            6,
            &camera,
            &Point2f::new(4.5, 4.5),
            0.0,
            &mut buffers.camera,
        );
        let n_light = generate_light_subpath(&scene, &mut sampler, 5, 0.0, &distr, 0.0, &mut buffers.light);
        let camera_before: Vec<Vertex> = buffers.camera.to_vec();
        let light_before: Vec<Vertex> = buffers.light.to_vec();

        let SubpathBuffers { camera: cv, light: lv } = &mut buffers;
        for t in 1..=n_camera {
            for s in 0..=n_light {
                if s + t < 2 || (s == 1 && t == 1) {
                    continue;
                }
                connect_bdpt(&scene, lv, cv, s, t, &distr, &camera, &mut sampler);
            }
        }

        assert_same_vertices(cv, &camera_before);
        assert_same_vertices(lv, &light_before);
    }

    #[test]
    fn point_light_origin_is_never_a_connection_point() {
        let scene = SceneBuilder::new()
            .diffuse_floor(0.5)
            .point_light(Point3f::new(0.0, 0.0, 1.0), Spectrum::ONE)
            .build();
        let distr = uniform_distribution(&scene);
        let light = scene.light(0);
        let Le { ray, n_light, value, .. } = light.light.sample_le(&Point2f::new(0.5, 0.9), &Point2f::ZERO, 0.0);
        let mut light_vertices = vec![
            Vertex::create_light_from_ray_normal(light, &ray, n_light, value, 1.0),
            surface_vertex_at(Point3f::new(0.2, 0.1, 0.0), Normal3f::new(0.0, 0.0, 1.0), vec![lambertian_bxdf(0.5)]),
        ];
        assert!(light_vertices[0].is_delta_light());
        light_vertices[1].pdf_fwd = light_vertices[0].pdf_light(&scene, &light_vertices[1]);

        let camera = PinholeCamera::looking_down(Point3f::new(0.0, 0.0, 2.0), 8);
        let camera_ray = Ray::new(Point3f::new(0.0, 0.0, 2.0), Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0, None);
        let mut camera_vertices = vec![
            Vertex::create_camera_from_ray(&camera, &camera_ray, Spectrum::ONE),
            // A wall facing `qs` so the connection is not grazing.
            surface_vertex_at(Point3f::new(-0.4, 0.3, 0.5), Normal3f::new(1.0, 0.0, 0.0), vec![lambertian_bxdf(0.5)]),
        ];
        camera_vertices[1].pdf_fwd = camera_vertices[0].pdf(&scene, None, &camera_vertices[1]);

        // With s=2 and t=2 the alternatives are s=1 (connect to the light)
        // and s=3; s=0 would need to hit the point light.
        let w = mis_weight(&scene, &mut light_vertices, &mut camera_vertices, None, 2, 2, &distr);

        let qs = &light_vertices[1];
        let pt = &camera_vertices[1];
        let camera_ratio = qs.pdf(&scene, Some(&light_vertices[0]), pt) / pt.pdf_fwd;
        let light_ratio = pt.pdf(&scene, Some(&camera_vertices[0]), qs) / qs.pdf_fwd;
        assert!(camera_ratio > 0.0 && light_ratio > 0.0);

        // Counting the light origin as a connection point would add a
        // positive `s=0` ratio to the sum.
        let expected = 1.0 / (1.0 + camera_ratio + light_ratio);
        assert!(approx_eq!(f32, w, expected, epsilon = 0.0001), "{w} != {expected}");
        assert!(w < 1.0);
    }
}
