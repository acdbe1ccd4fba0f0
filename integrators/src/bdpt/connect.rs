//! Strategy Connection

use super::mis::*;
use super::vertex::*;
use transport_core::camera::*;
use transport_core::geometry::*;
use transport_core::interaction::*;
use transport_core::light::*;
use transport_core::material::*;
use transport_core::pbrt::*;
use transport_core::sampler::*;
use transport_core::sampling::*;
use transport_core::scene::*;
use transport_core::spectrum::*;

/// Result of connecting a light subpath prefix to a camera subpath prefix.
#[derive(Copy, Clone, Debug, Default)]
pub struct Connection {
    /// Contribution of the path before MIS weighting.
    pub l: Spectrum,

    /// The MIS weight. It is 0 when the path carries no radiance.
    pub mis_weight: Float,

    /// Raster position for connections to a freshly sampled camera vertex.
    pub p_raster: Option<Point2f>,
}

impl Connection {
    /// Returns the MIS weighted contribution.
    pub fn weighted(&self) -> Spectrum {
        self.l * self.mis_weight
    }
}

/// Computes the generalized geometric term for a path segment including the
/// transmittance between the two vertices.
///
/// * `scene`   - The scene.
/// * `sampler` - The sampler.
/// * `v0`      - First vertex.
/// * `v1`      - Second vertex.
pub fn g(scene: &Scene, sampler: &mut dyn Sampler, v0: &Vertex, v1: &Vertex) -> Spectrum {
    let mut d = v0.p() - v1.p();
    let mut g = 1.0 / d.length_squared();
    d *= g.sqrt();

    if v0.is_on_surface() {
        g *= v0.ns().abs_dot(&d);
    }
    if v1.is_on_surface() {
        g *= v1.ns().abs_dot(&d);
    }

    let vis = VisibilityTester::new(v0.hit().clone(), v1.hit().clone());
    vis.tr(scene, sampler) * g
}

/// Connects the first `s` vertices of the light subpath to the first `t`
/// vertices of the camera subpath.
///
/// * `scene`           - The scene.
/// * `light_vertices`  - The light subpath.
/// * `camera_vertices` - The camera subpath.
/// * `s`               - Number of light subpath vertices to use.
/// * `t`               - Number of camera subpath vertices to use.
/// * `light_distr`     - Light selection probabilities.
/// * `camera`          - The camera.
/// * `sampler`         - The sampler.
#[allow(clippy::too_many_arguments)]
pub fn connect_bdpt<'scene>(
    scene: &'scene Scene,
    light_vertices: &mut [Vertex<'scene>],
    camera_vertices: &mut [Vertex<'scene>],
    s: usize,
    t: usize,
    light_distr: &Distribution1D,
    camera: &'scene dyn Camera,
    sampler: &mut dyn Sampler,
) -> Connection {
    let mut l = Spectrum::ZERO;
    let mut p_raster = None;

    // Ignore invalid connections related to infinite area lights.
    if t > 1 && s != 0 && camera_vertices[t - 1].vertex_type == VertexType::Light {
        return Connection::default();
    }

    // Perform connection and write contribution to `l`.
    let mut sampled: Option<Vertex<'scene>> = None;
    if s == 0 {
        // Interpret the camera subpath as a complete path.
        let pt = &camera_vertices[t - 1];
        if pt.is_light() {
            assert!(t >= 2);
            l = pt.le(scene, &camera_vertices[t - 2]) * pt.beta;
        }
    } else if t == 1 {
        // Sample a point on the camera and connect it to the light subpath.
        let qs = &light_vertices[s - 1];
        if qs.is_connectible() {
            let u = sampler.get_2d();
            if let Some(wi) = camera.sample_wi(qs.hit(), &u) {
                p_raster = Some(wi.p_raster);

                if wi.pdf > 0.0 && !wi.value.is_black() {
                    // Initialize dynamically sampled vertex and `l` for `t=1` case.
                    let vertex = Vertex::create_camera_from_hit(camera, wi.p_lens.clone(), wi.value / wi.pdf);
                    l = qs.beta * qs.f(&vertex, TransportMode::Importance) * vertex.beta;
                    if qs.is_on_surface() {
                        l *= wi.wi.abs_dot(&qs.ns());
                    }

                    // Only check visibility after we know that the path would
                    // make a non-zero contribution.
                    if !l.is_black() {
                        l *= wi.visibility(qs.hit()).tr(scene, sampler);
                    }
                    sampled = Some(vertex);
                }
            }
        }
    } else if s == 1 {
        // Sample a point on a light and connect it to the camera subpath.
        let pt = &camera_vertices[t - 1];
        if pt.is_connectible() {
            let (light_num, light_pdf, _u_remapped) = light_distr.sample_discrete(sampler.get_1d());
            let light = scene.light(light_num);
            let u = sampler.get_2d();

            if let Some(li) = light.light.sample_li(pt.hit(), &u) {
                if li.pdf > 0.0 && !li.value.is_black() {
                    let ei = EndpointInteraction::light_from_hit(li.p_light.clone(), Some(light));
                    let mut vertex = Vertex::create_light_from_endpoint(ei, li.value / (li.pdf * light_pdf), 0.0);
                    vertex.pdf_fwd = vertex.pdf_light_origin(scene, pt, light_distr);

                    l = pt.beta * pt.f(&vertex, TransportMode::Radiance) * vertex.beta;
                    if pt.is_on_surface() {
                        l *= li.wi.abs_dot(&pt.ns());
                    }

                    // Only check visibility if the path would carry radiance.
                    if !l.is_black() {
                        l *= li.visibility(pt.hit()).tr(scene, sampler);
                    }
                    sampled = Some(vertex);
                }
            }
        }
    } else {
        // Handle all other bidirectional connection cases.
        let qs = &light_vertices[s - 1];
        let pt = &camera_vertices[t - 1];
        if qs.is_connectible() && pt.is_connectible() {
            l = qs.beta * qs.f(pt, TransportMode::Importance) * pt.f(qs, TransportMode::Radiance) * pt.beta;
            if !l.is_black() {
                l *= g(scene, sampler, qs, pt);
            }
        }
    }
    debug_assert!(!l.has_nans());

    // Compute MIS weight for connection strategy.
    let mis_weight = match sampled.as_ref() {
        _ if l.is_black() => 0.0,
        Some(vertex) if s == 1 && light_vertices.is_empty() => {
            // No light subpath was traced; the sampled vertex is the whole of it.
            let mut fresh = [vertex.clone()];
            mis_weight(scene, &mut fresh, camera_vertices, None, s, t, light_distr)
        }
        sampled => mis_weight(scene, light_vertices, camera_vertices, sampled, s, t, light_distr),
    };
    trace!("MIS weight for (s,t) = ({s}, {t}) connection: {mis_weight}");
    debug_assert!(!mis_weight.is_nan());

    Connection { l, mis_weight, p_raster }
}
