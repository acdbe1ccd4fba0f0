//! Common

use transport_core::geometry::*;
use transport_core::interaction::*;
use transport_core::material::*;
use transport_core::pbrt::*;
use transport_core::sampling::Distribution1D;
use transport_core::scene::*;

/// Returns the correction term for adjoint BSDF with shading normals.
///
/// * `isect` - The surface interaction.
/// * `wo`    - Outgoing direction.
/// * `wi`    - Incident direction.
/// * `mode`  - Light transport mode.
pub fn correct_shading_normal(isect: &SurfaceInteraction, wo: &Vector3f, wi: &Vector3f, mode: TransportMode) -> Float {
    match mode {
        TransportMode::Importance => {
            let num = wo.abs_dot(&isect.shading.n) * wi.abs_dot(&isect.hit.n);
            let denom = wo.abs_dot(&isect.hit.n) * wi.abs_dot(&isect.shading.n);

            // `wi` is occasionally perpendicular to the shading normal.
            if denom == 0.0 {
                0.0
            } else {
                num / denom
            }
        }
        TransportMode::Radiance => 1.0,
    }
}

/// Calculates the spatial density of infinite area light endpoints expressed
/// as a probability per unit solid angle. It is the sum of the directional
/// densities of all infinite lights weighted by their selection probability.
///
/// * `scene`       - The scene.
/// * `light_distr` - Light selection probabilities, indexed like `Scene::lights`.
/// * `w`           - Direction from the light towards the scene.
pub fn infinite_light_density(scene: &Scene, light_distr: &Distribution1D, w: &Vector3f) -> Float {
    let reference = Hit::default();
    scene
        .infinite_lights()
        .map(|light| light.light.pdf_li(&reference, &-*w) * light_distr.discrete_pdf(light.index))
        .sum()
}
