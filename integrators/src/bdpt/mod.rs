//! Bi-directional Path Tracer

use transport_core::camera::*;
use transport_core::film::Film;
use transport_core::geometry::*;
use transport_core::light_distrib::*;
use transport_core::pbrt::*;
use transport_core::sampler::*;
use transport_core::scene::*;
use transport_core::spectrum::*;

mod common;
mod connect;
mod mis;
mod options;
mod scoped_assignment;
mod subpath;
mod vertex;

#[cfg(test)]
mod fixtures;

// Re-export.
pub use common::*;
pub use connect::*;
pub use mis::*;
pub use options::*;
pub use scoped_assignment::*;
pub use subpath::*;
pub use vertex::*;

/// Contribution of one evaluated `(s, t)` strategy of a camera sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrategySample {
    /// Number of light subpath vertices.
    pub s: usize,

    /// Number of camera subpath vertices.
    pub t: usize,

    /// Contribution before MIS weighting.
    pub unweighted: Spectrum,

    /// MIS weighted contribution.
    pub weighted: Spectrum,

    /// The MIS weight.
    pub mis_weight: Float,

    /// Film position the contribution belongs to. For `t = 1` this is the
    /// raster position of the sampled camera vertex.
    pub p_film: Point2f,
}

/// Returns the index of the strategy film for `s + t >= 2`. Strategies are
/// grouped by depth `s + t - 2` and ordered by `s` within a depth.
///
/// * `s` - Number of light subpath vertices.
/// * `t` - Number of camera subpath vertices.
pub fn buffer_index(s: usize, t: usize) -> usize {
    let above = s + t - 2;
    s + above * (5 + above) / 2
}

/// Debug films holding the contribution of every strategy separately.
pub struct StrategyFilms {
    /// Maximum depth covered.
    max_depth: usize,

    /// Films indexed by `buffer_index()`. Strategies that are never
    /// evaluated have no film.
    films: Vec<Option<Film>>,
}

impl StrategyFilms {
    /// Allocate films for all strategies up to the given depth.
    ///
    /// * `resolution` - Film resolution in pixels.
    /// * `max_depth`  - Maximum path depth.
    pub fn new(resolution: &Point2i, max_depth: usize) -> Self {
        let buffer_count = (1 + max_depth) * (6 + max_depth) / 2;
        let mut films: Vec<Option<Film>> = (0..buffer_count).map(|_| None).collect();

        for depth in 0..=max_depth {
            for s in 0..=depth + 2 {
                let t = depth + 2 - s;
                if t == 0 || (s == 1 && t == 1) {
                    continue;
                }
                films[buffer_index(s, t)] = Some(Film::new(resolution, None));
            }
        }

        Self { max_depth, films }
    }

    /// Returns the film of a strategy.
    ///
    /// * `s` - Number of light subpath vertices.
    /// * `t` - Number of camera subpath vertices.
    pub fn get(&self, s: usize, t: usize) -> Option<&Film> {
        if s + t < 2 || s + t - 2 > self.max_depth {
            return None;
        }
        self.films[buffer_index(s, t)].as_ref()
    }

    /// Splats a contribution onto the film of a strategy.
    ///
    /// * `s` - Number of light subpath vertices.
    /// * `t` - Number of camera subpath vertices.
    /// * `p` - Film position.
    /// * `v` - The contribution.
    pub fn add_splat(&self, s: usize, t: usize, p: &Point2f, v: &Spectrum) {
        if let Some(film) = self.get(s, t) {
            film.add_splat(p, v);
        }
    }

    /// Returns all films with their `(s, t)` strategy.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Film)> + '_ {
        (0..=self.max_depth)
            .flat_map(|depth| (0..=depth + 2).map(move |s| (s, depth + 2 - s)))
            .filter_map(move |(s, t)| self.get(s, t).map(|film| (s, t, film)))
    }
}

/// Implements bi-directional path tracing integrator.
pub struct BDPTIntegrator {
    /// The camera.
    camera: ArcCamera,

    /// Distribution used to choose the light starting a light subpath.
    light_distr: ArcLightDistribution,

    /// Validated options.
    options: BDPTOptions,

    /// Per strategy films when visualization is enabled.
    strategy_films: Option<StrategyFilms>,
}

impl BDPTIntegrator {
    /// Create a new `BDPTIntegrator`.
    ///
    /// * `camera`  - The camera.
    /// * `scene`   - The scene used to build the light distribution.
    /// * `options` - Integrator options. Out-of-range values are corrected.
    pub fn new(camera: ArcCamera, scene: &Scene, options: BDPTOptions) -> Self {
        let options = options.validated();
        let light_distr = create_light_sample_distribution(options.light_sample_strategy, scene);

        info!(
            "BDPT maxdepth {}, rrthreshold {}, visualizestrategies {}, visualizeweights {}",
            options.max_depth, options.rr_threshold, options.visualize_strategies, options.visualize_weights
        );

        Self {
            camera,
            light_distr,
            options,
            strategy_films: None,
        }
    }

    /// Allocate per strategy films. Nothing is allocated unless strategy or
    /// weight visualization is enabled.
    ///
    /// * `resolution` - Film resolution in pixels.
    pub fn with_strategy_films(mut self, resolution: Point2i) -> Self {
        if self.options.visualize() {
            self.strategy_films = Some(StrategyFilms::new(&resolution, self.options.max_depth));
        }
        self
    }

    /// Returns the per strategy films.
    pub fn strategy_films(&self) -> Option<&StrategyFilms> {
        self.strategy_films.as_ref()
    }

    /// Returns the validated options.
    pub fn options(&self) -> &BDPTOptions {
        &self.options
    }

    /// Returns subpath storage for one worker.
    pub fn create_buffers<'scene>(&self) -> SubpathBuffers<'scene> {
        SubpathBuffers::new(self.options.max_depth)
    }

    /// Returns the MIS weighted estimate of the radiance arriving at a film
    /// position. Contributions of strategies with a single camera vertex
    /// land elsewhere on the film and are splatted to `film`.
    ///
    /// * `scene`       - The scene.
    /// * `sampler`     - The sampler positioned at the current pixel sample.
    /// * `p_film`      - The film position.
    /// * `film`        - Film receiving the `t = 1` splats.
    /// * `buffers`     - Subpath storage.
    /// * `diagnostics` - Optionally records every evaluated strategy.
    pub fn li<'scene>(
        &'scene self,
        scene: &'scene Scene,
        sampler: &mut dyn Sampler,
        p_film: &Point2f,
        film: &Film,
        buffers: &mut SubpathBuffers<'scene>,
        mut diagnostics: Option<&mut Vec<StrategySample>>,
    ) -> Spectrum {
        let max_depth = self.options.max_depth;
        let rr_threshold = self.options.rr_threshold;
        let camera: &'scene dyn Camera = self.camera.as_ref();
        let SubpathBuffers {
            camera: camera_vertices,
            light: light_vertices,
        } = buffers;

        // Trace the camera subpath.
        let n_camera = generate_camera_subpath(
            scene,
            sampler,
            max_depth + 2,
            camera,
            p_film,
            rr_threshold,
            camera_vertices,
        );
        if n_camera == 0 {
            return Spectrum::ZERO;
        }

        // The light path follows multiple bounces so the distribution is
        // looked up once at the camera.
        let Some(light_distr) = self.light_distr.lookup(&camera_vertices[0].p()) else {
            debug!("No light distribution at {}", camera_vertices[0].p());
            return Spectrum::ZERO;
        };

        // Now trace the light subpath.
        let n_light = generate_light_subpath(
            scene,
            sampler,
            max_depth + 1,
            camera_vertices[0].time(),
            &light_distr,
            rr_threshold,
            light_vertices,
        );
        debug!("Subpaths for {p_film}: {n_camera} camera vertices, {n_light} light vertices");

        // Execute all BDPT connection strategies. The `s=1` strategy samples
        // its own light vertex, so it runs even when the light subpath is empty.
        let mut l = Spectrum::ZERO;
        for t in 1..=n_camera {
            for s in 0..=n_light.max(1) {
                if s + t < 2 || s + t - 2 > max_depth || (s == 1 && t == 1) {
                    continue;
                }

                let connection = connect_bdpt(
                    scene,
                    light_vertices,
                    camera_vertices,
                    s,
                    t,
                    &light_distr,
                    camera,
                    sampler,
                );
                let weighted = connection.weighted();
                debug_assert!(!weighted.has_nans(), "NaN contribution for s {s}, t {t}");
                trace!(
                    "Connect s: {s}, t: {t}, l: {}, mis_weight: {}",
                    connection.l,
                    connection.mis_weight
                );

                let p_splat = connection.p_raster.unwrap_or(*p_film);
                if let Some(films) = self.strategy_films.as_ref() {
                    let value = if self.options.visualize_weights {
                        weighted
                    } else {
                        connection.l
                    };
                    films.add_splat(s, t, &p_splat, &value);
                }
                if let Some(samples) = diagnostics.as_deref_mut() {
                    samples.push(StrategySample {
                        s,
                        t,
                        unweighted: connection.l,
                        weighted,
                        mis_weight: connection.mis_weight,
                        p_film: p_splat,
                    });
                }

                if t != 1 {
                    l += weighted;
                } else if connection.p_raster.is_some() && !weighted.is_black() {
                    film.add_splat(&p_splat, &weighted);
                }
            }
        }

        trace!("Film sample {p_film}: L {l} (y: {})", l.y());
        l
    }
}
