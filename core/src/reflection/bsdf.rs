//! BSDF

use super::*;

/// Maximum number of BxDFs in a BSDF.
pub const MAX_BXDFS: usize = 8;

/// BSDF represents a collection of BRDFs and BTDFs.
#[derive(Clone, Debug)]
pub struct BSDF {
    /// Shading normal.
    pub ns: Normal3f,

    /// Geometric normal.
    pub ng: Normal3f,

    /// First shading tangent.
    pub ss: Vector3f,

    /// Second shading tangent.
    pub ts: Vector3f,

    /// The BxDFs.
    pub bxdfs: Vec<BxDF>,

    /// Relative index of refraction over the boundary.
    pub eta: Float,
}

impl BSDF {
    /// Creates a new BSDF with no BxDFs.
    ///
    /// * `si`  - The surface interaction.
    /// * `eta` - Optional relative index of refraction. Defaults to 1.
    pub fn new(si: &SurfaceInteraction, eta: Option<Float>) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();

        Self {
            eta: eta.unwrap_or(1.0),
            ns,
            ng: si.hit.n,
            ss,
            ts: Vector3f::from(ns).cross(&ss),
            bxdfs: Vec::with_capacity(MAX_BXDFS),
        }
    }

    /// Add a BxDF.
    ///
    /// * `bxdf` - The BxDF.
    pub fn add(&mut self, bxdf: BxDF) {
        assert!(
            self.bxdfs.len() < MAX_BXDFS,
            "Cannot add BxDFs. BSDF maximum limit {} reached.",
            MAX_BXDFS
        );
        self.bxdfs.push(bxdf);
    }

    /// Returns the number of BxDFs matching the given flags.
    ///
    /// * `bxdf_type` - The flags to match.
    pub fn num_components(&self, bxdf_type: BxDFType) -> usize {
        self.bxdfs.iter().filter(|b| b.matches_flags(bxdf_type)).count()
    }

    /// Transforms a world-space vector to the local shading coordinate system.
    ///
    /// * `v` - The vector.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot(&self.ns))
    }

    /// Transforms a vector from the local shading coordinate system to world
    /// space.
    ///
    /// * `v` - The vector.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    /// Returns the value of the distribution function for the given pair of
    /// world-space directions. The geometric normal decides between
    /// reflection and transmission.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `wi_w`      - Incident direction.
    /// * `bxdf_type` - The flags of BxDFs to evaluate.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Spectrum {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }

        let reflect = wi_w.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(bxdf_type) && self.scatters_into(b, reflect))
            .fold(Spectrum::ZERO, |l, b| l + b.f(&wo, &wi))
    }

    /// Samples one matching BxDF chosen uniformly with `u[0]` and returns
    /// the sample with the PDF and value of all matching BxDFs combined.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `u`         - The 2D uniform random values.
    /// * `bxdf_type` - The flags of BxDFs to sample.
    pub fn sample_f(&self, wo_w: &Vector3f, u: &Point2f, bxdf_type: BxDFType) -> BxDFSample {
        // Choose which `BxDF` to sample.
        let matching_comps = self.num_components(bxdf_type);
        if matching_comps == 0 {
            return BxDFSample::default();
        }
        let comp = min((u[0] * matching_comps as Float).floor() as usize, matching_comps - 1);

        let (chosen, bxdf) = match self
            .bxdfs
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(bxdf_type))
            .nth(comp)
        {
            Some(found) => found,
            None => return BxDFSample::default(),
        };

        // Remap BxDF sample `u` to `[0,1)^2`.
        let u_remapped = Point2f::new(
            min(u[0] * matching_comps as Float - comp as Float, ONE_MINUS_EPSILON),
            u[1],
        );

        // Sample chosen `BxDF`.
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return BxDFSample::default();
        }

        let sampled_type = bxdf.get_type();
        let sample = bxdf.sample_f(&wo, &u_remapped);
        if sample.pdf == 0.0 {
            return BxDFSample::from(sampled_type);
        }
        let wi_world = self.local_to_world(&sample.wi);
        let is_specular = sampled_type.matches(BxDFType::BSDF_SPECULAR);

        // Compute overall PDF with all matching BxDFs.
        let mut pdf = sample.pdf;
        if !is_specular && matching_comps > 1 {
            for (i, b) in self.bxdfs.iter().enumerate() {
                if i != chosen && b.matches_flags(bxdf_type) {
                    pdf += b.pdf(&wo, &sample.wi);
                }
            }
        }
        if matching_comps > 1 {
            pdf /= matching_comps as Float;
        }

        // Compute value of BSDF for sampled direction.
        let f = if is_specular {
            sample.f
        } else {
            let reflect = wi_world.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
            self.bxdfs
                .iter()
                .filter(|b| b.matches_flags(bxdf_type) && self.scatters_into(b, reflect))
                .fold(Spectrum::ZERO, |l, b| l + b.f(&wo, &sample.wi))
        };

        BxDFSample::new(f, pdf, wi_world, sampled_type)
    }

    /// Returns the PDF of `sample_f()` for the given pair of world-space
    /// directions.
    ///
    /// * `wo_w`      - Outgoing direction.
    /// * `wi_w`      - Incident direction.
    /// * `bxdf_type` - The flags of BxDFs to consider.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Float {
        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        if wo.z == 0.0 {
            return 0.0;
        }

        let mut matching_comps = 0;
        let mut pdf = 0.0;
        for bxdf in self.bxdfs.iter().filter(|b| b.matches_flags(bxdf_type)) {
            matching_comps += 1;
            pdf += bxdf.pdf(&wo, &wi);
        }
        if matching_comps > 0 {
            pdf / matching_comps as Float
        } else {
            0.0
        }
    }

    /// Returns true if a BxDF scatters into the hemisphere selected by
    /// `reflect`.
    fn scatters_into(&self, bxdf: &BxDF, reflect: bool) -> bool {
        let t = bxdf.get_type();
        (reflect && t.matches(BxDFType::BSDF_REFLECTION)) || (!reflect && t.matches(BxDFType::BSDF_TRANSMISSION))
    }
}
