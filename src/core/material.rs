// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFEvalResult, BSDFSampleRecord, BSDF};
use crate::core::error::{RenderError, Result};
use crate::materials::dielectric::DielectricBSDF;
use crate::materials::lambertian_diffuse::LambertianDiffuseBSDF;
use crate::materials::microfacet::GGX;
use crate::materials::mirror::MirrorBSDF;
use crate::materials::roughconductor::RoughConductorBSDF;
use crate::materials::roughdielectric::RoughDielectricBSDF;
use crate::materials::substrate::SubstrateBSDF;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    Lambertian,
    Mirror,
    Dielectric,
    RoughDielectric,
    RoughConductor,
    Substrate,
}

impl MaterialKind {
    pub fn is_diffuse(self) -> bool {
        self == MaterialKind::Lambertian
    }

    /// Substrate carries a diffuse base too, but is sampled as a glossy lobe.
    pub fn is_glossy(self) -> bool {
        matches!(self, MaterialKind::RoughConductor | MaterialKind::RoughDielectric | MaterialKind::Substrate)
    }

    pub fn is_delta(self) -> bool {
        matches!(self, MaterialKind::Mirror | MaterialKind::Dielectric)
    }
}

/// Flat material description shared by every reflectance model. Fields a
/// kind does not use are ignored. Scene data: immutable once added.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub alpha_u: Float,
    pub alpha_v: Float,
    pub int_ior: Float,
    pub ext_ior: Float,
    pub conductor_eta: RGBSpectrum,
    pub conductor_k: RGBSpectrum,
    pub diffuse: RGBSpectrum,
    pub specular: RGBSpectrum,
    /// Index into the scene's texture table; `None` shades with `diffuse`.
    pub texture: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Lambertian,
            alpha_u: 0.1,
            alpha_v: 0.1,
            int_ior: 1.5,
            ext_ior: 1.0,
            // Copper-like defaults for conductors.
            conductor_eta: RGBSpectrum::new(0.200, 0.924, 1.102),
            conductor_k: RGBSpectrum::new(3.912, 2.452, 2.142),
            diffuse: RGBSpectrum::splat(0.5),
            specular: RGBSpectrum::ones(),
            texture: None,
        }
    }
}

impl Material {
    pub fn lambertian(diffuse: RGBSpectrum) -> Self {
        Self { kind: MaterialKind::Lambertian, diffuse, ..Self::default() }
    }

    pub fn mirror(specular: RGBSpectrum) -> Self {
        Self { kind: MaterialKind::Mirror, specular, ..Self::default() }
    }

    pub fn dielectric(int_ior: Float, ext_ior: Float) -> Self {
        Self { kind: MaterialKind::Dielectric, int_ior, ext_ior, ..Self::default() }
    }

    pub fn rough_dielectric(alpha_u: Float, alpha_v: Float, int_ior: Float, ext_ior: Float) -> Self {
        Self { kind: MaterialKind::RoughDielectric, alpha_u, alpha_v, int_ior, ext_ior, ..Self::default() }
    }

    pub fn rough_conductor(alpha_u: Float, alpha_v: Float, eta: RGBSpectrum, k: RGBSpectrum) -> Self {
        Self {
            kind: MaterialKind::RoughConductor,
            alpha_u,
            alpha_v,
            conductor_eta: eta,
            conductor_k: k,
            ..Self::default()
        }
    }

    pub fn substrate(diffuse: RGBSpectrum, specular: RGBSpectrum, alpha_u: Float, alpha_v: Float) -> Self {
        Self { kind: MaterialKind::Substrate, diffuse, specular, alpha_u, alpha_v, ..Self::default() }
    }

    pub fn with_texture(mut self, texture: usize) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_specular(mut self, specular: RGBSpectrum) -> Self {
        self.specular = specular;
        self
    }

    pub fn is_diffuse(&self) -> bool {
        self.kind.is_diffuse()
    }

    pub fn is_glossy(&self) -> bool {
        self.kind.is_glossy()
    }

    pub fn is_delta(&self) -> bool {
        self.kind.is_delta()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.int_ior > 0.0) || !(self.ext_ior > 0.0) {
            return Err(RenderError::InvalidMaterial(
                format!("indices of refraction must be positive, got {} / {}", self.int_ior, self.ext_ior)));
        }
        if !(self.alpha_u >= 0.0) || !(self.alpha_v >= 0.0) {
            return Err(RenderError::InvalidMaterial(
                format!("roughness must be non-negative, got ({}, {})", self.alpha_u, self.alpha_v)));
        }
        if self.diffuse.min_component() < 0.0 || self.specular.min_component() < 0.0 {
            return Err(RenderError::InvalidMaterial(String::from("reflectance must be non-negative")));
        }
        Ok(())
    }

    /// Runs `f` against the reflectance model of this material. `albedo` is the
    /// diffuse colour after texture lookup.
    pub fn with_bsdf<R, F>(&self, albedo: RGBSpectrum, f: F) -> R
    where
        F: FnOnce(&dyn BSDF) -> R,
    {
        let distribution = GGX::new(self.alpha_u, self.alpha_v);
        match self.kind {
            MaterialKind::Lambertian => f(&LambertianDiffuseBSDF::new(albedo)),
            MaterialKind::Mirror => f(&MirrorBSDF::new(self.specular)),
            MaterialKind::Dielectric => f(&DielectricBSDF::new(
                self.int_ior, self.ext_ior, self.specular, self.specular)),
            MaterialKind::RoughDielectric => f(&RoughDielectricBSDF::new(
                distribution, self.int_ior, self.ext_ior, self.specular, self.specular)),
            MaterialKind::RoughConductor => f(&RoughConductorBSDF::new(
                distribution, self.conductor_eta, self.conductor_k, self.specular)),
            MaterialKind::Substrate => f(&SubstrateBSDF::new(distribution, albedo, self.specular)),
        }
    }

    pub fn sample(&self, albedo: RGBSpectrum, u1: Vector2f, u2: Vector2f, wi: Vector3f) -> BSDFSampleRecord {
        self.with_bsdf(albedo, |bsdf| bsdf.sample(u1, u2, wi))
    }

    pub fn eval(&self, albedo: RGBSpectrum, wi: Vector3f, wo: Vector3f) -> BSDFEvalResult {
        self.with_bsdf(albedo, |bsdf| bsdf.eval(&BSDFSampleRecord::new(wi, wo)))
    }
}
