// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::error::{RenderError, Result};
use crate::core::interaction::SurfaceIntersection;
use crate::core::material::Material;
use crate::core::medium::Medium;
use crate::core::shape::Shape;
use crate::core::texture::Texture;
use crate::math::aabb::AABB;
use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use std::sync::Arc;

/// A shape placed in the scene. A `None` material makes the surface an
/// index-matched boundary that only hands the path over to `interior_medium`.
pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material: Option<usize>,
    pub emission: RGBSpectrum,
    pub name: Option<String>,
    pub interior_medium: Option<usize>,
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>, material: Option<usize>) -> Self {
        Self { shape, material, emission: RGBSpectrum::default(), name: None, interior_medium: None }
    }

    pub fn with_emission(mut self, emission: RGBSpectrum) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }

    pub fn with_interior_medium(mut self, medium: Option<usize>) -> Self {
        self.interior_medium = medium;
        self
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }

    pub fn is_emissive(&self) -> bool {
        !self.emission.is_black()
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.shape.describe())
    }
}

/// Owns every material, medium, texture, object and emitter. Cross
/// references are indices checked when the referencing item is added.
pub struct Scene {
    objects: Vec<SceneObject>,
    object_bounds: Vec<AABB>,
    emitters: Vec<Box<dyn Emitter>>,
    materials: Vec<Material>,
    media: Vec<Medium>,
    textures: Vec<Texture>,
    scene_bounds: AABB,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            object_bounds: Vec::new(),
            emitters: Vec::new(),
            materials: Vec::new(),
            media: Vec::new(),
            textures: Vec::new(),
            scene_bounds: AABB::default(),
        }
    }

    pub fn add_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn add_material(&mut self, material: Material) -> Result<usize> {
        material.validate()?;
        if let Some(texture) = material.texture {
            if texture >= self.textures.len() {
                return Err(RenderError::InvalidMaterial(
                    format!("texture index {} out of range ({} loaded)", texture, self.textures.len())));
            }
        }
        self.materials.push(material);
        Ok(self.materials.len() - 1)
    }

    pub fn add_medium(&mut self, medium: Medium) -> usize {
        self.media.push(medium);
        self.media.len() - 1
    }

    pub fn add_object(&mut self, object: SceneObject) -> Result<usize> {
        if let Some(material) = object.material {
            if material >= self.materials.len() {
                return Err(RenderError::InvalidMaterial(
                    format!("object {} uses material {} out of range", object.label(), material)));
            }
        }
        if let Some(medium) = object.interior_medium {
            if medium >= self.media.len() {
                return Err(RenderError::InvalidMedium(
                    format!("object {} uses medium {} out of range", object.label(), medium)));
            }
        }

        let bbox = object.shape.bounding_box();
        self.scene_bounds.expand_by_aabb(&bbox);
        log::debug!("Added object {} with bounds {:?} - {:?}.", object.label(), bbox.p_min, bbox.p_max);
        self.object_bounds.push(bbox);
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    pub fn add_emitter(&mut self, emitter: Box<dyn Emitter>) {
        log::debug!("Added emitter {}.", emitter.describe());
        self.emitters.push(emitter);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, idx: usize) -> &SceneObject {
        &self.objects[idx]
    }

    pub fn emitters(&self) -> &[Box<dyn Emitter>] {
        &self.emitters
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, idx: usize) -> &Material {
        &self.materials[idx]
    }

    pub fn media(&self) -> &[Medium] {
        &self.media
    }

    pub fn medium(&self, idx: usize) -> &Medium {
        &self.media[idx]
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    /// Nearest hit along `ray`. Objects whose bounds the ray misses are skipped.
    pub fn intersect(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        if !self.scene_bounds.ray_intersect(ray) {
            return None;
        }

        let mut ray = *ray;
        let mut closest = None;
        for (idx, (object, bbox)) in self.objects.iter().zip(self.object_bounds.iter()).enumerate() {
            if !bbox.ray_intersect(&ray) {
                continue;
            }
            if let Some(hit) = object.shape.ray_intersection(&ray) {
                ray.max_t = hit.t();
                closest = Some(hit.with_object(idx));
            }
        }
        closest
    }

    /// Diffuse colour of `material` at `uv`, from its texture when it has one.
    pub fn diffuse_color(&self, material: &Material, uv: &Vector2f) -> RGBSpectrum {
        match material.texture.and_then(|idx| self.textures.get(idx)) {
            Some(texture) => texture.sample(uv),
            None => material.diffuse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;
    use crate::shapes::sphere::Sphere;

    fn sphere(z: f32) -> Arc<dyn Shape> {
        Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, z), 1.0).expect("sphere"))
    }

    #[test]
    fn test_scene_nearest_hit() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::lambertian(RGBSpectrum::splat(0.5))).expect("material");
        scene.add_object(SceneObject::new(sphere(10.0), Some(m))).expect("far");
        scene.add_object(SceneObject::new(sphere(5.0), Some(m))).expect("near");

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), Some(0.0), None);
        let hit = scene.intersect(&ray).expect("hit");
        assert_eq!(hit.object(), 1);
        assert!((hit.t() - 4.0).abs() < 1e-5);

        let away = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), Some(0.0), None);
        assert!(scene.intersect(&away).is_none());
    }

    #[test]
    fn test_scene_rejects_dangling_indices() {
        let mut scene = Scene::new();
        assert!(scene.add_object(SceneObject::new(sphere(0.0), Some(0))).is_err());
        assert!(scene.add_object(SceneObject::new(sphere(0.0), None).with_interior_medium(Some(3))).is_err());
        assert!(scene.add_material(Material::lambertian(RGBSpectrum::ones()).with_texture(0)).is_err());
        assert!(scene.add_object(SceneObject::new(sphere(0.0), None)).is_ok());
    }

    #[test]
    fn test_scene_diffuse_color_uses_texture() {
        let mut scene = Scene::new();
        let tex = scene.add_texture(Texture::from_rgba_f32(1, 1, &[[1.0, 0.0, 0.0, 1.0]]).expect("texture"));
        let plain = Material::lambertian(RGBSpectrum::splat(0.25));
        let textured = plain.clone().with_texture(tex);
        let uv = Vector2f::new(0.3, 0.3);
        assert_eq!(scene.diffuse_color(&plain, &uv), RGBSpectrum::splat(0.25));
        assert_eq!(scene.diffuse_color(&textured, &uv), RGBSpectrum::new(1.0, 0.0, 0.0));
    }
}
