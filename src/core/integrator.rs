// Copyright @yucwang 2026

use crate::core::emitter::EmitterSample;
use crate::core::error::{RenderError, Result};
use crate::core::rng::LcgRng;
use crate::core::scene::{Scene, SceneObject};
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::math::constants::{Float, Vector2f, Vector3f, FLOAT_MAX};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

// Minimum Russian roulette kill probability once roulette is active.
const RR_MIN_KILL: Float = 0.05;
// Index-matched boundaries a single ray segment may cross.
const MAX_BOUNDARY_CROSSINGS: usize = 256;

/// Progressive accumulation owned by the tracer between `begin_render`
/// and `end_render`.
pub struct RenderState {
    accumulated: Vec<Vector3f>,
    iteration_count: u32,
    width: usize,
    height: usize,
    epsilon: Float,
}

impl RenderState {
    fn new(width: usize, height: usize, epsilon: Float) -> Self {
        Self {
            accumulated: vec![Vector3f::zeros(); width * height],
            iteration_count: 0,
            width,
            height,
            epsilon,
        }
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn accumulated(&self) -> &[Vector3f] {
        &self.accumulated
    }
}

/// Unidirectional path tracer with next-event estimation toward delta
/// emitters, surface and volumetric scattering.
pub struct PathTracer {
    settings: RenderSettings,
    state: Option<RenderState>,
}

impl PathTracer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings, state: None }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn state(&self) -> Option<&RenderState> {
        self.state.as_ref()
    }

    /// Allocates a zeroed `width * height` accumulation buffer, dropping
    /// any previous one. `epsilon` offsets secondary rays off surfaces.
    pub fn begin_render(&mut self, scene: &Scene, width: usize, height: usize, epsilon: Float) {
        let epsilon = if epsilon.is_finite() { epsilon.max(0.0) } else { 0.0 };
        log::info!("Begin render {}x{} with {} objects, {} emitters, {} media, epsilon = {}.",
                   width, height, scene.objects().len(), scene.emitters().len(), scene.media().len(), epsilon);
        self.state = Some(RenderState::new(width, height, epsilon));
    }

    pub fn end_render(&mut self) {
        if let Some(state) = self.state.take() {
            log::info!("End render after {} iterations.", state.iteration_count);
        }
    }

    /// Traces one sample per pixel, folds it into the accumulation buffer
    /// and writes the running mean to `output`. `reset` restarts the mean
    /// from this sample. Nothing is modified when an error is returned.
    pub fn render(&mut self,
                  scene: &Scene,
                  width: usize,
                  height: usize,
                  camera: &dyn Sensor,
                  iteration: u32,
                  reset: bool,
                  output: &mut [Vector3f]) -> Result<()> {
        let (epsilon, expected) = match &self.state {
            Some(state) if (state.width, state.height) != (width, height) => {
                return Err(RenderError::BufferSize {
                    expected: state.width * state.height,
                    actual: width * height,
                });
            }
            Some(state) => (state.epsilon, state.width * state.height),
            None => return Err(RenderError::NotInitialized),
        };
        if output.len() != expected {
            return Err(RenderError::BufferSize { expected, actual: output.len() });
        }

        let samples = self.trace_image(scene, width, height, camera, iteration, epsilon);

        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return Err(RenderError::NotInitialized),
        };
        if reset {
            state.iteration_count = 0;
            for slot in state.accumulated.iter_mut() {
                *slot = Vector3f::zeros();
            }
        }
        state.iteration_count += 1;

        let inv_count = 1.0 / state.iteration_count as Float;
        for ((slot, sample), out) in state.accumulated.iter_mut().zip(samples.iter()).zip(output.iter_mut()) {
            *slot += sample;
            *out = *slot * inv_count;
        }
        log::debug!("Iteration {} done, {} accumulated.", iteration, state.iteration_count);
        Ok(())
    }

    fn trace_image(&self,
                   scene: &Scene,
                   width: usize,
                   height: usize,
                   camera: &dyn Sensor,
                   iteration: u32,
                   epsilon: Float) -> Vec<Vector3f> {
        let mut samples = vec![Vector3f::zeros(); width * height];
        if width == 0 || height == 0 {
            return samples;
        }

        let block_size = self.settings.block_size.max(1);
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let thread_count = self.settings.threads.max(1).min(total_blocks);

        let next_block = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * block_size;
                        let y0 = (block_index / blocks_x) * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut block = Vec::with_capacity((x1 - x0) * (y1 - y0));
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let mut rng = LcgRng::for_path(self.settings.seed, x, y, iteration);
                                let radiance = self.trace_pixel(scene, camera, x, y, width, height, epsilon, &mut rng);
                                block.push(radiance.to_vector());
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for (x0, y0, x1, y1, block) in rx.iter() {
                for y in y0..y1 {
                    for x in x0..x1 {
                        samples[x + width * y] = block[(x - x0) + (x1 - x0) * (y - y0)];
                    }
                }
            }
        });

        samples
    }

    fn trace_pixel(&self,
                   scene: &Scene,
                   camera: &dyn Sensor,
                   x: usize,
                   y: usize,
                   width: usize,
                   height: usize,
                   epsilon: Float,
                   rng: &mut LcgRng) -> RGBSpectrum {
        let offset = if self.settings.jitter { rng.next_2d() } else { Vector2f::new(0.5, 0.5) };
        let film = Vector2f::new((x as Float + offset.x) / width as Float,
                                 (y as Float + offset.y) / height as Float);
        let ray = camera.sample_ray(&film);
        let radiance = self.trace_path(scene, ray, epsilon, rng);
        if radiance.is_finite() {
            radiance
        } else {
            RGBSpectrum::default()
        }
    }

    /// Radiance arriving at the origin of `ray`. The camera is assumed to
    /// sit in vacuum.
    pub fn trace_path(&self, scene: &Scene, mut ray: Ray3f, epsilon: Float, rng: &mut LcgRng) -> RGBSpectrum {
        let mut radiance = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::ones();
        let mut medium: Option<usize> = None;
        let mut depth = 0u32;
        let mut crossings = 0usize;

        while depth < self.settings.max_depth {
            let hit = scene.intersect(&ray);

            if let Some(medium_idx) = medium {
                let segment = ray.with_max_t(hit.as_ref().map(|h| h.t()).unwrap_or(FLOAT_MAX));
                let sample = scene.medium(medium_idx).sample_interaction(&segment, rng);
                throughput *= sample.weight;

                if sample.interacted {
                    let p = ray.at(sample.t);
                    let phase_medium = scene.medium(medium_idx);
                    for emitter in scene.emitters() {
                        if let Some(es) = emitter.sample_li(&p) {
                            let (phase, _) = phase_medium.eval_phase(&ray.dir(), &es.direction);
                            let tr = self.shadow_transmittance(scene, &p, &es, medium, epsilon, rng);
                            radiance += throughput * es.radiance * tr * phase;
                        }
                    }

                    let ps = phase_medium.sample_phase(&ray.dir(), &rng.next_2d());
                    if !(ps.pdf > 0.0) {
                        break;
                    }
                    throughput *= ps.value / ps.pdf;
                    ray = Ray3f::new(p, ps.wo, Some(0.0), None);
                    depth += 1;
                    crossings = 0;
                    if !self.survives_roulette(depth, &mut throughput, rng) {
                        break;
                    }
                    continue;
                }
            }

            let hit = match hit {
                Some(hit) => hit,
                None => break,
            };
            let object = scene.object(hit.object());
            let n = hit.geo_normal();
            let d = ray.dir();
            let p = hit.p();

            if object.is_emissive() && d.dot(&n) < 0.0 {
                radiance += throughput * object.emission;
            }

            let material = match object.material {
                Some(idx) => scene.material(idx),
                None => {
                    // Index-matched boundary: keep the direction, swap media.
                    medium = medium_after_crossing(object, &n, &d);
                    ray = Ray3f::new(p, d, Some(epsilon), None);
                    crossings += 1;
                    if crossings > MAX_BOUNDARY_CROSSINGS {
                        break;
                    }
                    continue;
                }
            };

            let albedo = scene.diffuse_color(material, &hit.uv());
            let frame = Frame::from_z(n);
            let wi_local = frame.to_local(-d);

            if !material.is_delta() {
                for emitter in scene.emitters() {
                    let es = match emitter.sample_li(&p) {
                        Some(es) => es,
                        None => continue,
                    };
                    let wo_local = frame.to_local(es.direction);
                    let f = material.eval(albedo, wi_local, wo_local).value;
                    if f.is_black() {
                        continue;
                    }
                    let shadow_medium = if wo_local.z * wi_local.z > 0.0 {
                        medium
                    } else {
                        medium_after_crossing(object, &n, &es.direction)
                    };
                    let tr = self.shadow_transmittance(scene, &p, &es, shadow_medium, epsilon, rng);
                    radiance += throughput * f * es.radiance * tr * wo_local.z.abs();
                }
            }

            let record = material.sample(albedo, rng.next_2d(), rng.next_2d(), wi_local);
            if !record.is_valid() {
                break;
            }
            throughput *= record.weight;

            let wo = frame.from_local(record.wo);
            if record.wo.z * wi_local.z < 0.0 {
                medium = medium_after_crossing(object, &n, &wo);
            }
            ray = Ray3f::new(p, wo, Some(epsilon), None);
            depth += 1;
            crossings = 0;

            if throughput.is_black() || !self.survives_roulette(depth, &mut throughput, rng) {
                break;
            }
        }

        radiance
    }

    fn survives_roulette(&self, depth: u32, throughput: &mut RGBSpectrum, rng: &mut LcgRng) -> bool {
        if depth < self.settings.rr_start_depth {
            return true;
        }
        let survival = throughput.max_component().min(1.0);
        let q = (1.0 - survival).max(RR_MIN_KILL);
        if rng.next_f32() < q {
            return false;
        }
        *throughput /= 1.0 - q;
        true
    }

    /// Visibility times medium transmittance toward an emitter. Index-matched
    /// boundaries are crossed; any other surface occludes.
    fn shadow_transmittance(&self,
                            scene: &Scene,
                            origin: &Vector3f,
                            es: &EmitterSample,
                            mut medium: Option<usize>,
                            epsilon: Float,
                            rng: &mut LcgRng) -> RGBSpectrum {
        let mut tr = RGBSpectrum::ones();
        let mut o = *origin;
        let mut remaining = es.distance;

        for _ in 0..MAX_BOUNDARY_CROSSINGS {
            let ray = Ray3f::new(o, es.direction, Some(epsilon), Some(remaining));
            let hit = scene.intersect(&ray);

            if let Some(medium_idx) = medium {
                let segment_end = hit.as_ref().map(|h| h.t()).unwrap_or(remaining);
                tr *= scene.medium(medium_idx).transmittance(&ray.with_max_t(segment_end), rng);
                if tr.is_black() {
                    return tr;
                }
            }

            let hit = match hit {
                Some(hit) => hit,
                None => return tr,
            };
            let object = scene.object(hit.object());
            if object.material.is_some() {
                return RGBSpectrum::default();
            }
            medium = medium_after_crossing(object, &hit.geo_normal(), &es.direction);
            o = hit.p();
            remaining -= hit.t();
        }

        RGBSpectrum::default()
    }
}

fn medium_after_crossing(object: &SceneObject, n: &Vector3f, dir: &Vector3f) -> Option<usize> {
    if dir.dot(n) < 0.0 {
        object.interior_medium
    } else {
        None
    }
}
