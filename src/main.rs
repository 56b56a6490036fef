// Copyright 2020 TwoCookingMice

use macaron::core::material::Material;
use macaron::core::medium::Medium;
use macaron::core::scene::{Scene, SceneObject};
use macaron::core::texture::Texture;
use macaron::emitters::directional::DirectionalEmitter;
use macaron::emitters::point::PointEmitter;
use macaron::io::exr_utils;
use macaron::math::aabb::AABB;
use macaron::math::constants::{Float, Vector3f};
use macaron::math::spectrum::RGBSpectrum;
use macaron::media::density_grid::DensityGrid;
use macaron::media::heterogeneous_medium::HeterogeneousMedium;
use macaron::media::homogeneous_medium::HomogeneousMedium;
use macaron::sensors::perspective::PerspectiveCamera;
use macaron::shapes::cuboid::Cuboid;
use macaron::shapes::sphere::Sphere;
use macaron::{PathTracer, RenderSettings, Result};

use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::sync::Arc;

const RAY_EPSILON: Float = 1e-4;
const DENSITY_MAX_ITERATIONS: u32 = 1024;

struct CliOptions {
    output_path: String,
    iterations: u32,
    width: usize,
    height: usize,
    texture: Option<String>,
    density: Option<(String, usize, usize, usize)>,
    settings: RenderSettings,
}

fn parse_args(args: &[String]) -> Option<CliOptions> {
    let output_path = args.get(1)?.clone();
    let mut options = CliOptions {
        output_path,
        iterations: 16,
        width: 256,
        height: 256,
        texture: None,
        density: None,
        settings: RenderSettings::default(),
    };

    let parse_at = |i: usize| args.get(i).and_then(|v| v.parse::<usize>().ok());
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" => {
                i += 1;
                options.iterations = parse_at(i).map(|v| v as u32).unwrap_or(options.iterations);
            }
            "--max-depth" => {
                i += 1;
                let depth = parse_at(i).map(|v| v as u32).unwrap_or(options.settings.max_depth);
                options.settings = options.settings.with_max_depth(depth);
            }
            "--seed" => {
                i += 1;
                let seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
                options.settings = options.settings.with_seed(seed);
            }
            "--width" => {
                i += 1;
                options.width = parse_at(i).unwrap_or(options.width);
            }
            "--height" => {
                i += 1;
                options.height = parse_at(i).unwrap_or(options.height);
            }
            "--threads" => {
                i += 1;
                let threads = parse_at(i).unwrap_or(options.settings.threads);
                options.settings = options.settings.with_threads(threads);
            }
            "--no-jitter" => {
                options.settings = options.settings.with_jitter(false);
            }
            "--texture" => {
                i += 1;
                options.texture = args.get(i).cloned();
            }
            "--density" => {
                let path = args.get(i + 1).cloned();
                let dims = (parse_at(i + 2), parse_at(i + 3), parse_at(i + 4));
                if let (Some(path), (Some(nx), Some(ny), Some(nz))) = (path, dims) {
                    options.density = Some((path, nx, ny, nz));
                } else {
                    log::warn!("--density expects <file> <nx> <ny> <nz>, ignoring.");
                }
                i += 4;
            }
            other => log::warn!("Ignoring unknown argument {}.", other),
        }
        i += 1;
    }

    Some(options)
}

/// Floor, three spheres showing off the reflectance models, and a fog box.
fn build_demo_scene(options: &CliOptions) -> Result<Scene> {
    let mut scene = Scene::new();

    let mut floor_material = Material::lambertian(RGBSpectrum::new(0.6, 0.6, 0.55));
    if let Some(path) = &options.texture {
        let texture = scene.add_texture(Texture::load(path)?);
        floor_material = floor_material.with_texture(texture);
    }
    let floor = scene.add_material(floor_material)?;
    let copper = scene.add_material(Material::rough_conductor(
        0.2, 0.2, RGBSpectrum::new(0.200, 0.924, 1.102), RGBSpectrum::new(3.912, 2.452, 2.142)))?;
    let glass = scene.add_material(Material::dielectric(1.5, 1.0))?;
    let plastic = scene.add_material(Material::substrate(
        RGBSpectrum::new(0.1, 0.3, 0.7), RGBSpectrum::ones(), 0.1, 0.1))?;

    scene.add_object(SceneObject::new(
        Arc::new(Cuboid::new(Vector3f::new(-6.0, -1.1, -6.0), Vector3f::new(6.0, -1.0, 6.0))?), Some(floor))
        .with_name("floor"))?;
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(-2.2, 0.0, 0.5), 1.0)?), Some(copper))
        .with_name("copper"))?;
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, 0.0), 1.0)?), Some(glass))
        .with_name("glass"))?;
    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(2.2, 0.0, 0.5), 1.0)?), Some(plastic))
        .with_name("plastic"))?;

    let fog_min = Vector3f::new(-1.0, -1.0, 2.0);
    let fog_max = Vector3f::new(1.0, 1.0, 4.0);
    let medium = match &options.density {
        Some((path, nx, ny, nz)) => {
            let grid = DensityGrid::from_file(path, *nx, *ny, *nz)?;
            let inner = HeterogeneousMedium::new(RGBSpectrum::splat(0.1), RGBSpectrum::splat(2.0), grid,
                                                 AABB::new(fog_min, fog_max), DENSITY_MAX_ITERATIONS)?;
            Medium::heterogeneous(inner, 0.3)?
        }
        None => Medium::homogeneous(HomogeneousMedium::new(RGBSpectrum::splat(0.05), RGBSpectrum::splat(0.8))?, 0.3)?,
    };
    let fog = scene.add_medium(medium);
    scene.add_object(SceneObject::new(Arc::new(Cuboid::new(fog_min, fog_max)?), None)
        .with_name("fog")
        .with_interior_medium(Some(fog)))?;

    scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, 4.0, -2.0), 0.3)?), None)
        .with_emission(RGBSpectrum::splat(20.0))
        .with_name("lamp"))?;
    scene.add_emitter(Box::new(PointEmitter::new_with(Vector3f::new(0.0, 4.0, -2.0), RGBSpectrum::splat(40.0))));
    scene.add_emitter(Box::new(DirectionalEmitter::new_with(Vector3f::new(-0.3, -1.0, 0.4), RGBSpectrum::splat(0.8))));

    Ok(scene)
}

fn run(options: &CliOptions) -> Result<()> {
    let scene = build_demo_scene(options)?;
    let aspect = options.width as Float / options.height.max(1) as Float;
    let camera = PerspectiveCamera::new(Vector3f::new(0.0, 1.5, -7.0), Vector3f::new(0.0, 0.0, 0.0),
                                        Vector3f::new(0.0, 1.0, 0.0), 0.7, aspect)?;

    let (width, height) = (options.width, options.height);
    let mut tracer = PathTracer::new(options.settings.clone());
    tracer.begin_render(&scene, width, height, RAY_EPSILON);

    let progress = ProgressBar::new(options.iterations as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} iterations")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut output = vec![Vector3f::zeros(); width * height];
    for iteration in 0..options.iterations {
        tracer.render(&scene, width, height, &camera, iteration, iteration == 0, &mut output)?;
        progress.inc(1);
    }
    progress.finish_and_clear();
    tracer.end_render();

    exr_utils::write_exr_to_file(&output, width, height, &options.output_path)
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Some(options) => options,
        None => {
            eprintln!("Usage: {} <output.exr> [--iterations N] [--max-depth N] [--seed N] [--width N] [--height N] \
                       [--threads N] [--no-jitter] [--texture FILE] [--density FILE NX NY NZ]",
                      args.first().map(String::as_str).unwrap_or("macaron"));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
