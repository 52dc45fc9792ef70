//! JSON job descriptions for the command line renderer.

use std::path::Path;

use anyhow::{Context, Result};
use raster_core::{BandConfig, SplitConfig};
use raster_fractal::{Complex, ComplexRootedPolynomial, FractalRequest, NewtonConfig};
use raster_tracer::{Color, Phong, Point3, PointLight, Scene, Sphere, TraceRequest};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Load a job from `path`, or use the defaults when no path is given.
pub fn load<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SphereConfig {
    pub center: [f64; 3],
    pub radius: f64,
    pub diffuse: [f64; 3],
    pub reflective: [f64; 3],
    pub shininess: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    pub position: [f64; 3],
    pub intensity: [f64; 3],
}

/// Ray tracer job. A job with neither spheres nor lights selects the demo scene.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraceJob {
    pub eye: [f64; 3],
    pub view: [f64; 3],
    pub view_up: [f64; 3],
    pub horizontal: f64,
    pub vertical: f64,
    pub width: usize,
    pub height: usize,
    pub spheres: Vec<SphereConfig>,
    pub lights: Vec<LightConfig>,
    pub bands: BandConfig,
}

impl Default for TraceJob {
    fn default() -> Self {
        Self {
            eye: [10.0, 0.0, 0.0],
            view: [0.0, 0.0, 0.0],
            view_up: [0.0, 0.0, 10.0],
            horizontal: 20.0,
            vertical: 20.0,
            width: 800,
            height: 800,
            spheres: Vec::new(),
            lights: Vec::new(),
            bands: BandConfig::default(),
        }
    }
}

impl TraceJob {
    pub fn scene(&self) -> Scene {
        if self.spheres.is_empty() && self.lights.is_empty() {
            return Scene::demo();
        }
        if self.spheres.is_empty() {
            log::warn!("Trace job has {} lights but no spheres", self.lights.len());
        }

        let scene = self.spheres.iter().fold(Scene::new(), |scene, s| {
            scene.with_object(Sphere::new(
                Point3::from_array(s.center),
                s.radius,
                Phong::new(Color::from_array(s.diffuse), Color::from_array(s.reflective), s.shininess),
            ))
        });
        self.lights.iter().fold(scene, |scene, l| {
            scene.with_light(PointLight::new(Point3::from_array(l.position), Color::from_array(l.intensity)))
        })
    }

    pub fn request(&self, request_no: u64) -> TraceRequest {
        TraceRequest {
            eye: Point3::from_array(self.eye),
            view: Point3::from_array(self.view),
            view_up: Point3::from_array(self.view_up),
            horizontal: self.horizontal,
            vertical: self.vertical,
            width: self.width,
            height: self.height,
            request_no,
        }
    }
}

/// Newton fractal job. Roots use the complex-number text syntax (`"1"`, `"-i"`, `"0.5+i2"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewtonJob {
    pub roots: Vec<String>,
    pub re_min: f64,
    pub re_max: f64,
    pub im_min: f64,
    pub im_max: f64,
    pub width: usize,
    pub height: usize,
    pub newton: NewtonConfig,
    pub split: SplitConfig,
}

impl Default for NewtonJob {
    fn default() -> Self {
        Self {
            roots: ["1", "-1", "i", "-i"].iter().map(|s| s.to_string()).collect(),
            re_min: -2.0,
            re_max: 2.0,
            im_min: -2.0,
            im_max: 2.0,
            width: 800,
            height: 800,
            newton: NewtonConfig::default(),
            split: SplitConfig::default(),
        }
    }
}

impl NewtonJob {
    pub fn roots(&self) -> Result<ComplexRootedPolynomial> {
        let roots = self
            .roots
            .iter()
            .map(|text| Complex::parse(text).with_context(|| format!("root {:?}", text)))
            .collect::<Result<Vec<_>>>()?;
        Ok(ComplexRootedPolynomial::new(roots)?)
    }

    pub fn request(&self, request_no: u64) -> FractalRequest {
        FractalRequest {
            re_min: self.re_min,
            re_max: self.re_max,
            im_min: self.im_min,
            im_max: self.im_max,
            width: self.width,
            height: self.height,
            request_no,
        }
    }
}
