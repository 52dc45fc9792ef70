//! Command line renderer for the ray tracer and the Newton fractal.
//!
//! Usage: raster <trace|newton> <output.png> [job.json]

use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use raster_core::{RequestSequence, StalenessFilter};
use raster_fractal::{FractalResult, NewtonProducer};
use raster_tracer::{RayTracerProducer, TraceResult};

mod config;
mod output;

use config::{NewtonJob, TraceJob};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <trace|newton> <output.png> [job.json]", args[0]);
        std::process::exit(1);
    }

    let output = PathBuf::from(&args[2]);
    let job_path = args.get(3).map(|s| Path::new(s.as_str()));

    match args[1].as_str() {
        "trace" => run_trace(config::load(job_path)?, &output),
        "newton" => run_newton(config::load(job_path)?, &output),
        other => bail!("unknown mode {:?}, expected 'trace' or 'newton'", other),
    }
}

fn run_trace(job: TraceJob, output: &Path) -> Result<()> {
    let producer = RayTracerProducer::new(job.scene(), &job.bands)?;
    let requests = RequestSequence::new();
    let mut filter = StalenessFilter::new();
    let (tx, rx) = mpsc::channel::<TraceResult>();

    let request = job.request(requests.next());
    filter.observe(request.request_no);
    producer.produce(&request, &tx)?;

    let result = rx.recv().context("ray tracer delivered no result")?;
    if !filter.admit(result.request_no) {
        bail!("received stale result {}", result.request_no);
    }

    output::trace_image(&result)
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!("Saved {}x{} image to {}", result.width, result.height, output.display());
    Ok(())
}

fn run_newton(job: NewtonJob, output: &Path) -> Result<()> {
    let producer = NewtonProducer::new(job.roots()?, job.newton, job.split)?;
    let requests = RequestSequence::new();
    let mut filter = StalenessFilter::new();
    let (tx, rx) = mpsc::channel::<FractalResult>();

    let request = job.request(requests.next());
    filter.observe(request.request_no);
    producer.produce(&request, &tx)?;

    let result = rx.recv().context("fractal engine delivered no result")?;
    if !filter.admit(result.request_no) {
        bail!("received stale result {}", result.request_no);
    }

    output::fractal_image(&result)
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!(
        "Saved {}x{} fractal ({} roots) to {}",
        result.width,
        result.height,
        result.palette_size - 1,
        output.display()
    );
    Ok(())
}
