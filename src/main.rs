use std::{
    env,
    fs::File,
    io::{self, BufReader},
    process,
};

use log::{error, info};
use spmd_mandelbrot::{
    analysis::{read_reports, Speedups},
    bench::{Benchmark, Registry, Runner},
    clock::HardwareCounter,
    config::Config,
    error::{Error, Result},
    scalar,
    screen::{Frame, Grid, Viewport},
    spmd, vectorized,
};

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        None => benchmark(),
        Some("analyse") => analyse(args.next()),
        Some(other) => Err(Error::InvalidConfig {
            key: "command",
            value: other.to_owned(),
        }),
    }
}

fn benchmark() -> Result<()> {
    let config = Config::from_env()?;
    let dispatcher = config.dispatch.create()?;
    let grid = Grid::new(Viewport::default());

    let registry = Registry::builder()
        .register(
            Benchmark::new("mandelbrot", |frame: &mut Frame| {
                scalar::fill_frame(&grid, frame)
            })
            .with_spmd(|frame: &mut Frame| spmd::fill_frame(&dispatcher, &grid, frame))
            .with_vectorized(|frame: &mut Frame| vectorized::fill_frame(&grid, frame)),
        )
        .build()?;

    let runner = Runner::new(HardwareCounter::new(), config.runs)?;
    let mut frame = grid.frame();
    let reports = runner.run(&registry, &mut frame, &mut io::stdout().lock())?;

    for report in &reports {
        info!("{}", Speedups::from(report));
    }

    Ok(())
}

/// Prints speedups for the report lines in `path`, or in stdin.
fn analyse(path: Option<String>) -> Result<()> {
    let reports = match path {
        Some(path) => read_reports(BufReader::new(File::open(path)?))?,
        None => read_reports(io::stdin().lock())?,
    };

    for report in &reports {
        println!("{}", Speedups::from(report));
    }

    Ok(())
}
