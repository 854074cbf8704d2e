/*!
Benchmark registry and runner.

A [`Registry`] is validated once by [`RegistryBuilder::build`] and is read-only
afterwards. The [`Runner`] walks it in registration order, times every variant a
benchmark provides (scalar, then SPMD, then vectorized) and writes one report line
per benchmark:

```text
bench:mandelbrot, 123456, 45678, 12345
```
*/

use std::{fmt, hint::black_box, io::Write};

use fnv::FnvHashSet;
use log::debug;

use crate::{
    clock::{CycleCounter, Timer},
    error::{Error, Result},
    screen::Frame,
};

/// One way of filling the frame.
pub type Entry<'a> = Box<dyn Fn(&mut Frame) + 'a>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Scalar,
    Spmd,
    Vectorized,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Scalar => "scalar",
            Variant::Spmd => "spmd",
            Variant::Vectorized => "vectorized",
        })
    }
}

pub struct Benchmark<'a> {
    name: String,
    scalar: Entry<'a>,
    spmd: Option<Entry<'a>>,
    vectorized: Option<Entry<'a>>,
}

impl<'a> Benchmark<'a> {
    pub fn new(name: impl Into<String>, scalar: impl Fn(&mut Frame) + 'a) -> Self {
        Self {
            name: name.into(),
            scalar: Box::new(scalar),
            spmd: None,
            vectorized: None,
        }
    }

    pub fn with_spmd(mut self, spmd: impl Fn(&mut Frame) + 'a) -> Self {
        self.spmd = Some(Box::new(spmd));
        self
    }

    pub fn with_vectorized(mut self, vectorized: impl Fn(&mut Frame) + 'a) -> Self {
        self.vectorized = Some(Box::new(vectorized));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Present variants, in report order.
    pub fn variants(&self) -> impl Iterator<Item = (Variant, &Entry<'a>)> {
        [
            Some((Variant::Scalar, &self.scalar)),
            self.spmd.as_ref().map(|entry| (Variant::Spmd, entry)),
            self.vectorized.as_ref().map(|entry| (Variant::Vectorized, entry)),
        ]
        .into_iter()
        .flatten()
    }
}

pub struct Registry<'a> {
    benchmarks: Vec<Benchmark<'a>>,
}

impl<'a> Registry<'a> {
    pub fn builder() -> RegistryBuilder<'a> {
        RegistryBuilder {
            benchmarks: Vec::new(),
        }
    }

    pub fn benchmarks(&self) -> &[Benchmark<'a>] {
        &self.benchmarks
    }
}

pub struct RegistryBuilder<'a> {
    benchmarks: Vec<Benchmark<'a>>,
}

impl<'a> RegistryBuilder<'a> {
    pub fn register(mut self, benchmark: Benchmark<'a>) -> Self {
        self.benchmarks.push(benchmark);
        self
    }

    pub fn build(self) -> Result<Registry<'a>> {
        validate(&self.benchmarks)?;
        Ok(Registry {
            benchmarks: self.benchmarks,
        })
    }
}

fn validate(benchmarks: &[Benchmark<'_>]) -> Result<()> {
    if benchmarks.is_empty() {
        return Err(Error::EmptyRegistry);
    }

    let mut names = FnvHashSet::default();
    for benchmark in benchmarks {
        let name = benchmark.name();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        if name.contains(',') || name.chars().any(char::is_control) {
            return Err(Error::InvalidName(name.to_owned()));
        }
        if !names.insert(name) {
            return Err(Error::DuplicateBenchmark(name.to_owned()));
        }
        if benchmark.vectorized.is_some() && benchmark.spmd.is_none() {
            return Err(Error::VectorizedWithoutSpmd(name.to_owned()));
        }
    }

    Ok(())
}

/// Elapsed cycles of every variant of one benchmark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub name: String,
    pub scalar: u64,
    pub spmd: Option<u64>,
    pub vectorized: Option<u64>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bench:{}, {}", self.name, self.scalar)?;
        for cycles in self.spmd.iter().chain(&self.vectorized) {
            write!(f, ", {}", cycles)?;
        }
        Ok(())
    }
}

pub struct Runner<C> {
    timer: Timer<C>,
    runs: usize,
}

impl<C: CycleCounter> Runner<C> {
    pub fn new(counter: C, runs: usize) -> Result<Self> {
        if runs == 0 {
            return Err(Error::NoRuns);
        }
        Ok(Self {
            timer: Timer::new(counter),
            runs,
        })
    }

    /// Fewest cycles `entry` took over all runs. Each run overwrites `frame`.
    fn measure(&self, name: &str, variant: Variant, entry: &Entry<'_>, frame: &mut Frame) -> u64 {
        let mut samples = Vec::with_capacity(self.runs);
        for _ in 0..self.runs {
            samples.push(self.timer.time(|| {
                entry(black_box(&mut *frame));
                black_box(&*frame);
            }));
        }
        debug!("{} {} cycles: {:?}", name, variant, samples);
        samples.into_iter().min().unwrap_or_default()
    }

    pub fn run<W: Write>(
        &self,
        registry: &Registry<'_>,
        frame: &mut Frame,
        out: &mut W,
    ) -> Result<Vec<Report>> {
        let mut reports = Vec::with_capacity(registry.benchmarks().len());

        for benchmark in registry.benchmarks() {
            let name = benchmark.name();
            let mut report = Report {
                name: name.to_owned(),
                scalar: 0,
                spmd: None,
                vectorized: None,
            };
            for (variant, entry) in benchmark.variants() {
                let cycles = self.measure(name, variant, entry, frame);
                match variant {
                    Variant::Scalar => report.scalar = cycles,
                    Variant::Spmd => report.spmd = Some(cycles),
                    Variant::Vectorized => report.vectorized = Some(cycles),
                }
            }

            writeln!(out, "{}", report)?;
            reports.push(report);
        }

        out.flush()?;
        Ok(reports)
    }
}
