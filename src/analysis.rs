//! Speedups between the variants of a report.

use std::{fmt, io::BufRead};

use crate::{
    bench::Report,
    error::{Error, Result},
};

const PREFIX: &str = "bench:";

/// Parses one `bench:` line as written by the runner.
///
/// An empty trailing vectorized field (`bench:x, 1, 2,`) means the benchmark has
/// no vectorized variant.
pub fn parse_report(line: &str) -> Result<Report> {
    let malformed = || Error::MalformedReport(line.to_owned());

    let fields: Vec<&str> = line
        .trim_end()
        .strip_prefix(PREFIX)
        .ok_or_else(malformed)?
        .split(',')
        .map(str::trim)
        .collect();

    let cycles = |field: &&str| field.parse::<u64>().map_err(|_| malformed());
    let (name, scalar, spmd, vectorized) = match fields.as_slice() {
        [name, scalar] => (*name, cycles(scalar)?, None, None),
        [name, scalar, spmd] | [name, scalar, spmd, ""] => {
            (*name, cycles(scalar)?, Some(cycles(spmd)?), None)
        }
        [name, scalar, spmd, vectorized] => (
            *name,
            cycles(scalar)?,
            Some(cycles(spmd)?),
            Some(cycles(vectorized)?),
        ),
        _ => return Err(malformed()),
    };
    if name.is_empty() {
        return Err(malformed());
    }

    Ok(Report {
        name: name.to_string(),
        scalar,
        spmd,
        vectorized,
    })
}

/// Reads every `bench:` line from `input`, skipping everything else.
pub fn read_reports<R: BufRead>(input: R) -> Result<Vec<Report>> {
    let mut reports = Vec::new();
    for line in input.lines() {
        let line = line?;
        if line.starts_with(PREFIX) {
            reports.push(parse_report(&line)?);
        }
    }
    Ok(reports)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Speedups {
    pub name: String,
    pub spmd_over_scalar: Option<f64>,
    pub vectorized_over_scalar: Option<f64>,
    pub spmd_over_vectorized: Option<f64>,
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    numerator as f64 / denominator as f64
}

impl From<&Report> for Speedups {
    fn from(report: &Report) -> Self {
        Self {
            name: report.name.clone(),
            spmd_over_scalar: report.spmd.map(|spmd| ratio(report.scalar, spmd)),
            vectorized_over_scalar: report
                .vectorized
                .map(|vectorized| ratio(report.scalar, vectorized)),
            spmd_over_vectorized: report
                .spmd
                .zip(report.vectorized)
                .map(|(spmd, vectorized)| ratio(vectorized, spmd)),
        }
    }
}

impl fmt::Display for Speedups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        let pairs = [
            ("spmd/scalar", self.spmd_over_scalar),
            ("vectorized/scalar", self.vectorized_over_scalar),
            ("spmd/vectorized", self.spmd_over_vectorized),
        ];
        for (label, speedup) in pairs {
            if let Some(speedup) = speedup {
                write!(f, " {} {:.2}x", label, speedup)?;
            }
        }
        Ok(())
    }
}
