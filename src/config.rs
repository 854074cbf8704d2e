use std::env;

use log::debug;

use crate::{
    dispatch::{Dispatcher, RayonDispatch, Sequential},
    error::{Error, Result},
};

pub const RUNS_VAR: &str = "MANDELBROT_BENCH_RUNS";
pub const DISPATCH_VAR: &str = "MANDELBROT_BENCH_DISPATCH";

/// Each variant is timed this many times unless overridden.
pub const DEFAULT_RUNS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchKind {
    Sequential,
    Rayon,
}

impl DispatchKind {
    pub fn create(self) -> Result<Dispatcher> {
        Ok(match self {
            DispatchKind::Sequential => Dispatcher::Sequential(Sequential),
            DispatchKind::Rayon => Dispatcher::Rayon(RayonDispatch::new()?),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub runs: usize,
    pub dispatch: DispatchKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runs: DEFAULT_RUNS,
            dispatch: DispatchKind::Rayon,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        debug!("config: {:?}", config);
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup(RUNS_VAR) {
            config.runs = match value.trim().parse::<usize>() {
                Ok(0) => return Err(Error::NoRuns),
                Ok(runs) => runs,
                Err(_) => {
                    return Err(Error::InvalidConfig {
                        key: RUNS_VAR,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(DISPATCH_VAR) {
            let kind = match value.trim() {
                "sequential" => Some(DispatchKind::Sequential),
                "rayon" => Some(DispatchKind::Rayon),
                _ => None,
            };
            config.dispatch = kind.ok_or(Error::InvalidConfig {
                key: DISPATCH_VAR,
                value,
            })?;
        }

        Ok(config)
    }
}
