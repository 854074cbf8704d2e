/*!
SPMD dispatch.

A dispatcher runs one kernel invocation per lane. Each invocation gets its lane
index and exclusive access to that lane's output slot; everything else it reads
must be shared and immutable. `dispatch` returns only after every lane has
finished, so callers can treat it as a barrier.

[`Sequential`] loops over the lanes in the calling thread. [`RayonDispatch`]
spreads them over a dedicated [`rayon`] pool of at most [`LANES`] threads;
`pool.install` blocks until the parallel iterator is drained.
*/

use rayon::prelude::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};

use crate::{error::Result, lanes::LANES};

pub trait Dispatch {
    fn dispatch<T, F>(&self, lanes: &mut [T], kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl Dispatch for Sequential {
    fn dispatch<T, F>(&self, lanes: &mut [T], kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        for (lane, slot) in lanes.iter_mut().enumerate() {
            kernel(lane, slot);
        }
    }
}

pub struct RayonDispatch {
    pool: rayon::ThreadPool,
}

impl RayonDispatch {
    pub fn new() -> Result<Self> {
        let threads = num_cpus::get().clamp(1, LANES);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("spmd-lane-{}", index))
            .build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Dispatch for RayonDispatch {
    fn dispatch<T, F>(&self, lanes: &mut [T], kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        self.pool.install(|| {
            lanes
                .par_iter_mut()
                .enumerate()
                .for_each(|(lane, slot)| kernel(lane, slot))
        });
    }
}

/// Dispatcher chosen at startup.
pub enum Dispatcher {
    Sequential(Sequential),
    Rayon(RayonDispatch),
}

impl Dispatch for Dispatcher {
    fn dispatch<T, F>(&self, lanes: &mut [T], kernel: F)
    where
        T: Send,
        F: Fn(usize, &mut T) + Sync,
    {
        match self {
            Dispatcher::Sequential(sequential) => sequential.dispatch(lanes, kernel),
            Dispatcher::Rayon(rayon) => rayon.dispatch(lanes, kernel),
        }
    }
}
