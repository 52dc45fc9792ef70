//! Rayon pool whose worker threads are joined when it is dropped.

use std::thread::JoinHandle;

use crate::RenderResult;

/// A rayon [`ThreadPool`](rayon::ThreadPool) that owns its worker threads.
///
/// Dropping a plain rayon pool only asks the workers to stop. Dropping a
/// `JoinedPool` returns once every worker has exited.
pub struct JoinedPool {
    pool: rayon::ThreadPool,
    // Dropped after `pool`, which is what lets the workers finish.
    threads: WorkerThreads,
}

impl JoinedPool {
    /// Build a pool of `workers` threads named `{prefix}-{index}`.
    pub fn build(workers: usize, prefix: &'static str) -> RenderResult<Self> {
        let mut handles = Vec::with_capacity(workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("{}-{}", prefix, i))
            .spawn_handler(|thread| {
                let mut builder = std::thread::Builder::new();
                if let Some(name) = thread.name() {
                    builder = builder.name(name.to_owned());
                }
                if let Some(stack_size) = thread.stack_size() {
                    builder = builder.stack_size(stack_size);
                }
                handles.push(builder.spawn(|| thread.run())?);
                Ok(())
            })
            .build()?;

        Ok(Self {
            pool,
            threads: WorkerThreads(handles),
        })
    }

    pub fn pool(&self) -> &rayon::ThreadPool {
        &self.pool
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.threads.0.len()
    }
}

struct WorkerThreads(Vec<JoinHandle<()>>);

impl Drop for WorkerThreads {
    fn drop(&mut self) {
        for handle in self.0.drain(..) {
            if handle.join().is_err() {
                log::warn!("Worker thread panicked during shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Live threads of this process whose name starts with `prefix`.
    #[cfg(target_os = "linux")]
    fn live_threads(prefix: &str) -> usize {
        std::fs::read_dir("/proc/self/task")
            .unwrap()
            .filter_map(|entry| std::fs::read_to_string(entry.ok()?.path().join("comm")).ok())
            .filter(|name| name.trim_end().starts_with(prefix))
            .count()
    }

    #[test]
    fn test_pool_runs_work() {
        let pool = JoinedPool::build(3, "joined-run").unwrap();
        assert_eq!(pool.workers(), 3);
        assert_eq!(pool.pool().current_num_threads(), 3);
        assert_eq!(pool.pool().install(|| rayon::join(|| 1, || 2)), (1, 2));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_drop_joins_worker_threads() {
        let pool = JoinedPool::build(8, "joined-drop").unwrap();
        // Every worker has started (and named itself) once it ran a broadcast.
        assert_eq!(pool.pool().broadcast(|ctx| ctx.index()).len(), 8);
        assert_eq!(live_threads("joined-drop"), 8);

        drop(pool);
        // A joined thread can still be listed for a moment while the kernel reaps it.
        let mut remaining = live_threads("joined-drop");
        for _ in 0..20 {
            if remaining == 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
            remaining = live_threads("joined-drop");
        }
        assert_eq!(remaining, 0);
    }
}
