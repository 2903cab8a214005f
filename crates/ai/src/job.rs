use crate::result::AdviceError;
use crate::scheduler::WorkerPool;

/// A self-contained advice computation over one batch of records.
///
/// Jobs own the record snapshot they run on. This crate stays
/// storage-agnostic: inputs are loaded by callers (infra/api).
pub trait AdviceJob: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Execute the job, fanning per-record work out over `pool`.
    ///
    /// Must not mutate its input. Output is all-or-nothing.
    fn run(&self, pool: WorkerPool) -> Result<Self::Output, AdviceError>;
}
