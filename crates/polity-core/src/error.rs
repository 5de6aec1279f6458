use thiserror::Error;

/// Errors that can terminate a tick.
#[derive(Debug, Error)]
pub enum TickError {
    /// The Modifier Kernel rejected a batch the Event Processor or law
    /// lifecycle tried to apply.
    #[error("kernel error: {0}")]
    Kernel(#[from] polity_kernel::KernelError),
}
