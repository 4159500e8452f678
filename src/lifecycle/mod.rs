//! Process lifecycle handling

mod shutdown;

pub use shutdown::ShutdownSignal;
