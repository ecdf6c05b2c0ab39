//! Process lifecycle: cooperative shutdown on interrupt.

mod shutdown;


pub use shutdown::{ShutdownSignal, SignalResponse};
