//! Process resolution and resource sampling.
//!
//! This module turns a [`Target`](crate::target::Target) into a reading:
//! the resolver maps process names to live PIDs, the sampler reads CPU and
//! memory usage through a [`SystemProbe`].

mod probe;
mod resolver;
mod sampler;

pub use probe::{ProcessEntry, SysinfoProbe, SystemProbe, Usage};
pub use resolver::{ProcessHandle, ProcessResolver};
pub use sampler::{sample, Sample, SampleStatus};
