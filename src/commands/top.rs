//! Top and cores command handlers.

use crate::error::Result;
use crate::output::{print_core_info, print_top_processes};
use crate::process::SysinfoProbe;
use crate::top::{core_info, measure, top_processes, SortKey};

/// Print the `count` busiest processes ranked by `key`.
pub fn top_command(count: usize, key: SortKey) -> Result<()> {
    let mut probe = SysinfoProbe::new();
    measure(&mut probe);
    print_top_processes(&top_processes(&probe, count, key));
    Ok(())
}

/// Print core counts and overall CPU usage.
pub fn cores_command() -> Result<()> {
    let mut probe = SysinfoProbe::new();
    measure(&mut probe);
    print_core_info(&core_info(&probe)?);
    Ok(())
}
