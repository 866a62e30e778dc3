//! List command handler.

use crate::config::Config;
use crate::error::Result;
use crate::output::print_targets;

/// Print the configured targets: `global`, then each process name.
pub fn list_command(config: &Config) -> Result<()> {
    print_targets(&config.targets());
    Ok(())
}
