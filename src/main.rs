//! layered-conf: resolve configuration from a YAML file, environment
//! variables and command-line flags.

use anyhow::Result;

fn main() -> Result<()> {
    layered_conf::cli::run()
}
