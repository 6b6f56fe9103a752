mod analysis;
mod conditions;
mod report;

use analysis::run_analysis;
use conditions::build_bar;
use env_logger::Env;
use report::render_summary;
use std::error::Error;
use truss1d::{BoundaryConditionKind, TrussConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // An optional JSON file overrides the built-in bar problem.
    let config = match std::env::args().nth(1) {
        Some(path) => TrussConfig::from_path(path)?,
        None => TrussConfig::default(),
    };

    // The same bar is solved once per end condition: a prescribed stretch and
    // an axial point load. Each follows Hooke's law, see
    // https://en.wikipedia.org/wiki/Hooke%27s_law.
    for kind in BoundaryConditionKind::ALL {
        let (mut truss, ends) = build_bar(&config, kind)?;
        let summary = run_analysis(&mut truss, &ends, kind)?;
        println!("{}", render_summary(&summary));
    }

    Ok(())
}
