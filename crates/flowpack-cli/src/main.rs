mod cli;
mod commands;

use cli::{BuildParams, CheckParams, DumpParams, build_cli, init_logging};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(&matches);

    match matches.subcommand() {
        Some(("build", m)) => {
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
