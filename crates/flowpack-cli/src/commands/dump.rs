use std::fs;
use std::path::PathBuf;

use flowpack_core::Colors;

use super::{CliError, fail};

pub struct DumpArgs {
    pub blob: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    match render(&args) {
        Ok(text) => print!("{}", text),
        Err(err) => fail(err),
    }
}

pub fn render(args: &DumpArgs) -> Result<String, CliError> {
    let blob = fs::read(&args.blob).map_err(|source| CliError::Read {
        path: args.blob.clone(),
        source,
    })?;
    log::debug!("dumping `{}` ({} bytes)", args.blob.display(), blob.len());
    Ok(flowpack_format::dump(&blob, Colors::new(args.color))?)
}
