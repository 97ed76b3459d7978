use std::{io::Write, path::Path};

use clap::{Arg, ArgMatches, SubCommand};
use strata_on_disk::OnDiskRepo;

use crate::{App, Result};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("init")
        .about("Create an empty strata repository")
        .arg(
            Arg::with_name("directory")
                .required(true)
                .help("The directory to create"),
        )
}

pub(crate) fn run(app: &mut App, init_matches: &ArgMatches) -> Result<()> {
    let dir = init_matches.value_of("directory").unwrap();

    let path = Path::new(dir);
    OnDiskRepo::init(path)?;

    writeln!(
        app,
        "Initialized empty strata repository in {}",
        path.display()
    )?;

    Ok(())
}
