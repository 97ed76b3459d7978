use std::io::Write;

use clap::{Arg, ArgMatches, SubCommand};
use strata_core::repo::RefStore;

use super::find_repo;
use crate::{App, Result};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("show-ref")
        .about("List refs in the current repository")
        .arg(
            Arg::with_name("kind")
                .long("kind")
                .help("Also show what kind of object each ref points at"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let repo = find_repo::from_current_dir()?;
    let show_kind = matches.is_present("kind");

    for r in repo.refs()? {
        if show_kind {
            writeln!(app, "{} {} {}", r.id(), r.kind(), r.name())?;
        } else {
            writeln!(app, "{} {}", r.id(), r.name())?;
        }
    }

    Ok(())
}
