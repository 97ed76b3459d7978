use std::io::Write;

use clap::{Arg, ArgMatches, SubCommand};
use strata_core::repo::RemoteRefLog;

use super::find_repo;
use crate::{App, Result};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("remote-refs")
        .about("Show the last head fetched from each peer branch into a local branch")
        .arg(
            Arg::with_name("branch")
                .required(true)
                .help("The local branch whose remote-ref log to show"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let branch = matches.value_of("branch").unwrap();
    let repo = find_repo::from_current_dir()?;

    for (remote_branch, id) in repo.remote_refs(branch)? {
        writeln!(app, "{}\t{}", id, remote_branch)?;
    }

    Ok(())
}
