use std::{
    fs,
    io::{Read, Write},
};

use clap::{Arg, ArgMatches, SubCommand};
use strata_core::fetch::{ApplyOptions, BranchRefMode, FetchEvent, PayloadApplier};

use super::find_repo;
use crate::{payload_file, App, Result};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("apply-payload")
        .about("Merge a payload received from a peer into a local branch")
        .arg(
            Arg::with_name("branch")
                .required(true)
                .help("The local branch to apply the payload to"),
        )
        .arg(
            Arg::with_name("file")
                .required(true)
                .help("JSON payload file, or - to read it from standard input"),
        )
        .arg(
            Arg::with_name("verify-ids")
                .long("verify-ids")
                .help("Reject objects whose declared ID doesn't match their content"),
        )
        .arg(
            Arg::with_name("check-objects")
                .long("check-objects")
                .help("Reject structurally invalid commits and trees"),
        )
        .arg(
            Arg::with_name("branch-refs")
                .long("branch-refs")
                .value_name("MODE")
                .possible_values(&["commits-only", "per-kind", "shared"])
                .default_value("commits-only")
                .help("Which refs inserted trees and blobs move"),
        )
}

pub(crate) fn run(app: &mut App, matches: &ArgMatches) -> Result<()> {
    let branch = matches.value_of("branch").unwrap();
    let file = matches.value_of("file").unwrap();

    let json = if file == "-" {
        let mut json = Vec::new();
        app.stdin.read_to_end(&mut json)?;
        json
    } else {
        fs::read(file)?
    };
    let payload = payload_file::parse(&json)?;

    let branch_refs = matches
        .value_of("branch-refs")
        .unwrap_or("commits-only")
        .parse::<BranchRefMode>()
        .map_err(|_| "invalid --branch-refs mode")?;

    let options = ApplyOptions::new()
        .with_branch_refs(branch_refs)
        .with_verify_ids(matches.is_present("verify-ids"))
        .with_check_objects(matches.is_present("check-objects"));

    let mut repo = find_repo::from_current_dir()?;
    let mut events: Vec<FetchEvent> = Vec::new();
    let result = PayloadApplier::new(&mut repo)
        .with_options(options)
        .with_observer(&mut events)
        .apply(branch, payload.as_ref())?;

    for event in &events {
        if let FetchEvent::RemoteRefUpdated { .. } = event {
            writeln!(app, "{}", event)?;
        }
    }
    writeln!(app, "{}", result)?;

    Ok(())
}
