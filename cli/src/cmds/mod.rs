use crate::{App, Result};

mod apply_payload;
mod find_repo;
mod init;
mod remote_refs;
mod show_ref;

pub(crate) fn add_subcommands<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
    app.subcommand(apply_payload::subcommand())
        .subcommand(init::subcommand())
        .subcommand(remote_refs::subcommand())
        .subcommand(show_ref::subcommand())
}

pub(crate) fn dispatch(app: &mut App) -> Result<()> {
    let matches = app.arg_matches.clone();
    // ^^ Need an independent copy of matches so we can still pass
    // the App struct through to subcommand imps.

    match matches.subcommand() {
        ("apply-payload", Some(m)) => apply_payload::run(app, &m),
        ("init", Some(m)) => init::run(app, &m),
        ("remote-refs", Some(m)) => remote_refs::run(app, &m),
        ("show-ref", Some(m)) => show_ref::run(app, &m),
        _ => unreachable!(),
        // unreachable: Should have exited out with appropriate help or
        // error message if no subcommand was given.
    }
}
