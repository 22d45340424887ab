//! `msgkit` command-line entry point

fn main() -> anyhow::Result<()> {
    msgkit::cli::run_cli()
}
