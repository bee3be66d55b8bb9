use anyhow::Result;
use clap::Parser;

/// Takes no arguments: the icon set, colors and output paths are fixed.
#[derive(Debug, Parser)]
#[clap(
    name = "cg-icons",
    version,
    about = "Generate the placeholder CG extension icons into ./assets"
)]
struct Args {}

fn main() -> Result<()> {
    env_logger::init();
    let _args = Args::parse();

    run()
}

#[cfg(feature = "render")]
fn run() -> Result<()> {
    cg_icons::icon_gen::generate_icons(&cg_icons::config::ICON_SPECS)
}

#[cfg(not(feature = "render"))]
fn run() -> Result<()> {
    use cg_icons::bootstrap::{bootstrap, CargoInstaller};

    bootstrap(&CargoInstaller::default(), &mut std::io::stdout().lock())
}
