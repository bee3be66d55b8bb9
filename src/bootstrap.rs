//! Recovery path for binaries built without the `render` feature.
//!
//! Such a binary cannot draw icons. It reinstalls itself with the feature
//! enabled and asks the user to run it again; it never retries generation.

use anyhow::{bail, Context, Result};
use log::info;
use std::{io::Write, path::PathBuf, process::Command};

/// Whether the image drawing capability was compiled in.
pub fn render_available() -> bool {
    cfg!(feature = "render")
}

/// Something that can install the rendering capability.
pub trait Installer {
    /// Human readable form of what `install` runs.
    fn describe(&self) -> String;

    fn install(&self) -> Result<()>;
}

/// Reinstalls this crate through `cargo install` with `--features render`.
#[derive(Debug, Clone)]
pub struct CargoInstaller {
    manifest_dir: PathBuf,
}

impl Default for CargoInstaller {
    fn default() -> Self {
        Self {
            manifest_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        }
    }
}

impl CargoInstaller {
    fn command(&self) -> Command {
        let mut cmd = Command::new("cargo");
        cmd.arg("install")
            .arg("--path")
            .arg(&self.manifest_dir)
            .args(["--features", "render"]);
        cmd
    }
}

impl Installer for CargoInstaller {
    fn describe(&self) -> String {
        format!(
            "cargo install --path {} --features render",
            self.manifest_dir.display()
        )
    }

    fn install(&self) -> Result<()> {
        let status = self
            .command()
            .status()
            .context("Failed to run cargo install")?;

        if !status.success() {
            bail!("cargo install exited with {}", status);
        }
        Ok(())
    }
}

/// Install the rendering capability and tell the user to run the binary again.
/// Installation errors propagate; success is not verified beyond the exit status.
pub fn bootstrap<W: Write>(installer: &dyn Installer, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Image rendering support (image, rusttype) is not built in. Installing..."
    )?;
    out.flush()?;

    info!("running {}", installer.describe());
    installer.install()?;

    writeln!(out, "Please run {} again.", env!("CARGO_PKG_NAME"))?;
    Ok(())
}
