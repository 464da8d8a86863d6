use crate::archive;
use crate::asset::{Asset, PackageManager};
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// What to do with a downloaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallAction {
    /// Hand the file to its package manager.
    PackageInstall(String),
    /// Unpack a plain archive into the requested directory.
    Extract(String),
    /// Nothing further to run; the downloaded file is the result.
    Keep,
}

/// Decide what installing `asset` means, given an optional extraction dir.
pub fn plan_install(asset: &Asset, unzip_to: Option<&str>) -> InstallAction {
    match &asset.package_manager {
        PackageManager::Named(manager) => InstallAction::PackageInstall(manager.clone()),
        PackageManager::None => match unzip_to {
            Some(dir) => InstallAction::Extract(dir.to_string()),
            None => InstallAction::Keep,
        },
    }
}

/// Run the decided action on the downloaded file.
pub fn install_asset(
    asset: &Asset,
    file: &Path,
    unzip_to: Option<&str>,
    files_pattern: Option<&str>,
) -> Result<()> {
    match plan_install(asset, unzip_to) {
        InstallAction::PackageInstall(manager) => install_package(&manager, file),
        InstallAction::Extract(dir) => {
            println!("Extracting to: {dir}");
            archive::extract_archive(file, &dir, files_pattern)
        }
        InstallAction::Keep => {
            println!("Downloaded to: {}", file.display());
            Ok(())
        }
    }
}

/// Install a package file with the package manager that owns its format.
fn install_package(manager: &str, file: &Path) -> Result<()> {
    match manager {
        "dpkg" => {
            println!("Installing with dpkg: {}", file.display());
            let status = Command::new("dpkg")
                .arg("-i")
                .arg(file)
                .status()
                .with_context(|| "Failed to run dpkg")?;
            if !status.success() {
                return Err(anyhow::anyhow!(
                    "dpkg -i failed with exit code: {}",
                    status.code().unwrap_or(-1)
                ));
            }
            Ok(())
        }
        other => Err(anyhow::anyhow!(
            "No install command known for package manager '{other}'"
        )),
    }
}
