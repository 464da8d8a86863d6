use crate::asset::CpuType;
use crate::config::Config;
use crate::detect::{self, SystemProfile};
use crate::models::{Args, Commands};
use crate::{download, install, release, select};
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Main CLI entry point
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Install {
            repo,
            tag,
            dir,
            unzip_to,
            files,
            config,
        } => {
            let config = Config::load(config.as_deref().map(Path::new))?;
            install_command(
                &repo,
                tag.as_deref(),
                dir.as_deref(),
                unzip_to.as_deref(),
                files.as_deref(),
                &config,
            )
        }
        Commands::Select { repo, tag, config } => {
            let config = Config::load(config.as_deref().map(Path::new))?;
            select_command(&repo, tag.as_deref(), &config)
        }
        Commands::Detect { config } => {
            let config = Config::load(config.as_deref().map(Path::new))?;
            let system = detect::detect_system(&config)?;
            print!("{}", system.report());
            Ok(())
        }
    }
}

/// Detect the machine and refuse early when we could never install on it.
fn checked_profile(config: &Config) -> Result<SystemProfile> {
    let system = detect::detect_system(config)?;
    if !config.supported_oses.contains(&system.os) {
        return Err(anyhow::anyhow!(
            "Operating system '{}' is not supported",
            system.os
        ));
    }
    if system.cpu == CpuType::Unknown {
        return Err(anyhow::anyhow!(
            "Could not detect the cpu architecture of this machine"
        ));
    }
    Ok(system)
}

fn select_command(repo: &str, tag: Option<&str>, config: &Config) -> Result<()> {
    let system = checked_profile(config)?;
    let release = release::fetch_release(repo, tag)?;
    let result = select::select_asset(&release.assets, &system);

    print!("{}", result.report(&system, &release.assets));

    if !result.success() {
        return Err(anyhow::anyhow!(
            "No suitable asset for this system in {repo} {}",
            release.tag_name
        ));
    }
    Ok(())
}

fn install_command(
    repo: &str,
    tag: Option<&str>,
    dir: Option<&str>,
    unzip_to: Option<&str>,
    files: Option<&str>,
    config: &Config,
) -> Result<()> {
    let system = checked_profile(config)?;
    let release = release::fetch_release(repo, tag)?;
    let result = select::select_asset(&release.assets, &system);

    print!("{}", result.report(&system, &release.assets));

    let Some(chosen) = result.chosen else {
        return Err(anyhow::anyhow!(
            "No suitable asset for this system in {repo} {}",
            release.tag_name
        ));
    };

    let dir = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.download_dir.clone());
    let file = download::download_asset(&chosen, &dir)?;

    install::install_asset(&chosen, &file, unzip_to, files)
}
