use crate::asset::Asset;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Download `asset` into `dir`, reusing the URL-keyed cache when possible.
/// Returns the final path of the downloaded file.
pub fn download_asset(asset: &Asset, dir: &Path) -> Result<PathBuf> {
    let url = asset
        .download_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Asset '{}' has no download URL", asset.name))?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download directory: {}", dir.display()))?;

    let cached = cached_path_for(url, &asset.name)?;
    if cached.exists() {
        println!("Found cached file: {}", cached.display());
    } else {
        println!("Downloading: {url}");
        download_http_file(url, &cached)?;
    }

    let dest = dir.join(&asset.name);
    fs::copy(&cached, &dest)
        .with_context(|| format!("Failed to copy file to: {}", dest.display()))?;
    println!("Saved as: {}", dest.display());

    Ok(dest)
}

/// Cache location for a download URL: temp dir, url hash prefixed onto the
/// filename so different releases of the same asset name don't collide.
fn cached_path_for(url: &str, filename: &str) -> Result<PathBuf> {
    let cache_dir = std::env::temp_dir().join("relget-cache");
    fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;

    let url_hash = sha256_hex(url.as_bytes());
    Ok(cache_dir.join(format!("{url_hash}_{filename}")))
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Download a file via HTTP, writing through a temporary path so an
/// interrupted transfer never lands at the final location.
fn download_http_file(url: &str, path: &Path) -> Result<()> {
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("Failed to download: {url}"))?;

    if response.status() != 200 {
        return Err(anyhow::anyhow!(
            "Download failed with status: {}",
            response.status()
        ));
    }

    let temp_path = path.with_extension(format!(
        "{}.part",
        path.extension().and_then(|ext| ext.to_str()).unwrap_or("download")
    ));

    let mut temp_file = fs::File::create(&temp_path)
        .with_context(|| format!("Failed to create temporary file: {}", temp_path.display()))?;

    std::io::copy(&mut response.into_reader(), &mut temp_file).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to write to temporary file: {}", temp_path.display())
    })?;

    temp_file.sync_all().with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to sync temporary file: {}", temp_path.display())
    })?;

    let file_size = temp_file.metadata()?.len();
    drop(temp_file);

    fs::rename(&temp_path, path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!(
            "Failed to move downloaded file into place: {} -> {}",
            temp_path.display(),
            path.display()
        )
    })?;

    println!("Downloaded: {} ({} bytes)", path.display(), file_size);
    Ok(())
}
