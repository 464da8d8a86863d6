use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use glob_match::glob_match;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::ZipArchive;

/// Extract a downloaded archive into `extract_to`, dispatching on the
/// filename. Unknown formats are reported and left alone.
pub fn extract_archive(path: &Path, extract_to: &str, files_pattern: Option<&str>) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    let extracted = if name.ends_with(".zip") {
        extract_zip(path, extract_to, files_pattern)?
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        let file = open_archive(path)?;
        extract_tar(GzDecoder::new(file), extract_to, files_pattern)?
    } else if name.ends_with(".tar.zst") {
        let file = open_archive(path)?;
        let decoder = zstd::Decoder::new(file)
            .with_context(|| format!("Failed to create zstd decoder for: {}", path.display()))?;
        extract_tar(decoder, extract_to, files_pattern)?
    } else if name.ends_with(".tar.xz") {
        let file = open_archive(path)?;
        extract_tar(xz2::read::XzDecoder::new(file), extract_to, files_pattern)?
    } else {
        println!("Warning: unknown archive format, skipping extraction: {name}");
        return Ok(());
    };

    match files_pattern {
        Some(pattern) => println!(
            "Extracted {} files matching pattern '{pattern}'",
            extracted.len()
        ),
        None => println!("Extracted {} files", extracted.len()),
    }
    Ok(())
}

fn open_archive(path: &Path) -> Result<fs::File> {
    fs::File::open(path).with_context(|| format!("Failed to open archive: {}", path.display()))
}

// A member passes when it matches the pattern against either its full path
// or its bare filename. No pattern means everything passes.
fn member_wanted(pattern: Option<&str>, member_path: &str, filename: &str) -> bool {
    match pattern {
        Some(pattern) => glob_match(pattern, member_path) || glob_match(pattern, filename),
        None => true,
    }
}

/// Extract a TAR stream, returning the extracted file paths. When a file
/// pattern is given, matches are flattened to their bare filenames.
fn extract_tar<R: Read>(
    reader: R,
    extract_to: &str,
    files_pattern: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let mut archive = Archive::new(reader);

    fs::create_dir_all(extract_to)
        .with_context(|| format!("Failed to create extraction directory: {extract_to}"))?;

    let mut extracted = Vec::new();

    for entry in archive.entries().with_context(|| "Failed to read tar entries")? {
        let mut entry = entry.with_context(|| "Failed to access tar entry")?;

        let member_path = entry.path().with_context(|| "Failed to get entry path")?;
        let member_str = member_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in archive member path"))?
            .to_string();
        let filename = member_path
            .file_name()
            .map(|name| name.to_owned())
            .unwrap_or_default();

        if !member_wanted(files_pattern, &member_str, &filename.to_string_lossy()) {
            continue;
        }

        let outpath = if files_pattern.is_some() {
            if filename.is_empty() {
                continue; // directory entries have no filename to flatten to
            }
            Path::new(extract_to).join(&filename)
        } else {
            Path::new(extract_to).join(&member_str)
        };

        if let Some(parent) = outpath.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directory: {}", parent.display())
            })?;
        }

        entry
            .unpack(&outpath)
            .with_context(|| format!("Failed to extract file: {}", outpath.display()))?;

        extracted.push(outpath);
    }

    Ok(extracted)
}

/// Extract a ZIP archive, returning the extracted file paths.
fn extract_zip(
    zip_path: &Path,
    extract_to: &str,
    files_pattern: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let file = open_archive(zip_path)?;
    let mut archive = ZipArchive::new(file).with_context(|| "Failed to read zip archive")?;

    fs::create_dir_all(extract_to)
        .with_context(|| format!("Failed to create extraction directory: {extract_to}"))?;

    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut member = archive
            .by_index(i)
            .with_context(|| format!("Failed to access zip entry {i}"))?;

        let filename = Path::new(member.name())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
            .to_string();

        if !member_wanted(files_pattern, member.name(), &filename) {
            continue;
        }

        let outpath = if files_pattern.is_some() {
            if filename.is_empty() {
                continue;
            }
            Path::new(extract_to).join(&filename)
        } else {
            Path::new(extract_to).join(member.mangled_name())
        };

        if member.name().ends_with('/') {
            fs::create_dir_all(&outpath)
                .with_context(|| format!("Failed to create directory: {}", outpath.display()))?;
            continue;
        }

        if let Some(parent) = outpath.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directory: {}", parent.display())
            })?;
        }

        let mut outfile = fs::File::create(&outpath)
            .with_context(|| format!("Failed to create extracted file: {}", outpath.display()))?;
        std::io::copy(&mut member, &mut outfile)
            .with_context(|| format!("Failed to extract file: {}", outpath.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = member.unix_mode() {
                fs::set_permissions(&outpath, fs::Permissions::from_mode(mode))?;
            }
        }

        extracted.push(outpath);
    }

    Ok(extracted)
}
