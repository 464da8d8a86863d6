use crate::asset::Asset;
use crate::models::GitHubRelease;
use anyhow::{Context, Result};

/// One published release of a repository and its classified assets.
#[derive(Debug, Clone)]
pub struct Release {
    pub repo: String,
    pub tag_name: String,
    pub name: String,
    pub assets: Vec<Asset>,
}

impl Release {
    /// Classify a raw API release into tagged assets, preserving API order.
    pub fn from_api(repo: &str, raw: GitHubRelease) -> Release {
        let assets = raw
            .assets
            .into_iter()
            .map(|asset| Asset::new(asset.name, Some(asset.browser_download_url)))
            .collect();
        Release {
            repo: repo.to_string(),
            tag_name: raw.tag_name,
            name: raw.name,
            assets,
        }
    }
}

/// Fetch release metadata from the GitHub API. No `tag` means the latest
/// release.
pub fn fetch_release(repo: &str, tag: Option<&str>) -> Result<Release> {
    let api_url = release_api_url(repo, tag);

    println!("Fetching release info from: {api_url}");

    let response = ureq::get(&api_url)
        .set("User-Agent", "relget")
        .call()
        .with_context(|| format!("Failed to fetch release info for {repo}"))?;

    if response.status() != 200 {
        return Err(anyhow::anyhow!(
            "GitHub API request failed with status: {}",
            response.status()
        ));
    }

    let raw: GitHubRelease = response
        .into_json()
        .with_context(|| "Failed to parse GitHub release JSON")?;

    Ok(Release::from_api(repo, raw))
}

fn release_api_url(repo: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("https://api.github.com/repos/{repo}/releases/tags/{tag}"),
        None => format!("https://api.github.com/repos/{repo}/releases/latest"),
    }
}
