use crate::asset::{CpuType, Os, classify_cpu};
use crate::config::Config;
use anyhow::{Context, Result};
use std::process::Command;

/// What we know about the machine we are installing on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemProfile {
    pub os: Os,
    pub cpu: CpuType,
    /// Recognized package-manager tools present on this machine, in the
    /// order the config lists them.
    pub package_managers: Vec<String>,
}

impl SystemProfile {
    /// Human-readable summary of the detected system.
    pub fn report(&self) -> String {
        let managers = if self.package_managers.is_empty() {
            "none found".to_string()
        } else {
            self.package_managers.join(", ")
        };
        format!(
            "Operating system: {}\nCPU type: {}\nPackage managers: {}\n",
            self.os, self.cpu, managers
        )
    }
}

/// Inspect the local machine: kernel, architecture and package tooling.
pub fn detect_system(config: &Config) -> Result<SystemProfile> {
    let kernel = uname("-s")?;
    let mut os = parse_kernel_name(kernel.trim());

    // An Android userland reports a Linux kernel but can't install any of
    // the assets we would pick for it.
    if os == Os::Linux
        && let Ok(userland) = uname("-o")
        && userland.contains("Android")
    {
        os = Os::Unknown;
    }

    let machine = uname("-m")?;
    let cpu = classify_cpu(machine.trim());

    let package_managers = config
        .package_manager_tools
        .iter()
        .filter(|tool| tool_installed(tool))
        .cloned()
        .collect();

    Ok(SystemProfile {
        os,
        cpu,
        package_managers,
    })
}

/// Map `uname -s` output to an os tag.
pub fn parse_kernel_name(kernel: &str) -> Os {
    match kernel {
        "Linux" => Os::Linux,
        "Darwin" => Os::Darwin,
        name if name.starts_with("MINGW")
            || name.starts_with("MSYS")
            || name.starts_with("CYGWIN") =>
        {
            Os::Windows
        }
        _ => Os::Unknown,
    }
}

fn uname(flag: &str) -> Result<String> {
    let output = Command::new("uname")
        .arg(flag)
        .output()
        .with_context(|| format!("Failed to run: uname {flag}"))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("uname {flag} exited with {}", output.status));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Check whether `tool` resolves on PATH.
fn tool_installed(tool: &str) -> bool {
    Command::new("which")
        .arg(tool)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kernel_name() {
        assert_eq!(parse_kernel_name("Linux"), Os::Linux);
        assert_eq!(parse_kernel_name("Darwin"), Os::Darwin);
        assert_eq!(parse_kernel_name("MINGW64_NT-10.0-19045"), Os::Windows);
        assert_eq!(parse_kernel_name("MSYS_NT-10.0"), Os::Windows);
        assert_eq!(parse_kernel_name("CYGWIN_NT-10.0"), Os::Windows);
        assert_eq!(parse_kernel_name("FreeBSD"), Os::Unknown);
        assert_eq!(parse_kernel_name(""), Os::Unknown);
    }

    #[test]
    fn test_machine_strings_reuse_the_asset_cpu_rules() {
        // typical `uname -m` outputs
        assert_eq!(classify_cpu("x86_64"), CpuType::X86_64);
        assert_eq!(classify_cpu("i686"), CpuType::I686);
        assert_eq!(classify_cpu("armv7l"), CpuType::Arm);
        assert_eq!(classify_cpu("aarch64"), CpuType::Arm);
        assert_eq!(classify_cpu("riscv64"), CpuType::Unknown);
    }

    #[test]
    fn test_profile_report() {
        let profile = SystemProfile {
            os: Os::Linux,
            cpu: CpuType::X86_64,
            package_managers: vec!["apt".to_string(), "dpkg".to_string()],
        };
        let report = profile.report();
        assert!(report.contains("Operating system: linux"));
        assert!(report.contains("CPU type: x86_64"));
        assert!(report.contains("Package managers: apt, dpkg"));

        let bare = SystemProfile {
            os: Os::Darwin,
            cpu: CpuType::Arm,
            package_managers: Vec::new(),
        };
        assert!(bare.report().contains("Package managers: none found"));
    }
}
