use std::fmt;

/// Normalized cpu architecture tag read from an asset filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuType {
    Arm,
    I686,
    X86_64,
    Unknown,
}

impl fmt::Display for CpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            CpuType::Arm => "arm",
            CpuType::I686 => "i686",
            CpuType::X86_64 => "x86_64",
            CpuType::Unknown => "unknown",
        };
        write!(f, "{tag}")
    }
}

/// Normalized operating system tag read from an asset filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Darwin,
    Linux,
    Unknown,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Os::Windows => "windows",
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Unknown => "unknown",
        };
        write!(f, "{tag}")
    }
}

/// Package tooling that owns an asset's file format.
///
/// `None` means the asset is a plain archive or bare binary — known to not be
/// a package. Package detection always has a definite answer, unlike the cpu
/// and os tags which can be `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageManager {
    None,
    Named(String),
}

/// A filename suffix that marks an asset as belonging to a package manager.
#[derive(Debug, Clone, Copy)]
pub struct PackageRule {
    pub suffix: &'static str,
    pub manager: &'static str,
}

/// Recognized package formats, checked in order. Adding a format here is all
/// it takes; the selection strategy never looks at concrete manager names.
pub const DEFAULT_PACKAGE_RULES: &[PackageRule] = &[PackageRule {
    suffix: ".deb",
    manager: "dpkg",
}];

// Architecture patterns, first match wins. The bare "x86" check sits after
// the 64-bit forms so "x86_64" and "x86-64" can never land on i686.
const CPU_RULES: &[(&[&str], CpuType)] = &[
    (&["aarch64", "arm"], CpuType::Arm),
    (&["i386", "i486", "i686", "i786"], CpuType::I686),
    (&["x86_64", "x86-64", "x64", "amd64"], CpuType::X86_64),
    (&["x86"], CpuType::I686),
];

const OS_RULES: &[(&[&str], Os)] = &[
    (&["windows"], Os::Windows),
    (&["apple", "darwin"], Os::Darwin),
    (&["linux"], Os::Linux),
];

/// Classify a filename (or `uname -m` output) into a cpu tag.
pub fn classify_cpu(name: &str) -> CpuType {
    let name = name.to_lowercase();
    for (patterns, cpu) in CPU_RULES {
        if patterns.iter().any(|pattern| name.contains(pattern)) {
            return *cpu;
        }
    }
    CpuType::Unknown
}

/// Classify a filename into an os tag.
pub fn classify_os(name: &str) -> Os {
    let name = name.to_lowercase();
    for (patterns, os) in OS_RULES {
        if patterns.iter().any(|pattern| name.contains(pattern)) {
            return *os;
        }
    }
    // Debian packages rarely spell out "linux" in the filename.
    if name.ends_with(".deb") {
        Os::Linux
    } else {
        Os::Unknown
    }
}

/// Classify a filename into the package manager owning it, if any.
pub fn classify_package_manager(name: &str, rules: &[PackageRule]) -> PackageManager {
    let name = name.to_lowercase();
    for rule in rules {
        if name.ends_with(rule.suffix) {
            return PackageManager::Named(rule.manager.to_string());
        }
    }
    PackageManager::None
}

/// One downloadable artifact of a release, tagged at construction with what
/// its filename says about cpu, os and packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub download_url: Option<String>,
    pub cpu: CpuType,
    pub os: Os,
    pub package_manager: PackageManager,
}

impl Asset {
    /// Classify `name` with the default package-format rules.
    pub fn new(name: impl Into<String>, download_url: Option<String>) -> Asset {
        Asset::with_rules(name, download_url, DEFAULT_PACKAGE_RULES)
    }

    /// Classify `name` with an explicit package-format rule table.
    pub fn with_rules(
        name: impl Into<String>,
        download_url: Option<String>,
        rules: &[PackageRule],
    ) -> Asset {
        let name = name.into();
        let cpu = classify_cpu(&name);
        let os = classify_os(&name);
        let package_manager = classify_package_manager(&name, rules);
        Asset {
            name,
            download_url,
            cpu,
            os,
            package_manager,
        }
    }
}
