use crate::asset::{Asset, CpuType, Os, PackageManager};
use crate::detect::SystemProfile;

/// Wildcard-or-exact criterion for one classification tag.
#[derive(Debug, Clone, Copy)]
pub enum TagMatch<T> {
    Any,
    Exact(T),
}

impl<T: PartialEq> TagMatch<T> {
    fn accepts(&self, value: &T) -> bool {
        match self {
            TagMatch::Any => true,
            TagMatch::Exact(want) => want == value,
        }
    }
}

/// Criterion for the package-manager tag: anything, or one of an explicit
/// set. Include `PackageManager::None` in the set if plain archives should
/// pass too.
#[derive(Debug, Clone, Copy)]
pub enum ManagerMatch<'a> {
    Any,
    AnyOf(&'a [PackageManager]),
}

impl ManagerMatch<'_> {
    fn accepts(&self, value: &PackageManager) -> bool {
        match self {
            ManagerMatch::Any => true,
            ManagerMatch::AnyOf(set) => set.contains(value),
        }
    }
}

/// Select the assets matching all three criteria, preserving input order.
pub fn filter_assets<'a>(
    assets: &'a [Asset],
    cpu: TagMatch<CpuType>,
    os: TagMatch<Os>,
    managers: ManagerMatch<'_>,
) -> Vec<&'a Asset> {
    assets
        .iter()
        .filter(|asset| cpu.accepts(&asset.cpu))
        .filter(|asset| os.accepts(&asset.os))
        .filter(|asset| managers.accepts(&asset.package_manager))
        .collect()
}

/// Outcome of one selection run: the candidate set at the step that decided,
/// the step number (0-6), and the pick if the evidence allowed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub candidates: Vec<Asset>,
    pub decided_at_step: usize,
    pub chosen: Option<Asset>,
}

impl SelectionResult {
    pub fn success(&self) -> bool {
        self.chosen.is_some()
    }

    fn decided(step: usize, found: Vec<&Asset>, os_confirmed: bool) -> SelectionResult {
        let candidates: Vec<Asset> = found.into_iter().cloned().collect();
        // With the os confirmed, any candidate is presumed installable and
        // the first listed wins the tie. With the os unconfirmed, picking
        // among several would be a guess; only a lone candidate is accepted.
        let chosen = if os_confirmed || candidates.len() == 1 {
            candidates.first().cloned()
        } else {
            None
        };
        SelectionResult {
            candidates,
            decided_at_step: step,
            chosen,
        }
    }

    fn undecided() -> SelectionResult {
        SelectionResult {
            candidates: Vec::new(),
            decided_at_step: 6,
            chosen: None,
        }
    }
}

/// Walk the selection strategy over a release's assets.
///
/// The strategy tries successively weaker evidence and stops at the first
/// step that yields candidates:
///
/// 0. package manager version for the user's cpu
/// 1. package manager version for unknown cpu
/// 2. plain version for the user's os and cpu
/// 3. plain version for the user's os and unknown cpu
/// 4. plain version for unknown os and the user's cpu, only if unique
/// 5. plain version for unknown os and unknown cpu, only if unique
/// 6. give up
///
/// "Plain" means not owned by any package manager. Steps 0 and 1 are skipped
/// outright when the system has no recognized package manager. At steps 4
/// and 5 the os is unconfirmed, so two or more candidates end the run with
/// nothing chosen instead of falling through; the candidates are still
/// recorded for the report.
pub fn select_asset(assets: &[Asset], system: &SystemProfile) -> SelectionResult {
    let managers: Vec<PackageManager> = system
        .package_managers
        .iter()
        .map(|name| PackageManager::Named(name.clone()))
        .collect();
    let plain = [PackageManager::None];

    if !managers.is_empty() {
        let found = filter_assets(
            assets,
            TagMatch::Exact(system.cpu),
            TagMatch::Exact(system.os),
            ManagerMatch::AnyOf(&managers),
        );
        if !found.is_empty() {
            return SelectionResult::decided(0, found, true);
        }

        let found = filter_assets(
            assets,
            TagMatch::Exact(CpuType::Unknown),
            TagMatch::Exact(system.os),
            ManagerMatch::AnyOf(&managers),
        );
        if !found.is_empty() {
            return SelectionResult::decided(1, found, true);
        }
    }

    let found = filter_assets(
        assets,
        TagMatch::Exact(system.cpu),
        TagMatch::Exact(system.os),
        ManagerMatch::AnyOf(&plain),
    );
    if !found.is_empty() {
        return SelectionResult::decided(2, found, true);
    }

    let found = filter_assets(
        assets,
        TagMatch::Exact(CpuType::Unknown),
        TagMatch::Exact(system.os),
        ManagerMatch::AnyOf(&plain),
    );
    if !found.is_empty() {
        return SelectionResult::decided(3, found, true);
    }

    let found = filter_assets(
        assets,
        TagMatch::Exact(system.cpu),
        TagMatch::Exact(Os::Unknown),
        ManagerMatch::AnyOf(&plain),
    );
    if !found.is_empty() {
        return SelectionResult::decided(4, found, false);
    }

    let found = filter_assets(
        assets,
        TagMatch::Exact(CpuType::Unknown),
        TagMatch::Exact(Os::Unknown),
        ManagerMatch::AnyOf(&plain),
    );
    if !found.is_empty() {
        return SelectionResult::decided(5, found, false);
    }

    SelectionResult::undecided()
}

const STRATEGY_TEXT: &str = "\
Selection strategy:
  1. package manager version for the user's cpu
  2. package manager version for unknown cpu
  3. plain version for the user's os and cpu
  4. plain version for the user's os and unknown cpu
  5. plain version for unknown os and the user's cpu, only if there is exactly one
  6. plain version for unknown os and unknown cpu, only if there is exactly one
  7. otherwise give up
";

impl SelectionResult {
    /// Operator-facing explanation of the run: what was considered, what the
    /// machine looks like, how far the strategy got and why it ended there.
    pub fn report(&self, system: &SystemProfile, assets: &[Asset]) -> String {
        let mut text = String::new();

        text.push_str("Found assets:\n");
        for asset in assets {
            text.push_str(&format!("  {}\n", asset.name));
        }

        let managers = if system.package_managers.is_empty() {
            "none".to_string()
        } else {
            system.package_managers.join(", ")
        };
        text.push_str(&format!(
            "\nSelecting release for:\n  Cpu type: {}\n  Operating system: {}\n  Available package managers: {}\n",
            system.cpu, system.os, managers
        ));

        text.push('\n');
        text.push_str(STRATEGY_TEXT);
        text.push_str(&format!(
            "\nStrategy reached step {}.\n\n",
            self.decided_at_step + 1
        ));

        match &self.chosen {
            Some(chosen) => {
                text.push_str(&format!("Selected asset:\n  {}\n", chosen.name));
                if self.candidates.len() > 1 {
                    text.push_str("\nSelected first of these equally suitable assets:\n");
                    for candidate in &self.candidates {
                        text.push_str(&format!("  {}\n", candidate.name));
                    }
                }
            }
            None if self.candidates.is_empty() => {
                text.push_str("No asset in this release matches the system.\n");
                text.push_str("FAILED to select a suitable asset.\n");
            }
            None => {
                text.push_str("Found potentially suitable assets:\n");
                for candidate in &self.candidates {
                    text.push_str(&format!("  {}\n", candidate.name));
                }
                text.push_str(
                    "Their operating system cannot be read from the name, so there is no \
                     way to tell them apart. Rather than install the wrong one, nothing \
                     was selected.\n",
                );
                text.push_str("FAILED to select a suitable asset.\n");
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str) -> Asset {
        Asset::new(name, Some(format!("https://example.com/{name}")))
    }

    fn system(package_managers: &[&str]) -> SystemProfile {
        SystemProfile {
            os: Os::Linux,
            cpu: CpuType::X86_64,
            package_managers: package_managers.iter().map(|m| m.to_string()).collect(),
        }
    }

    // Assets that must never be picked for an x86_64 linux machine: wrong
    // cpu, wrong os, or both.
    fn wrong_assets() -> Vec<Asset> {
        vec![
            asset("fd-arm.deb"),
            asset("fd-unknown-linux-arm.tar.gz"),
            asset("fd-darwin-amd64.tar.gz"),
            asset("fd-darwin.tar.gz"),
            asset("fd-darwin-arm.tar.gz"),
        ]
    }

    // One pickable asset per strategy step, in preference order.
    fn preferred_assets() -> Vec<Asset> {
        vec![
            asset("fd-amd64.deb"),                  // step 0
            asset("fd.deb"),                        // step 1
            asset("fd-unknown-linux-amd64.tar.gz"), // step 2
            asset("fd-unknown-linux.tar.gz"),       // step 3
            asset("fd-amd64.tar.gz"),               // step 4
            asset("fd.zip"),                        // step 5
        ]
    }

    fn fixture(skip_first_preferred: usize) -> Vec<Asset> {
        let mut assets = wrong_assets();
        assets.extend(preferred_assets().into_iter().skip(skip_first_preferred));
        assets
    }

    fn names(assets: &[Asset]) -> Vec<&str> {
        assets.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_filter_with_all_wildcards_returns_everything_in_order() {
        let assets = fixture(0);
        let found = filter_assets(&assets, TagMatch::Any, TagMatch::Any, ManagerMatch::Any);
        assert_eq!(found.len(), assets.len());
        for (kept, original) in found.iter().zip(assets.iter()) {
            assert_eq!(*kept, original);
        }
    }

    #[test]
    fn test_filter_is_a_conjunction() {
        let assets = fixture(0);
        let plain = [PackageManager::None];
        let found = filter_assets(
            &assets,
            TagMatch::Exact(CpuType::X86_64),
            TagMatch::Exact(Os::Linux),
            ManagerMatch::AnyOf(&plain),
        );
        assert_eq!(
            found.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            vec!["fd-unknown-linux-amd64.tar.gz"]
        );
    }

    #[test]
    fn test_step_0_package_manager_version_for_my_cpu() {
        let result = select_asset(&fixture(0), &system(&["apt", "apt-get", "dpkg"]));
        assert_eq!(result.decided_at_step, 0);
        assert_eq!(names(&result.candidates), vec!["fd-amd64.deb"]);
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-amd64.deb")
        );
        assert!(result.success());
    }

    #[test]
    fn test_step_0_tie_breaks_to_first_listed() {
        let mut assets = fixture(0);
        assets.push(asset("fd-whatever-amd64.deb"));
        let result = select_asset(&assets, &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 0);
        assert_eq!(
            names(&result.candidates),
            vec!["fd-amd64.deb", "fd-whatever-amd64.deb"]
        );
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-amd64.deb")
        );
    }

    #[test]
    fn test_steps_0_and_1_skipped_without_package_manager() {
        // package assets exist, but nothing can install them
        let result = select_asset(&fixture(0), &system(&[]));
        assert_eq!(result.decided_at_step, 2);
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-unknown-linux-amd64.tar.gz")
        );
    }

    #[test]
    fn test_step_1_package_manager_version_for_unknown_cpu() {
        let result = select_asset(&fixture(1), &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 1);
        assert_eq!(result.chosen.as_ref().map(|a| a.name.as_str()), Some("fd.deb"));
    }

    #[test]
    fn test_step_2_plain_version_for_my_os_and_cpu() {
        let result = select_asset(&fixture(2), &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 2);
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-unknown-linux-amd64.tar.gz")
        );

        // a second match is fine here: os and cpu are both confirmed
        let mut assets = fixture(2);
        assets.push(asset("fd-unknown-linux-amd64-whatever.tar.gz"));
        let result = select_asset(&assets, &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 2);
        assert_eq!(result.candidates.len(), 2);
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-unknown-linux-amd64.tar.gz")
        );
    }

    #[test]
    fn test_step_3_plain_version_for_my_os_and_unknown_cpu() {
        let result = select_asset(&fixture(3), &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 3);
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-unknown-linux.tar.gz")
        );
    }

    #[test]
    fn test_step_4_unknown_os_needs_a_unique_candidate() {
        let result = select_asset(&fixture(4), &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 4);
        assert_eq!(
            result.chosen.as_ref().map(|a| a.name.as_str()),
            Some("fd-amd64.tar.gz")
        );

        // two candidates: refuse instead of guessing, and do not fall through
        let mut assets = fixture(4);
        assets.push(asset("fd-amd64-whatever.tar.gz"));
        let result = select_asset(&assets, &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 4);
        assert_eq!(
            names(&result.candidates),
            vec!["fd-amd64.tar.gz", "fd-amd64-whatever.tar.gz"]
        );
        assert_eq!(result.chosen, None);
        assert!(!result.success());
    }

    #[test]
    fn test_step_5_everything_unknown_needs_a_unique_candidate() {
        let result = select_asset(&fixture(5), &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 5);
        assert_eq!(result.chosen.as_ref().map(|a| a.name.as_str()), Some("fd.zip"));

        let mut assets = fixture(5);
        assets.push(asset("fd-whatever.zip"));
        let result = select_asset(&assets, &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 5);
        assert_eq!(names(&result.candidates), vec!["fd.zip", "fd-whatever.zip"]);
        assert!(!result.success());
    }

    #[test]
    fn test_step_6_nothing_suitable_at_all() {
        let result = select_asset(&wrong_assets(), &system(&["dpkg"]));
        assert_eq!(result.decided_at_step, 6);
        assert!(result.candidates.is_empty());
        assert_eq!(result.chosen, None);
        assert!(!result.success());
    }

    #[test]
    fn test_select_is_deterministic() {
        let assets = fixture(0);
        let profile = system(&["dpkg"]);
        assert_eq!(
            select_asset(&assets, &profile),
            select_asset(&assets, &profile)
        );
    }

    #[test]
    fn test_selection_does_not_mutate_input() {
        let assets = fixture(0);
        let before = assets.clone();
        let _ = select_asset(&assets, &system(&["dpkg"]));
        assert_eq!(assets, before);
    }

    #[test]
    fn test_report_on_success_names_the_chosen_asset() {
        let assets = fixture(0);
        let profile = system(&["apt", "dpkg"]);
        let result = select_asset(&assets, &profile);
        let report = result.report(&profile, &assets);
        assert!(report.contains("fd-amd64.deb"));
        assert!(report.contains("Strategy reached step 1."));
        assert!(report.contains("apt, dpkg"));
        assert!(!report.contains("FAILED"));
    }

    #[test]
    fn test_report_on_ambiguity_lists_the_candidates() {
        let mut assets = fixture(4);
        assets.push(asset("fd-amd64-whatever.tar.gz"));
        let profile = system(&[]);
        let result = select_asset(&assets, &profile);
        let report = result.report(&profile, &assets);
        assert!(report.contains("fd-amd64.tar.gz"));
        assert!(report.contains("fd-amd64-whatever.tar.gz"));
        assert!(report.contains("FAILED"));
    }

    #[test]
    fn test_report_on_no_evidence() {
        let assets = wrong_assets();
        let profile = system(&["dpkg"]);
        let result = select_asset(&assets, &profile);
        let report = result.report(&profile, &assets);
        assert!(report.contains("No asset in this release matches the system."));
        assert!(report.contains("FAILED"));
    }
}
