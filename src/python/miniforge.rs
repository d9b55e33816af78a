//! Miniforge installer selection and installation

use crate::config::schema::MiniforgeConfig;
use crate::download::DepInstaller;
use crate::error::{ForgepyError, ForgepyResult};
use crate::platform::{Machine, PlatformIdentity, System};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Silent-install flags for the Windows executable installer, minus `/D=`
const WINDOWS_INSTALL_FLAGS: [&str; 9] = [
    "/S",
    "/InstallationType=JustMe",
    "/RegisterPython=0",
    "/KeepPkgCache=0",
    "/AddToPath=0",
    "/NoRegistry=1",
    "/NoShortcut=1",
    "/NoScripts=1",
    "/CheckPathLength=1",
];

/// The installer to fetch for a platform and how to invoke it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerPlan {
    pub url: String,
    pub args: Vec<String>,
}

/// Release asset suffix for a platform, or `None` if unsupported
fn asset_suffix(platform: &PlatformIdentity) -> Option<&'static str> {
    match (&platform.system, &platform.machine) {
        (System::Linux, Machine::X86_64) => Some("Linux-x86_64.sh"),
        (System::Linux, Machine::Arm64 | Machine::Aarch64) => Some("Linux-aarch64.sh"),
        (System::Darwin, Machine::Arm64) => Some("MacOSX-arm64.sh"),
        (System::Darwin, Machine::X86_64) => Some("MacOSX-x86_64.sh"),
        // Only an x86_64 build is published; ARM hosts run it emulated
        (System::Windows, _) => Some("Windows-x86_64.exe"),
        _ => None,
    }
}

/// Select the Miniforge installer and its arguments for `platform`
pub fn installer_for(
    platform: &PlatformIdentity,
    prefix: &Path,
    config: &MiniforgeConfig,
) -> ForgepyResult<InstallerPlan> {
    let suffix = asset_suffix(platform).ok_or_else(|| ForgepyError::UnsupportedPlatform {
        system: platform.system.name().to_string(),
        machine: platform.machine.name().to_string(),
    })?;

    let url = format!(
        "{}/{}/Miniforge3-{}-{}",
        config.base_url.trim_end_matches('/'),
        config.release,
        config.release,
        suffix
    );

    let prefix = prefix.display().to_string();
    let args = if platform.is_windows() {
        WINDOWS_INSTALL_FLAGS
            .iter()
            .map(|f| f.to_string())
            .chain(std::iter::once(format!("/D={}", prefix)))
            .collect()
    } else {
        vec!["-bfp".to_string(), prefix]
    };

    Ok(InstallerPlan { url, args })
}

/// Install Miniforge into `prefix` for the given platform
pub async fn setup_miniforge(
    installer: &dyn DepInstaller,
    platform: &PlatformIdentity,
    prefix: &Path,
    config: &MiniforgeConfig,
) -> ForgepyResult<()> {
    let plan = installer_for(platform, prefix, config)?;
    debug!("Miniforge installer for {}: {}", platform, plan.url);
    installer.download_dep(&plan.url, prefix, &plan.args).await
}

/// Location of the `conda` binary inside an install prefix
pub fn conda_path(platform: &PlatformIdentity, prefix: &Path) -> PathBuf {
    if platform.is_windows() {
        prefix.join("Scripts").join("conda.exe")
    } else {
        prefix.join("bin").join("conda")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASES: &str = "https://github.com/conda-forge/miniforge/releases/download/25.3.0-3";

    fn plan(system: System, machine: Machine) -> ForgepyResult<InstallerPlan> {
        installer_for(
            &PlatformIdentity::new(system, machine),
            Path::new("/cache/miniforge"),
            &MiniforgeConfig::default(),
        )
    }

    #[test]
    fn linux_x86_64() {
        let p = plan(System::Linux, Machine::X86_64).unwrap();
        assert_eq!(p.url, format!("{RELEASES}/Miniforge3-25.3.0-3-Linux-x86_64.sh"));
        assert_eq!(p.args, vec!["-bfp", "/cache/miniforge"]);
    }

    #[test]
    fn linux_arm_both_spellings() {
        for machine in [Machine::Arm64, Machine::Aarch64] {
            let p = plan(System::Linux, machine).unwrap();
            assert_eq!(p.url, format!("{RELEASES}/Miniforge3-25.3.0-3-Linux-aarch64.sh"));
            assert_eq!(p.args, vec!["-bfp", "/cache/miniforge"]);
        }
    }

    #[test]
    fn macos() {
        let arm = plan(System::Darwin, Machine::Arm64).unwrap();
        assert_eq!(arm.url, format!("{RELEASES}/Miniforge3-25.3.0-3-MacOSX-arm64.sh"));

        let intel = plan(System::Darwin, Machine::X86_64).unwrap();
        assert_eq!(intel.url, format!("{RELEASES}/Miniforge3-25.3.0-3-MacOSX-x86_64.sh"));
        assert_eq!(intel.args, vec!["-bfp", "/cache/miniforge"]);
    }

    #[test]
    fn windows_uses_silent_exe_flags() {
        let p = plan(System::Windows, Machine::X86_64).unwrap();
        assert_eq!(p.url, format!("{RELEASES}/Miniforge3-25.3.0-3-Windows-x86_64.exe"));
        assert_eq!(p.args.len(), 10);
        assert_eq!(p.args[0], "/S");
        assert!(p.args.contains(&"/AddToPath=0".to_string()));
        assert_eq!(p.args.last().unwrap(), "/D=/cache/miniforge");
    }

    #[test]
    fn unsupported_pairs() {
        let cases = [
            (System::Darwin, Machine::Aarch64),
            (System::Linux, Machine::Other("riscv64".to_string())),
            (System::Other("freebsd".to_string()), Machine::X86_64),
        ];
        for (system, machine) in cases {
            let err = plan(system, machine).unwrap_err();
            assert!(matches!(err, ForgepyError::UnsupportedPlatform { .. }));
        }
    }

    #[test]
    fn custom_release_and_mirror() {
        let config = MiniforgeConfig {
            release: "24.1.2-0".to_string(),
            base_url: "https://mirror.example/miniforge/".to_string(),
        };
        let p = installer_for(
            &PlatformIdentity::new(System::Linux, Machine::X86_64),
            Path::new("/p"),
            &config,
        )
        .unwrap();
        assert_eq!(
            p.url,
            "https://mirror.example/miniforge/24.1.2-0/Miniforge3-24.1.2-0-Linux-x86_64.sh"
        );
    }

    #[test]
    fn conda_location() {
        let prefix = Path::new("/m");
        let linux = PlatformIdentity::new(System::Linux, Machine::X86_64);
        let windows = PlatformIdentity::new(System::Windows, Machine::X86_64);
        assert_eq!(conda_path(&linux, prefix), PathBuf::from("/m/bin/conda"));
        assert_eq!(
            conda_path(&windows, prefix),
            PathBuf::from("/m").join("Scripts").join("conda.exe")
        );
    }
}
