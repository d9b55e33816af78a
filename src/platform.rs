//! Host platform identification
//!
//! Reports the host as a uname-style `(system, machine)` pair so installer
//! selection can match on the same names the upstream release assets use.

use std::fmt;

/// Host operating system as reported by `uname -s`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum System {
    Linux,
    Darwin,
    Windows,
    /// Anything else, carrying the raw OS name
    Other(String),
}

impl System {
    /// Map a Rust target OS name (`std::env::consts::OS`) to a system
    pub fn from_target_os(os: &str) -> Self {
        match os {
            "linux" => System::Linux,
            "macos" => System::Darwin,
            "windows" => System::Windows,
            other => System::Other(other.to_string()),
        }
    }

    /// Get the uname-style name
    pub fn name(&self) -> &str {
        match self {
            System::Linux => "Linux",
            System::Darwin => "Darwin",
            System::Windows => "Windows",
            System::Other(name) => name,
        }
    }
}

/// Host CPU architecture as reported by `uname -m`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Machine {
    X86_64,
    /// Apple naming for 64-bit ARM
    Arm64,
    /// Linux naming for 64-bit ARM
    Aarch64,
    Other(String),
}

impl Machine {
    /// Map a Rust target arch to a machine name.
    ///
    /// macOS reports 64-bit ARM as `arm64`, everyone else as `aarch64`.
    pub fn from_target_arch(arch: &str, system: &System) -> Self {
        match (arch, system) {
            ("x86_64", _) => Machine::X86_64,
            ("aarch64", System::Darwin) => Machine::Arm64,
            ("aarch64", _) => Machine::Aarch64,
            (other, _) => Machine::Other(other.to_string()),
        }
    }

    /// Get the uname-style name
    pub fn name(&self) -> &str {
        match self {
            Machine::X86_64 => "x86_64",
            Machine::Arm64 => "arm64",
            Machine::Aarch64 => "aarch64",
            Machine::Other(name) => name,
        }
    }
}

/// Immutable `(system, machine)` identity of the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    pub system: System,
    pub machine: Machine,
}

impl PlatformIdentity {
    pub fn new(system: System, machine: Machine) -> Self {
        Self { system, machine }
    }

    /// Detect the current host
    pub fn detect() -> Self {
        let system = System::from_target_os(std::env::consts::OS);
        let machine = Machine::from_target_arch(std::env::consts::ARCH, &system);
        Self { system, machine }
    }

    pub fn is_windows(&self) -> bool {
        self.system == System::Windows
    }
}

impl fmt::Display for PlatformIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.system.name(), self.machine.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_target_os() {
        assert_eq!(System::from_target_os("linux"), System::Linux);
        assert_eq!(System::from_target_os("macos"), System::Darwin);
        assert_eq!(System::from_target_os("windows"), System::Windows);
        assert_eq!(
            System::from_target_os("freebsd"),
            System::Other("freebsd".to_string())
        );
    }

    #[test]
    fn arm_naming_depends_on_system() {
        assert_eq!(
            Machine::from_target_arch("aarch64", &System::Darwin),
            Machine::Arm64
        );
        assert_eq!(
            Machine::from_target_arch("aarch64", &System::Linux),
            Machine::Aarch64
        );
        assert_eq!(
            Machine::from_target_arch("x86_64", &System::Windows),
            Machine::X86_64
        );
    }

    #[test]
    fn display_uses_uname_names() {
        let platform = PlatformIdentity::new(System::Darwin, Machine::Arm64);
        assert_eq!(platform.to_string(), "Darwin arm64");
    }

    #[test]
    fn detect_matches_compile_target() {
        let platform = PlatformIdentity::detect();
        assert_eq!(platform.is_windows(), cfg!(windows));
    }
}
