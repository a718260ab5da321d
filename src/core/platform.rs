//! Host platform classification.

use std::fmt;

use crate::core::error::ConfigureError;

/// Supported host operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    FreeBsd,
    Darwin,
    MinGw,
}

impl Platform {
    /// Map the output of `uname -s` to a platform.
    ///
    /// Matching is exact except for MinGW, whose identifier carries a
    /// version suffix (`MINGW32_NT-6.1`).
    pub fn detect(raw_os: &str) -> Result<Platform, ConfigureError> {
        match raw_os {
            "Linux" => Ok(Platform::Linux),
            "FreeBSD" => Ok(Platform::FreeBsd),
            "Darwin" => Ok(Platform::Darwin),
            other if other.starts_with("MINGW32") => Ok(Platform::MinGw),
            other => Err(ConfigureError::UnknownPlatform(other.to_string())),
        }
    }

    /// The tag persisted as `CFG_OSTYPE`.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::FreeBsd => "freebsd",
            Platform::Darwin => "darwin",
            Platform::MinGw => "mingw32",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Host CPU families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuType {
    I686,
    X86_64,
    Arm,
    Aarch64,
}

impl CpuType {
    /// Map the output of `uname -m` to a CPU type.
    pub fn detect(raw_cpu: &str) -> Result<CpuType, ConfigureError> {
        match raw_cpu {
            "i386" | "i486" | "i686" | "i786" | "x86" => Ok(CpuType::I686),
            "x86_64" | "x86-64" | "x64" | "amd64" => Ok(CpuType::X86_64),
            "aarch64" | "arm64" => Ok(CpuType::Aarch64),
            other if other.starts_with("arm") => Ok(CpuType::Arm),
            other => Err(ConfigureError::UnknownCpuType(other.to_string())),
        }
    }

    /// The tag persisted as `CFG_CPUTYPE`.
    pub fn tag(&self) -> &'static str {
        match self {
            CpuType::I686 => "i686",
            CpuType::X86_64 => "x86_64",
            CpuType::Arm => "arm",
            CpuType::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for CpuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
