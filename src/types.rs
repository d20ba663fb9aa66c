use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::LaunchError;

/// Generation pipeline variant. Selects both the target program and which
/// option groups apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationMode {
    Standard,
    DiffusionForcing,
}

/// A set of related options that is either active or inactive for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroup {
    Common,
    DiffusionForcing,
}

impl GenerationMode {
    pub const ALL: [GenerationMode; 2] = [GenerationMode::Standard, GenerationMode::DiffusionForcing];

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationMode::Standard => "standard",
            GenerationMode::DiffusionForcing => "diffusion-forcing",
        }
    }

    /// Which option groups a presentation layer should enable for this mode.
    ///
    /// The command builder consults the same answer, so a group that is not
    /// listed here is never serialized.
    pub fn option_groups(self) -> &'static [OptionGroup] {
        match self {
            GenerationMode::Standard => &[OptionGroup::Common],
            GenerationMode::DiffusionForcing => &[OptionGroup::Common, OptionGroup::DiffusionForcing],
        }
    }

    pub fn uses_group(self, group: OptionGroup) -> bool {
        self.option_groups().contains(&group)
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(GenerationMode::Standard),
            "diffusion-forcing" | "df" => Ok(GenerationMode::DiffusionForcing),
            other => Err(LaunchError::UnknownMode(other.to_string())),
        }
    }
}

/// Size of the prompt-enhancer model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancerModelSize {
    #[default]
    Small,
    Large,
}

impl EnhancerModelSize {
    pub fn as_str(self) -> &'static str {
        match self {
            EnhancerModelSize::Small => "small",
            EnhancerModelSize::Large => "large",
        }
    }

    /// Pretrained model backing this size.
    pub fn model_id(self) -> &'static str {
        match self {
            EnhancerModelSize::Small => "Qwen/Qwen2.5-7B-Instruct",
            EnhancerModelSize::Large => "Qwen/Qwen2.5-32B-Instruct",
        }
    }
}

impl fmt::Display for EnhancerModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnhancerModelSize {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(EnhancerModelSize::Small),
            "large" => Ok(EnhancerModelSize::Large),
            other => Err(LaunchError::ModelLoadError {
                model: other.to_string(),
                reason: "unsupported model size (expected \"small\" or \"large\")".to_string(),
            }),
        }
    }
}

/// Model identifiers offered by the launcher.
pub const KNOWN_MODELS: &[&str] = &[
    "Skywork/SkyReels-V2-T2V-14B-540P",
    "Skywork/SkyReels-V2-T2V-14B-720P",
    "Skywork/SkyReels-V2-I2V-14B-540P",
    "Skywork/SkyReels-V2-I2V-14B-720P",
    "Skywork/SkyReels-V2-DF-14B-540P",
    "Skywork/SkyReels-V2-DF-14B-720P",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing_accepts_aliases() {
        assert_eq!("Diffusion_Forcing".parse::<GenerationMode>().unwrap(), GenerationMode::DiffusionForcing);
        assert_eq!("df".parse::<GenerationMode>().unwrap(), GenerationMode::DiffusionForcing);
        assert_eq!(" standard".parse::<GenerationMode>().unwrap(), GenerationMode::Standard);
    }

    #[test]
    fn unknown_mode_is_reported() {
        match "turbo".parse::<GenerationMode>() {
            Err(LaunchError::UnknownMode(m)) => assert_eq!(m, "turbo"),
            other => panic!("expected UnknownMode, got {other:?}"),
        }
    }

    #[test]
    fn only_diffusion_forcing_enables_its_group() {
        assert!(!GenerationMode::Standard.uses_group(OptionGroup::DiffusionForcing));
        assert!(GenerationMode::DiffusionForcing.uses_group(OptionGroup::DiffusionForcing));
        for mode in GenerationMode::ALL {
            assert!(mode.uses_group(OptionGroup::Common));
        }
    }

    #[test]
    fn enhancer_sizes_map_to_models() {
        assert_eq!(EnhancerModelSize::Small.model_id(), "Qwen/Qwen2.5-7B-Instruct");
        assert_eq!(EnhancerModelSize::Large.model_id(), "Qwen/Qwen2.5-32B-Instruct");
        assert!(matches!(
            "medium".parse::<EnhancerModelSize>(),
            Err(LaunchError::ModelLoadError { .. })
        ));
    }
}
