// src/request.rs

//! The structured user input for one generation run.
//!
//! A `GenerationRequest` is built immediately before each run and handed to
//! the command builder; nothing in here is shared or mutated afterwards.

use serde::{Deserialize, Deserializer};

use crate::types::{EnhancerModelSize, GenerationMode};

/// Value of a single command-line option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// `--name value`; absent when unset or blank.
    Text(Option<String>),
    /// Bare `--name`; absent when false.
    Flag(bool),
}

impl OptionValue {
    /// The text to emit after the flag, if the option is present at all.
    ///
    /// `Some(None)` means "bare flag".
    pub fn emitted(&self) -> Option<Option<&str>> {
        match self {
            OptionValue::Text(Some(v)) if !v.trim().is_empty() => Some(Some(v.trim())),
            OptionValue::Text(_) => None,
            OptionValue::Flag(true) => Some(None),
            OptionValue::Flag(false) => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.emitted().is_some()
    }
}

/// Options understood by every generation program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommonOptions {
    #[serde(deserialize_with = "text_value")]
    pub resolution: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub num_frames: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub guidance_scale: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub outdir: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub image: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub shift: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub inference_steps: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub fps: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub seed: Option<String>,
    pub offload: bool,
    pub teacache: bool,
    #[serde(deserialize_with = "text_value")]
    pub teacache_thresh: Option<String>,
    pub use_ret_steps: bool,
}

impl CommonOptions {
    /// All options in emission order.
    pub fn entries(&self) -> Vec<(&'static str, OptionValue)> {
        vec![
            ("resolution", OptionValue::Text(self.resolution.clone())),
            ("num_frames", OptionValue::Text(self.num_frames.clone())),
            ("guidance_scale", OptionValue::Text(self.guidance_scale.clone())),
            ("outdir", OptionValue::Text(self.outdir.clone())),
            ("image", OptionValue::Text(self.image.clone())),
            ("shift", OptionValue::Text(self.shift.clone())),
            ("inference_steps", OptionValue::Text(self.inference_steps.clone())),
            ("fps", OptionValue::Text(self.fps.clone())),
            ("seed", OptionValue::Text(self.seed.clone())),
            ("offload", OptionValue::Flag(self.offload)),
            ("teacache", OptionValue::Flag(self.teacache)),
            ("teacache_thresh", OptionValue::Text(self.teacache_thresh.clone())),
            ("use_ret_steps", OptionValue::Flag(self.use_ret_steps)),
        ]
    }

    /// Fill every unset value from `defaults`. Flags are OR-ed, so a default
    /// of `true` wins unless the caller clears it afterwards.
    pub fn or_defaults(mut self, defaults: &CommonOptions) -> Self {
        fn fill(slot: &mut Option<String>, default: &Option<String>) {
            if slot.as_deref().is_none_or(|v| v.trim().is_empty()) {
                slot.clone_from(default);
            }
        }

        fill(&mut self.resolution, &defaults.resolution);
        fill(&mut self.num_frames, &defaults.num_frames);
        fill(&mut self.guidance_scale, &defaults.guidance_scale);
        fill(&mut self.outdir, &defaults.outdir);
        fill(&mut self.image, &defaults.image);
        fill(&mut self.shift, &defaults.shift);
        fill(&mut self.inference_steps, &defaults.inference_steps);
        fill(&mut self.fps, &defaults.fps);
        fill(&mut self.seed, &defaults.seed);
        fill(&mut self.teacache_thresh, &defaults.teacache_thresh);
        self.offload |= defaults.offload;
        self.teacache |= defaults.teacache;
        self.use_ret_steps |= defaults.use_ret_steps;
        self
    }
}

/// Options only meaningful for [`GenerationMode::DiffusionForcing`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffusionForcingOptions {
    pub video_path: Option<String>,
    pub end_image: Option<String>,
    pub ar_step: Option<String>,
    pub base_num_frames: Option<String>,
    pub overlap_history: Option<String>,
    pub addnoise_condition: Option<String>,
    pub causal_block_size: Option<String>,
    pub causal_attention: bool,
}

impl DiffusionForcingOptions {
    pub fn entries(&self) -> Vec<(&'static str, OptionValue)> {
        vec![
            ("video_path", OptionValue::Text(self.video_path.clone())),
            ("end_image", OptionValue::Text(self.end_image.clone())),
            ("ar_step", OptionValue::Text(self.ar_step.clone())),
            ("base_num_frames", OptionValue::Text(self.base_num_frames.clone())),
            ("overlap_history", OptionValue::Text(self.overlap_history.clone())),
            ("addnoise_condition", OptionValue::Text(self.addnoise_condition.clone())),
            ("causal_block_size", OptionValue::Text(self.causal_block_size.clone())),
            ("causal_attention", OptionValue::Flag(self.causal_attention)),
        ]
    }
}

/// Ask the generation program to enhance the prompt before generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnhancerOptions {
    pub model_size: EnhancerModelSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub model_id: String,
    pub prompt: String,
    pub common: CommonOptions,
    pub diffusion_forcing: DiffusionForcingOptions,
    pub enhancer: Option<EnhancerOptions>,
}

impl GenerationRequest {
    pub fn new(mode: GenerationMode, model_id: impl Into<String>) -> Self {
        Self {
            mode,
            model_id: model_id.into(),
            prompt: String::new(),
            common: CommonOptions::default(),
            diffusion_forcing: DiffusionForcingOptions::default(),
            enhancer: None,
        }
    }
}

/// Accept `"97"`, `97` or `6.0` for a text option in TOML.
///
/// Floats keep their fractional part, so `6.0` stays `"6.0"`.
fn text_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| match s {
        Scalar::Text(t) => t,
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => format!("{f:?}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_and_false_flags_are_absent() {
        assert!(!OptionValue::Text(None).is_present());
        assert!(!OptionValue::Text(Some("   ".into())).is_present());
        assert!(!OptionValue::Flag(false).is_present());
        assert_eq!(OptionValue::Text(Some(" 97 ".into())).emitted(), Some(Some("97")));
        assert_eq!(OptionValue::Flag(true).emitted(), Some(None));
    }

    #[test]
    fn defaults_fill_only_unset_values() {
        let defaults = CommonOptions {
            resolution: Some("540P".into()),
            num_frames: Some("97".into()),
            offload: true,
            ..Default::default()
        };
        let user = CommonOptions {
            resolution: Some("720P".into()),
            num_frames: Some(String::new()),
            ..Default::default()
        };

        let merged = user.or_defaults(&defaults);
        assert_eq!(merged.resolution.as_deref(), Some("720P"));
        assert_eq!(merged.num_frames.as_deref(), Some("97"));
        assert!(merged.offload);
    }

    #[test]
    fn numeric_toml_values_become_text() {
        let opts: CommonOptions = toml::from_str("num_frames = 97\nguidance_scale = 6.5\nresolution = \"540P\"\n").unwrap();
        assert_eq!(opts.num_frames.as_deref(), Some("97"));
        assert_eq!(opts.guidance_scale.as_deref(), Some("6.5"));
        assert_eq!(opts.resolution.as_deref(), Some("540P"));
    }

    #[test]
    fn whole_floats_keep_their_decimal_point() {
        let opts: CommonOptions = toml::from_str("guidance_scale = 6.0\nshift = 8.0\n").unwrap();
        assert_eq!(opts.guidance_scale.as_deref(), Some("6.0"));
        assert_eq!(opts.shift.as_deref(), Some("8.0"));
    }
}
