//! Method selection, confidence level and per-family analysis options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::sample::SamplingScheme;

/// Supported sensitivity analysis methods.
///
/// Several names are aliases of one analysis routine; see [`MethodFamily`].
/// Names are matched case-insensitively, also when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Method {
    Sobol,
    Latin,
    Delta,
    Dgsm,
    Fast,
    FastSampler,
    Morris,
    Ff,
    FractionalFactorial,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Sobol,
        Method::Latin,
        Method::Delta,
        Method::Dgsm,
        Method::Fast,
        Method::FastSampler,
        Method::Morris,
        Method::Ff,
        Method::FractionalFactorial,
    ];

    pub const NAMES: [&'static str; 9] = [
        "sobol",
        "latin",
        "delta",
        "dgsm",
        "fast",
        "fast_sampler",
        "morris",
        "ff",
        "fractional_factorial",
    ];

    /// Lower-case identifier of the method
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Method::Sobol => "sobol",
            Method::Latin => "latin",
            Method::Delta => "delta",
            Method::Dgsm => "dgsm",
            Method::Fast => "fast",
            Method::FastSampler => "fast_sampler",
            Method::Morris => "morris",
            Method::Ff => "ff",
            Method::FractionalFactorial => "fractional_factorial",
        }
    }

    /// The analysis routine this method dispatches to
    #[must_use]
    pub fn family(self) -> MethodFamily {
        match self {
            Method::Sobol => MethodFamily::Sobol,
            Method::Latin | Method::Delta => MethodFamily::Delta,
            Method::Dgsm => MethodFamily::Dgsm,
            Method::Fast | Method::FastSampler => MethodFamily::Fast,
            Method::Morris => MethodFamily::Morris,
            Method::Ff | Method::FractionalFactorial => MethodFamily::FractionalFactorial,
        }
    }

    /// Sampling scheme the method's estimator assumes
    #[must_use]
    pub fn sampling_scheme(self) -> SamplingScheme {
        self.family().sampling_scheme()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Method::ALL
            .into_iter()
            .find(|m| m.name() == lowered)
            .ok_or(ConfigurationError::UnknownMethod { method: lowered })
    }
}

impl TryFrom<String> for Method {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One analysis routine per family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodFamily {
    Sobol,
    Delta,
    Fast,
    Morris,
    Dgsm,
    FractionalFactorial,
}

impl MethodFamily {
    #[must_use]
    pub fn sampling_scheme(self) -> SamplingScheme {
        match self {
            MethodFamily::Sobol => SamplingScheme::Saltelli,
            MethodFamily::Delta => SamplingScheme::Latin,
            MethodFamily::Fast => SamplingScheme::Fast,
            MethodFamily::Morris => SamplingScheme::Morris,
            MethodFamily::Dgsm => SamplingScheme::FiniteDiff,
            MethodFamily::FractionalFactorial => SamplingScheme::FractionalFactorial,
        }
    }

    /// Warning text for methods whose samples must follow a particular scheme.
    ///
    /// DGSM has none: its finite-difference layout is checked structurally.
    #[must_use]
    pub fn advisory(self) -> Option<&'static str> {
        match self {
            MethodFamily::Sobol => Some("'sobol' method requires 'saltelli' sampling scheme!"),
            MethodFamily::Delta => {
                Some("'latin' sampling scheme is recommended for 'delta' method!")
            }
            MethodFamily::Fast => Some("'fast' method requires 'fast_sampler' sampling scheme!"),
            MethodFamily::Morris => Some("'morris' method requires 'morris' sampling scheme!"),
            MethodFamily::FractionalFactorial => Some(
                "'fractional_factorial' method requires 'fractional_factorial' sampling scheme!",
            ),
            MethodFamily::Dgsm => None,
        }
    }
}

/// Confidence level for bootstrap intervals, strictly inside (0, 1)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfLevel(f64);

impl ConfLevel {
    pub const DEFAULT: ConfLevel = ConfLevel(0.95);

    pub fn new(value: f64) -> Result<Self, ConfigurationError> {
        if value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigurationError::ConfLevel { value })
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ConfLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for ConfLevel {
    type Error = ConfigurationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfLevel> for f64 {
    fn from(level: ConfLevel) -> Self {
        level.0
    }
}

// ============================================================================
// Per-family options
// ============================================================================

const DEFAULT_NUM_RESAMPLES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SobolOptions {
    /// Bootstrap resamples for the confidence intervals
    pub num_resamples: usize,
    /// Compute per-variable indices on the rayon pool
    pub parallel: bool,
    /// Thread count for the pool, the global pool when `None`
    pub n_processors: Option<usize>,
    pub print_to_console: bool,
}

impl Default for SobolOptions {
    fn default() -> Self {
        Self {
            num_resamples: DEFAULT_NUM_RESAMPLES,
            parallel: false,
            n_processors: None,
            print_to_console: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaOptions {
    pub num_resamples: usize,
    pub print_to_console: bool,
}

impl Default for DeltaOptions {
    fn default() -> Self {
        Self {
            num_resamples: DEFAULT_NUM_RESAMPLES,
            print_to_console: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastOptions {
    /// Interference parameter: number of harmonics summed in the Fourier decomposition
    #[serde(rename = "M")]
    pub m: usize,
    pub print_to_console: bool,
}

impl Default for FastOptions {
    fn default() -> Self {
        Self {
            m: 4,
            print_to_console: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorrisOptions {
    pub num_resamples: usize,
    /// Grid jump size; must match the value used for sampling
    pub grid_jump: usize,
    /// Number of grid levels; must match the value used for sampling
    pub num_levels: usize,
    pub print_to_console: bool,
}

impl Default for MorrisOptions {
    fn default() -> Self {
        Self {
            num_resamples: DEFAULT_NUM_RESAMPLES,
            grid_jump: 2,
            num_levels: 4,
            print_to_console: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DgsmOptions {
    pub num_resamples: usize,
    pub print_to_console: bool,
}

impl Default for DgsmOptions {
    fn default() -> Self {
        Self {
            num_resamples: DEFAULT_NUM_RESAMPLES,
            print_to_console: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractionalFactorialOptions {
    pub print_to_console: bool,
}

/// Explicit options for one analysis family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodOptions {
    Sobol(SobolOptions),
    Delta(DeltaOptions),
    Fast(FastOptions),
    Morris(MorrisOptions),
    Dgsm(DgsmOptions),
    FractionalFactorial(FractionalFactorialOptions),
}

impl MethodOptions {
    /// Default options for a family
    #[must_use]
    pub fn defaults_for(family: MethodFamily) -> Self {
        match family {
            MethodFamily::Sobol => MethodOptions::Sobol(SobolOptions::default()),
            MethodFamily::Delta => MethodOptions::Delta(DeltaOptions::default()),
            MethodFamily::Fast => MethodOptions::Fast(FastOptions::default()),
            MethodFamily::Morris => MethodOptions::Morris(MorrisOptions::default()),
            MethodFamily::Dgsm => MethodOptions::Dgsm(DgsmOptions::default()),
            MethodFamily::FractionalFactorial => {
                MethodOptions::FractionalFactorial(FractionalFactorialOptions::default())
            }
        }
    }

    #[must_use]
    pub fn family(&self) -> MethodFamily {
        match self {
            MethodOptions::Sobol(_) => MethodFamily::Sobol,
            MethodOptions::Delta(_) => MethodFamily::Delta,
            MethodOptions::Fast(_) => MethodFamily::Fast,
            MethodOptions::Morris(_) => MethodFamily::Morris,
            MethodOptions::Dgsm(_) => MethodFamily::Dgsm,
            MethodOptions::FractionalFactorial(_) => MethodFamily::FractionalFactorial,
        }
    }

    #[must_use]
    pub fn print_to_console(&self) -> bool {
        match self {
            MethodOptions::Sobol(o) => o.print_to_console,
            MethodOptions::Delta(o) => o.print_to_console,
            MethodOptions::Fast(o) => o.print_to_console,
            MethodOptions::Morris(o) => o.print_to_console,
            MethodOptions::Dgsm(o) => o.print_to_console,
            MethodOptions::FractionalFactorial(o) => o.print_to_console,
        }
    }

    /// Resolve the options for `method`: family defaults when absent, an
    /// error when the supplied options belong to another family.
    pub fn resolve(
        method: Method,
        options: Option<MethodOptions>,
    ) -> Result<MethodOptions, ConfigurationError> {
        let options = options.unwrap_or_else(|| Self::defaults_for(method.family()));
        if options.family() != method.family() {
            return Err(ConfigurationError::OptionsMismatch {
                method,
                options: options.family(),
            });
        }
        options.validate()?;
        Ok(options)
    }

    /// Check option values against the ranges the routines accept
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let family = self.family();
        let invalid = |option: &'static str, value: String, reason: &'static str| {
            Err(ConfigurationError::InvalidOption {
                family,
                option,
                value,
                reason,
            })
        };

        let num_resamples = match self {
            MethodOptions::Sobol(o) => Some(o.num_resamples),
            MethodOptions::Delta(o) => Some(o.num_resamples),
            MethodOptions::Morris(o) => Some(o.num_resamples),
            MethodOptions::Dgsm(o) => Some(o.num_resamples),
            MethodOptions::Fast(_) | MethodOptions::FractionalFactorial(_) => None,
        };
        if num_resamples == Some(0) {
            return invalid("num_resamples", "0".to_string(), "must be at least 1");
        }

        match self {
            MethodOptions::Sobol(SobolOptions {
                n_processors: Some(0),
                ..
            }) => invalid("n_processors", "0".to_string(), "must be at least 1"),
            MethodOptions::Fast(o) if o.m == 0 => {
                invalid("M", o.m.to_string(), "must be at least 1")
            }
            MethodOptions::Morris(o) if o.num_levels < 2 => invalid(
                "num_levels",
                o.num_levels.to_string(),
                "must be at least 2",
            ),
            MethodOptions::Morris(o) if o.grid_jump == 0 || o.grid_jump >= o.num_levels => invalid(
                "grid_jump",
                o.grid_jump.to_string(),
                "must be in 1..num_levels",
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("SOBOL".parse::<Method>().unwrap(), Method::Sobol);
        assert_eq!("Fast_Sampler".parse::<Method>().unwrap(), Method::FastSampler);
        assert!(matches!(
            "anova".parse::<Method>(),
            Err(ConfigurationError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_unknown_method_lists_supported_set() {
        let err = "anova".parse::<Method>().unwrap_err();
        let msg = err.to_string();
        for name in Method::NAMES {
            assert!(msg.contains(name), "{msg} should list {name}");
        }
    }

    #[test]
    fn test_names_match_variants() {
        for (method, name) in Method::ALL.iter().zip(Method::NAMES) {
            assert_eq!(method.name(), name);
        }
    }

    #[test]
    fn test_aliases_share_family() {
        assert_eq!(Method::Latin.family(), Method::Delta.family());
        assert_eq!(Method::Fast.family(), Method::FastSampler.family());
        assert_eq!(Method::Ff.family(), Method::FractionalFactorial.family());
    }

    #[test]
    fn test_conf_level_bounds() {
        assert!(ConfLevel::new(0.5).is_ok());
        assert!(ConfLevel::new(1e-9).is_ok());
        assert!(ConfLevel::new(0.0).is_err());
        assert!(ConfLevel::new(1.0).is_err());
        assert!(ConfLevel::new(f64::NAN).is_err());
    }

    #[test]
    fn test_resolve_defaults_and_mismatch() {
        let resolved = MethodOptions::resolve(Method::Morris, None).unwrap();
        assert_eq!(resolved, MethodOptions::Morris(MorrisOptions::default()));

        let err = MethodOptions::resolve(
            Method::Sobol,
            Some(MethodOptions::Fast(FastOptions::default())),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::OptionsMismatch { .. }));
    }

    #[test]
    fn test_validate_morris_grid() {
        let opts = MethodOptions::Morris(MorrisOptions {
            grid_jump: 4,
            num_levels: 4,
            ..Default::default()
        });
        assert!(opts.validate().is_err());
    }
}
