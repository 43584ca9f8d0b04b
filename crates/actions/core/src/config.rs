/// Engine configuration and tunable parameters.
///
/// Loaded from TOML by `actions-content::ConfigLoader`; every field has a
/// default so partial files are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Seed for chance-based stat effects. `None` seeds from OS entropy.
    pub chance_seed: Option<u64>,

    /// Upper bound for a single verification suspension, in milliseconds.
    ///
    /// `None` waits for the resource store indefinitely: a verification whose
    /// answer never arrives never completes.
    pub verification_timeout_ms: Option<u64>,
}

impl EngineConfig {
    pub const fn new() -> Self {
        Self {
            chance_seed: None,
            verification_timeout_ms: None,
        }
    }

    #[must_use]
    pub const fn with_chance_seed(mut self, seed: u64) -> Self {
        self.chance_seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn with_verification_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.verification_timeout_ms = Some(timeout_ms);
        self
    }
}
