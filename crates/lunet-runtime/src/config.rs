//! Process-wide runtime configuration.
//!
//! The host may install a [`Config`] once, before the first runtime call;
//! afterwards every lookup sees the same value. Without an explicit
//! [`init`], the defaults apply.

use once_cell::sync::OnceCell;

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

/// Install the global configuration.
///
/// Returns the rejected config if one is already installed (including the
/// defaults, once any runtime operation has read them).
pub fn init(config: Config) -> Result<(), Config> {
    GLOBAL_CONFIG.set(config)
}

/// The installed configuration, or the defaults.
pub fn config() -> &'static Config {
    GLOBAL_CONFIG.get_or_init(Config::default)
}

pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub limits: LimitConfig,
    /// Value installed as `_G._VERSION`.
    pub version: String,
}

/// Bounds on reentrant dispatch.
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Maximum table-valued `__index`/`__newindex` hops for one access.
    pub max_meta_chain: usize,
    /// Maximum nesting of calls made through the calling convention.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitConfig::default(),
            version: "Lua 5.3".to_string(),
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_meta_chain: 2000,
            max_call_depth: 200,
        }
    }
}
