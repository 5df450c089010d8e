use std::env;
use std::str::FromStr;

use crate::canvas::Canvas;
use crate::displacement::DisplacementModel;
use crate::error::{PlasmaError, Result};

pub const ENV_WIDTH: &str = "PLASMA_WIDTH";
pub const ENV_HEIGHT: &str = "PLASMA_HEIGHT";
pub const ENV_SEED: &str = "PLASMA_SEED";
pub const ENV_PARALLEL: &str = "PLASMA_PARALLEL";

// Parameters of one plasma generation
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaConfig {
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>, // None draws a fresh seed from the OS
    pub displacement: DisplacementModel,
    pub parallel: bool,
}

impl Default for PlasmaConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            seed: None,
            displacement: DisplacementModel::default(),
            parallel: false,
        }
    }
}

impl PlasmaConfig {
    // Defaults overridden by PLASMA_* environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Same as `from_env` with an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(width) = parse_var(&lookup, ENV_WIDTH)? {
            cfg.width = width;
        }
        if let Some(height) = parse_var(&lookup, ENV_HEIGHT)? {
            cfg.height = height;
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            cfg.seed = Some(seed);
        }
        if let Some(raw) = lookup(ENV_PARALLEL) {
            let flag = raw.trim().to_ascii_lowercase();
            cfg.parallel = match flag.as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(PlasmaError::Config {
                        key: ENV_PARALLEL,
                        value: raw,
                    });
                }
            };
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.canvas()?;
        self.displacement.validate()
    }

    pub fn canvas(&self) -> Result<Canvas> {
        Canvas::new(self.width, self.height)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PlasmaError::Config { key, value: raw }),
        None => Ok(None),
    }
}
