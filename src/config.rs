//! Encoding knobs.
//!
//! `add_max_args` and `xor_max_args` bound how many arguments a single
//! word-level add or xor may fold before the downstream CNF/ANF encoder
//! starts chaining fresh variables, trading clause/equation count for
//! circuit depth. Both are validated `ConfigOption<u32>` fields, following
//! this crate's usual pattern for bounded tunables.
//!
//! Consulted by [`crate::word::add_many`] (and the `Cnf`/`Anf` inherent
//! `add_many` wrappers) for `add_max_args`, and by `Cnf`'s and `Anf`'s
//! `Encoder::alloc_xor_many` overrides for `xor_max_args`.

use crate::error::DomainError;

/// A single bounded, named configuration value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    value: T,
}

impl ConfigOption<u32> {
    const fn new(name: &'static str, min: u32, max: u32, default: u32) -> Self {
        Self {
            name,
            min,
            max,
            value: default,
        }
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    pub fn set(&mut self, value: u32) -> Result<(), DomainError> {
        if value < self.min || value > self.max {
            return Err(DomainError::ConfigOutOfRange {
                name: self.name,
                min: self.min,
                max: self.max,
                value,
            });
        }
        self.value = value;
        Ok(())
    }
}

/// Encoding-time configuration shared by [`crate::cnf::Cnf`] and [`crate::anf::Anf`].
#[derive(Clone, Copy, Debug)]
pub struct EncodingConfig {
    pub add_max_args: ConfigOption<u32>,
    pub xor_max_args: ConfigOption<u32>,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            add_max_args: ConfigOption::new("add_max_args", 2, 6, 3),
            xor_max_args: ConfigOption::new("xor_max_args", 2, 10, 3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EncodingConfig::default();
        assert_eq!(config.add_max_args.get(), 3);
        assert_eq!(config.xor_max_args.get(), 3);
    }

    #[test]
    fn out_of_range_is_a_domain_error() {
        let mut config = EncodingConfig::default();
        assert!(config.add_max_args.set(1).is_err());
        assert!(config.add_max_args.set(7).is_err());
        assert!(config.xor_max_args.set(11).is_err());
        assert!(config.add_max_args.set(6).is_ok());
    }
}
