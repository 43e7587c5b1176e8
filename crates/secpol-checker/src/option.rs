// SPDX-License-Identifier: Apache-2.0

//! Module options: named lists of string values a module's behavior can
//! be tuned with before it runs.

use secpol_common::{Error, Result};

#[derive(Debug, Clone)]
pub struct ModuleOption {
    pub description: String,
    pub values: Vec<String>,
}

impl ModuleOption {
    pub fn new(description: impl Into<String>, default_values: Vec<String>) -> Self {
        ModuleOption {
            description: description.into(),
            values: default_values,
        }
    }

    /// Override or append `values`. `values` may not be empty.
    pub fn set(&mut self, values: Vec<String>, override_existing: bool) -> Result<()> {
        if values.is_empty() {
            return Err(Error::input("option values must not be empty"));
        }
        if override_existing {
            self.values = values;
        } else {
            self.values.extend(values);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_replaces_append_extends() {
        let mut opt = ModuleOption::new("domain attributes", vec!["domain".into()]);
        opt.set(vec!["extra_domain".into()], false).unwrap();
        assert_eq!(opt.values, vec!["domain", "extra_domain"]);
        opt.set(vec!["only_this".into()], true).unwrap();
        assert_eq!(opt.values, vec!["only_this"]);
    }

    #[test]
    fn empty_values_rejected() {
        let mut opt = ModuleOption::new("x", vec![]);
        assert!(opt.set(vec![], true).is_err());
    }
}
