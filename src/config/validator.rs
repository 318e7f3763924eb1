use crate::output;
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// Checks a configuration file for keys hashtool does not understand
pub struct ConfigValidator {
    /// Every recognized `section.key`
    known_fields: HashSet<&'static str>,
    /// Recognized section names
    known_sections: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields: HashSet<_> = [
            "filter.exclude",
            "filter.include",
            "generate.backup",
            "unchecked.scope",
            "output.color",
        ]
        .into_iter()
        .collect();
        let known_sections = known_fields
            .iter()
            .filter_map(|field| field.split_once('.').map(|(section, _)| section))
            .collect();

        Self {
            known_fields,
            known_sections,
        }
    }

    /// Collect the unknown keys of a TOML document, in document order.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML.
    pub fn unknown_fields(&self, content: &str) -> Result<Vec<String>> {
        let parsed: toml::Table = toml::from_str(content)?;
        let mut unknown = Vec::new();

        for (section, value) in &parsed {
            if !self.known_sections.contains(section.as_str()) {
                unknown.push(section.clone());
                continue;
            }
            let Some(table) = value.as_table() else {
                unknown.push(section.clone());
                continue;
            };
            for key in table.keys() {
                let full_key = format!("{section}.{key}");
                if !self.known_fields.contains(full_key.as_str()) {
                    unknown.push(full_key);
                }
            }
        }

        Ok(unknown)
    }

    /// Validate a configuration file and warn about unknown keys
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn validate_config_file(&self, config_path: &Path) -> Result<()> {
        if !config_path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let unknown = self.unknown_fields(&content)?;

        if !unknown.is_empty() {
            output::warning("Configuration warnings:");
            for field in &unknown {
                output::warning(&format!("  Unknown configuration field: {}", field.yellow()));
            }
        }

        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_fields_pass() -> Result<()> {
        let validator = ConfigValidator::new();
        let unknown = validator.unknown_fields(
            "[filter]\nexclude = []\n[generate]\nbackup = true\n[output]\ncolor = false\n",
        )?;
        assert!(unknown.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_fields_reported() -> Result<()> {
        let validator = ConfigValidator::new();
        let unknown = validator.unknown_fields(
            "[generate]\nbackup = true\nthreads = 4\n[core]\nrepo = \"x\"\n",
        )?;
        assert!(unknown.contains(&"generate.threads".to_string()));
        assert!(unknown.contains(&"core".to_string()));
        assert_eq!(unknown.len(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(ConfigValidator::new().unknown_fields("[filter").is_err());
    }
}
