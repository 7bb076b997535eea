use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::str::FromStr;

use camino::Utf8Path;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TurtlesimSrvError};
use crate::registry::ServiceName;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = TurtlesimSrvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(TurtlesimSrvError::ConfigError {
                message: format!("unknown output format '{other}', expected 'text' or 'json'"),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(rename = "filter")]
    service_filter: ServiceFilter,
    format: OutputFormat,
}

impl Config {
    pub fn new(service_filter: ServiceFilter, format: OutputFormat) -> Self {
        Self {
            service_filter,
            format,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Utf8Path) -> Result<Self> {
        debug!(%path, "loading config");
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn service_filter(&self) -> &ServiceFilter {
        &self.service_filter
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_include_services(mut self, include: Option<BTreeSet<String>>) -> Self {
        self.service_filter.set_include(include);
        self
    }

    pub fn set_exclude_services(mut self, exclude: Option<BTreeSet<String>>) -> Self {
        self.service_filter.set_exclude(exclude);
        self
    }

    pub fn set_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.service_filter.validate()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceFilter {
    include: Option<BTreeSet<String>>,
    exclude: Option<BTreeSet<String>>,
}

impl ServiceFilter {
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Some(names.into_iter().map(Into::into).collect()),
            exclude: None,
        }
    }

    pub fn exclude<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: None,
            exclude: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn set_include(&mut self, include: Option<BTreeSet<String>>) {
        self.include = include;
    }

    pub fn set_exclude(&mut self, exclude: Option<BTreeSet<String>>) {
        self.exclude = exclude;
    }

    pub fn validate(&self) -> Result<()> {
        if self.include.is_some() && self.exclude.is_some() {
            return Err(TurtlesimSrvError::ConfigError {
                message: "include and exclude filters cannot be used together".to_string(),
            });
        }
        for name in self.include.iter().chain(self.exclude.iter()).flatten() {
            name.parse::<ServiceName>()?;
        }
        Ok(())
    }

    pub fn matches(&self, name: ServiceName) -> bool {
        let contains = |names: &BTreeSet<String>| {
            names
                .iter()
                .any(|n| n.parse::<ServiceName>().is_ok_and(|parsed| parsed == name))
        };
        if let Some(include) = &self.include {
            if !contains(include) {
                return false;
            }
        }
        if let Some(exclude) = &self.exclude {
            if contains(exclude) {
                return false;
            }
        }
        true
    }
}
