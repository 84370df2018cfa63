use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use crate::{
    builder::ChangelogBuilder,
    error::{Error, Result},
    link_style::LinkStyle,
    model::Changelog,
    DEFAULT_CONFIG_FILE,
};

/// The contents of a `.relnote.toml` file. Every table and key is optional
/// and unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCfg {
    pub generate: GenerateCfg,
    pub filters: FilterCfg,
    pub sections: SectionsCfg,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GenerateCfg {
    pub repository: Option<String>,
    pub link_style: LinkStyle,
    pub include_scopes: bool,
    pub no_merge_commits: bool,
    pub no_prs: bool,
    /// Read by callers through `GenerateCfg::check_empty`
    pub fail_on_empty: bool,
}

impl Default for GenerateCfg {
    fn default() -> Self {
        GenerateCfg {
            repository: None,
            link_style: LinkStyle::Github,
            include_scopes: true,
            no_merge_commits: false,
            no_prs: false,
            fail_on_empty: false,
        }
    }
}

impl GenerateCfg {
    /// Turns an empty changelog into `Error::EmptyChangelog` when
    /// `fail-on-empty` is set.
    pub fn check_empty(&self, changelog: &Changelog) -> Result<()> {
        if self.fail_on_empty && changelog.is_empty() {
            return Err(Error::EmptyChangelog(changelog.version.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterCfg {
    pub include_types: Vec<String>,
    pub exclude_scopes: Vec<String>,
    pub author_filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionsCfg {
    /// Canonical section order, the built-in order when absent
    pub order: Option<Vec<String>>,
}

impl RawCfg {
    /// Parses a configuration from TOML text.
    ///
    /// # Example
    ///
    /// ```
    /// # use relnote::config::RawCfg;
    /// let cfg = RawCfg::from_toml_str("[filters]\nexclude-scopes = [\"deps\"]").unwrap();
    /// assert_eq!(cfg.filters.exclude_scopes, ["deps"]);
    /// assert!(cfg.generate.include_scopes);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<RawCfg> {
        toml::from_str(s).map_err(Into::into)
    }

    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<RawCfg> {
        let path = file.as_ref();
        debug!("Reading config file: {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `.relnote.toml` from `dir`, falling back to the defaults when the
    /// file does not exist.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<RawCfg> {
        let file: PathBuf = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if file.is_file() {
            RawCfg::from_file(file)
        } else {
            debug!("No config file at {:?}, using defaults", file);
            Ok(RawCfg::default())
        }
    }

    /// A builder carrying every option of this configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthorFilter` for an invalid `author-filter` regex.
    pub fn to_builder(&self) -> Result<ChangelogBuilder> {
        let generate = &self.generate;
        let mut builder = ChangelogBuilder::new()
            .link_style(generate.link_style)
            .include_scopes(generate.include_scopes)
            .no_merge_commits(generate.no_merge_commits)
            .no_prs(generate.no_prs)
            .include_types(&self.filters.include_types)
            .exclude_scopes(self.filters.exclude_scopes.iter().cloned());
        if let Some(repo) = &generate.repository {
            builder = builder.repository(repo.as_str());
        }
        if let Some(order) = &self.sections.order {
            builder = builder.section_order(order);
        }
        if let Some(pattern) = &self.filters.author_filter {
            builder = builder.author_filter(pattern)?;
        }
        Ok(builder)
    }
}
