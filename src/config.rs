use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::{Error, Figment, Metadata, Provider};
use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};

/// default directory values
pub const SOURCE_DIR: &str = ".";
pub const OUT_DIR: &str = "_site";
pub const TOC_FILE: &str = "index.html";
pub const DEPENDENCY_DIR: &str = "node_modules";
pub const CONFIG_FILE: &str = "notedown.toml";
pub const ENV_PREFIX: &str = "NOTEDOWN_";

/// config for managing the build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub structure: ConfigStructure,
    pub options: ConfigOptions,
    pub defaults: ConfigDefaults,
    pub serve: ConfigServe,
}

/// config for defining where things are read from and written to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStructure {
    /// the directory that is scanned for markdown files
    pub source: String,
    /// the output directory the html is written to
    pub site: String,
    /// file name of the table of contents, placed directly under `site`
    pub toc: String,
    /// directory names that are never descended into, on top of `site` and hidden entries
    pub exclude: Vec<String>,
    /// directory with `page.html` and/or `toc.html` replacing the built in templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<String>,
}

/// config options for the markdown parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub footnotes: bool,
    /// enable math mode
    pub math: bool,
}

/// defaults used when generating pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    /// heading of the table of contents page
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigServe {
    pub port: u16,
}

impl Default for ConfigStructure {
    fn default() -> Self {
        Self {
            source: SOURCE_DIR.into(),
            site: OUT_DIR.into(),
            toc: TOC_FILE.into(),
            exclude: vec![DEPENDENCY_DIR.into()],
            templates: None,
        }
    }
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: true,
            math: false,
        }
    }
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            title: "Table of Contents".into(),
        }
    }
}

impl Default for ConfigServe {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Self::default())
    }

    pub fn from<T: Provider>(provider: T) -> Result<Self, Error> {
        Figment::from(provider).extract()
    }

    /// defaults, then the toml file if it exists, then `NOTEDOWN_` variables
    pub fn load<T: AsRef<Path>>(file: T) -> Result<Self, Error> {
        Self::figment()
            .merge(Toml::file(file.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Notedown config")
    }
    fn data(&self) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, Error> {
        Serialized::defaults(self).data()
    }
}

impl ConfigStructure {
    pub fn source_dir(&self) -> PathBuf {
        PathBuf::from(&self.source)
    }

    pub fn site_dir(&self) -> PathBuf {
        PathBuf::from(&self.site)
    }

    pub fn toc_path(&self) -> PathBuf {
        self.site_dir().join(&self.toc)
    }

    /// every directory name the discovery skips: the output directory and the configured excludes
    pub fn excluded(&self) -> Vec<String> {
        let mut names = self.exclude.clone();
        if let Some(name) = Path::new(&self.site).file_name() {
            names.push(name.to_string_lossy().into_owned());
        }
        names
    }
}

impl ConfigOptions {
    pub fn options(&self) -> Options {
        let mut options = Options::empty();
        if self.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.math {
            options.insert(Options::ENABLE_MATH);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from(Config::default()).unwrap();
        assert_eq!(config.structure.source, ".");
        assert_eq!(config.structure.site, "_site");
        assert_eq!(config.structure.toc_path(), PathBuf::from("_site/index.html"));
        assert!(config.structure.templates.is_none());
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.defaults.title, "Table of Contents");
    }

    #[test]
    fn toml_overrides_defaults() {
        let config: Config = Config::figment()
            .merge(Toml::string(
                r#"
                [structure]
                site = "build/html"
                exclude = ["vendor"]
                templates = "layout"

                [options]
                math = true
                tables = false
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(config.structure.site, "build/html");
        assert_eq!(config.structure.toc, "index.html");
        assert_eq!(config.structure.templates.as_deref(), Some("layout"));
        assert_eq!(config.structure.excluded(), vec!["vendor", "html"]);

        let options = config.options.options();
        assert!(options.contains(Options::ENABLE_MATH));
        assert!(!options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
    }

    #[test]
    fn excluded_includes_output_and_dependencies() {
        let structure = ConfigStructure::default();
        assert_eq!(structure.excluded(), vec!["node_modules", "_site"]);
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.structure.site, OUT_DIR);
        assert!(!config.options.options().contains(Options::ENABLE_MATH));
    }
}
