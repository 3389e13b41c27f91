use std::{
    path::{Component, Path, PathBuf},
    sync::{Arc, LazyLock},
};

use minijinja::{context, Environment};
use pulldown_cmark::{Options, Parser};
use regex::Regex;
use serde::Serialize;
use tokio::fs;

use crate::error::{Error, Result};
use crate::templates::PAGE_TEMPLATE;

pub const HTML_EXTENSION: &str = "html";

/// first top level heading anywhere in the document
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^#\s+(.+)$").expect("title pattern is valid"));

/// data for a converted page, used to build the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// location of the html relative to the output directory, `/` separated
    pub path: String,
    /// location of the markdown relative to the discovery root, `/` separated
    pub source: String,
    pub title: String,
    /// number of directories between the discovery root and the source
    pub depth: usize,
}

impl PageInfo {
    /// path segments of the output location, empty segments removed
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

/// markdown to html with a fixed set of parser options
#[derive(Debug, Clone, Copy)]
pub struct Markdown {
    options: Options,
}

impl Markdown {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn to_html(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, self.options);
        let mut contents = String::with_capacity(text.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut contents, parser);
        contents
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new(Options::empty())
    }
}

/// title from the first `# heading` line, otherwise the fallback
pub fn extract_title(text: &str, fallback: &str) -> String {
    TITLE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// the `/` separated form of a relative path
fn slash_path<T: AsRef<Path>>(path: T) -> Result<String> {
    let path = path.as_ref();
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(s) => segments.push(
                s.to_str()
                    .ok_or_else(|| Error::PageError(path.into()))?
                    .to_string(),
            ),
            Component::CurDir => {}
            _ => return Err(Error::PageError(path.into())),
        }
    }
    Ok(segments.join("/"))
}

/// converts markdown sources under `root` into html pages under `site`
#[derive(Debug)]
pub struct Converter {
    root: PathBuf,
    site: PathBuf,
    toc: String,
    markdown: Markdown,
    templates: Arc<Environment<'static>>,
}

impl Converter {
    pub fn new<R: AsRef<Path>, S: AsRef<Path>>(
        root: R,
        site: S,
        toc: impl Into<String>,
        markdown: Markdown,
        templates: Arc<Environment<'static>>,
    ) -> Self {
        Self {
            root: root.as_ref().into(),
            site: site.as_ref().into(),
            toc: toc.into(),
            markdown,
            templates,
        }
    }

    /// where the html for `source` ends up, relative to the output directory
    pub fn output_path<T: AsRef<Path>>(&self, source: T) -> Result<PathBuf> {
        let source = source.as_ref();
        let mut rel = source
            .strip_prefix(&self.root)
            .map_err(|_| Error::PageError(source.into()))?
            .to_path_buf();
        if rel.file_stem().is_none() {
            return Err(Error::PageError(source.into()));
        }
        rel.set_extension(HTML_EXTENSION);
        Ok(rel)
    }

    /// render one markdown file and write the page, overwriting what was there
    pub async fn convert<T: AsRef<Path>>(&self, source: T) -> Result<PageInfo> {
        let source = source.as_ref();
        let text = fs::read_to_string(source)
            .await
            .map_err(|e| Error::read(source, e))?;
        let content = self.markdown.to_html(&text);

        let rel = source
            .strip_prefix(&self.root)
            .map_err(|_| Error::PageError(source.into()))?;
        let output = self.output_path(source)?;
        let save = self.site.join(&output);
        if let Some(parent) = save.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::create_dir(parent, e))?;
        }

        let stem = rel
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| Error::PageError(source.into()))?;
        let info = PageInfo {
            path: slash_path(&output)?,
            source: slash_path(rel)?,
            title: extract_title(&text, &stem),
            depth: rel.components().count().saturating_sub(1),
        };

        let template = self.templates.get_template(PAGE_TEMPLATE)?;
        let contents = template.render(context! {
            title => &info.title,
            content => content,
            source => &info.source,
            root => "../".repeat(info.depth),
            toc => &self.toc,
        })?;
        fs::write(&save, contents)
            .await
            .map_err(|e| Error::write(&save, e))?;
        tracing::info!("Converted `{}` -> `{}`", info.source, info.path);
        Ok(info)
    }
}
