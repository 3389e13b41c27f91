//
// Building the site goes through a few stages
//
// first the output directory is created and the discovery root is walked for markdown files. if
// there are none there is nothing to do and the build stops without writing anything.
//
// every markdown file is then converted on its own, they all read a different source and write a
// different output so they are all started at once and waited on together. eg,
// notes/types/coercion.md -> _site/types/coercion.html
//
// once every page is written the collected page info is sorted by output path and turned into a
// tree, which is rendered into the table of contents at _site/index.html. this is written last so
// it wins over a page that happens to land on the same path.
//
use std::{
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use minijinja::Environment;
use tokio::{fs, task::JoinSet};

use crate::{
    config::Config,
    discover::Discoverer,
    error::{Error, Result},
    page::{Converter, Markdown, PageInfo},
    templates, toc,
    tree::Dir,
};

/// what a build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub pages: Vec<PageInfo>,
    /// location of the table of contents, none when there was nothing to build
    pub toc: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Site {
    config: Config,
    templates: Arc<Environment<'static>>,
}

impl Site {
    pub fn new(config: Config) -> Result<Self> {
        let toc = &config.structure.toc;
        let mut components = Path::new(toc).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !plain || toc.contains(['/', '\\']) {
            return Err(Error::TocNameError(toc.clone()));
        }
        let templates = templates::get_env(config.structure.templates.as_ref())?;
        Ok(Site {
            config,
            templates: Arc::new(templates),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn site_dir(&self) -> PathBuf {
        self.config.structure.site_dir()
    }

    /// run the whole build once
    pub async fn build(&self) -> Result<Summary> {
        let structure = &self.config.structure;
        let site = structure.site_dir();
        fs::create_dir_all(&site)
            .await
            .map_err(|e| Error::create_dir(&site, e))?;

        let source = structure.source_dir();
        let root = fs::canonicalize(&source)
            .await
            .map_err(|e| Error::read_dir(&source, e))?;
        let sources = Discoverer::new(&root, structure.excluded())
            .discover()
            .await?;
        if sources.is_empty() {
            tracing::info!("No markdown files found in `{:?}`, nothing to build", source);
            return Ok(Summary {
                pages: Vec::new(),
                toc: None,
            });
        }
        tracing::info!("Converting {} markdown files", sources.len());

        let converter = Arc::new(Converter::new(
            &root,
            &site,
            structure.toc.clone(),
            Markdown::new(self.config.options.options()),
            self.templates.clone(),
        ));
        let mut pages = convert_all(converter, sources).await?;
        pages.sort_by(|a, b| a.path.cmp(&b.path));

        let toc_path = structure.toc_path();
        if let Some(page) = pages.iter().find(|p| Path::new(&p.path) == Path::new(&structure.toc)) {
            tracing::warn!(
                "`{}` is replaced by the table of contents at `{:?}`",
                page.source,
                toc_path
            );
        }
        let tree = Dir::build(pages.iter().cloned());
        let contents = toc::render(&tree, &self.config.defaults.title, &self.templates)?;
        fs::write(&toc_path, contents)
            .await
            .map_err(|e| Error::write(&toc_path, e))?;
        tracing::info!(
            "Wrote table of contents for {} pages to `{:?}`",
            tree.page_count(),
            toc_path
        );

        Ok(Summary {
            pages,
            toc: Some(toc_path),
        })
    }

    /// remove everything that was generated
    pub async fn clean(&self) -> Result<()> {
        let site = self.site_dir();
        match fs::remove_dir_all(&site).await {
            Ok(()) => {
                tracing::info!("Removed `{:?}`", site);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::write(&site, e)),
        }
    }
}

/// convert every source concurrently, failing with the first error
async fn convert_all(converter: Arc<Converter>, sources: Vec<PathBuf>) -> Result<Vec<PageInfo>> {
    let mut tasks = JoinSet::new();
    for source in sources {
        let converter = converter.clone();
        tasks.spawn(async move { converter.convert(source).await });
    }
    let mut pages = Vec::with_capacity(tasks.len());
    while let Some(result) = tasks.join_next().await {
        pages.push(result??);
    }
    Ok(pages)
}
