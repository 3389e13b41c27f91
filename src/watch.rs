use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration,
};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use tokio::sync::mpsc;

use crate::{
    discover::is_markdown,
    error::{Error, Result},
    site::Site,
};

const DEBOUNCE: Duration = Duration::from_secs(1);

/// decides which changed paths call for a rebuild
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    site_dir: PathBuf,
    template_dir: Option<PathBuf>,
}

impl ChangeFilter {
    pub fn new(site_dir: PathBuf, template_dir: Option<PathBuf>) -> Self {
        Self {
            site_dir,
            template_dir,
        }
    }

    /// markdown outside the output directory, or anything in the template directory
    pub fn is_relevant<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        if path.starts_with(&self.site_dir) {
            return false;
        }
        if let Some(templates) = &self.template_dir {
            if path.starts_with(templates) {
                return true;
            }
        }
        is_markdown(path)
    }
}

/// build once, then rebuild on every relevant change until the watcher goes away
pub async fn watch(site: &Site) -> Result<()> {
    if let Err(err) = site.build().await {
        tracing::error!("Encountered error `{err}`");
    }

    let structure = &site.config().structure;
    let source = tokio::fs::canonicalize(structure.source_dir())
        .await
        .map_err(|e| Error::read_dir(structure.source_dir(), e))?;
    let site_dir = match tokio::fs::canonicalize(structure.site_dir()).await {
        Ok(dir) => dir,
        Err(_) => std::path::absolute(structure.site_dir())
            .map_err(|e| Error::read_dir(structure.site_dir(), e))?,
    };
    let template_dir = match &structure.templates {
        Some(dir) => tokio::fs::canonicalize(dir).await.ok(),
        None => None,
    };
    let filter = ChangeFilter::new(site_dir, template_dir.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut debouncer = new_debouncer(DEBOUNCE, None, move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;
    debouncer
        .watcher()
        .watch(&source, RecursiveMode::Recursive)?;
    if let Some(dir) = &template_dir {
        if !dir.starts_with(&source) {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
        }
    }
    tracing::info!("Watching `{:?}` for changes", source);

    while let Some(res) = rx.recv().await {
        match res {
            Ok(events) => {
                let updated: HashSet<_> = events
                    .iter()
                    .flat_map(|e| e.paths.iter())
                    .filter(|p| filter.is_relevant(p))
                    .cloned()
                    .collect();
                if updated.is_empty() {
                    continue;
                }
                tracing::info!("Changes in: {updated:?}");
                tracing::info!("Regenerating");
                if let Err(err) = site.build().await {
                    tracing::error!("Encountered error `{err}`");
                }
            }
            Err(errors) => {
                for error in errors {
                    tracing::warn!("Error received `{error:?}`");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_changes() {
        let filter = ChangeFilter::new(
            PathBuf::from("/notes/_site"),
            Some(PathBuf::from("/notes/layout")),
        );
        assert!(filter.is_relevant("/notes/closures.md"));
        assert!(filter.is_relevant("/notes/deep/this.md"));
        assert!(filter.is_relevant("/notes/layout/page.html"));
        assert!(!filter.is_relevant("/notes/_site/closures.html"));
        assert!(!filter.is_relevant("/notes/_site/stale.md"));
        assert!(!filter.is_relevant("/notes/package.json"));
    }

    #[test]
    fn no_template_dir() {
        let filter = ChangeFilter::new(PathBuf::from("/notes/_site"), None);
        assert!(!filter.is_relevant("/notes/layout/page.html"));
        assert!(filter.is_relevant("/notes/layout/readme.md"));
    }
}
