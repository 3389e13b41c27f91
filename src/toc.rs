//! Rendering the navigation tree into the table of contents page.

use std::cmp::Ordering;

use feruca::{Collator, Locale, Tailoring};
use minijinja::{context, Environment};
use serde::Serialize;

use crate::error::Result;
use crate::templates::TOC_TEMPLATE;
use crate::tree::{Dir, TreeNode};

/// a sorted entry of the table of contents as handed to the template
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub name: String,
    /// page title, the directory name for directories
    pub title: String,
    /// link relative to the output directory, only set for pages
    pub link: Option<String>,
    pub dir: bool,
    pub children: Vec<TocEntry>,
}

/// CLDR root collation with punctuation kept significant, the same order a
/// browser's default `localeCompare` gives
pub fn collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// directories before files, then by collated name
pub fn compare(collator: &mut Collator, a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| collator.collate(a.name(), b.name()))
}

fn entry(collator: &mut Collator, node: TreeNode) -> TocEntry {
    match node {
        TreeNode::Dir(d) => TocEntry {
            name: d.name.clone(),
            title: d.name.clone(),
            link: None,
            dir: true,
            children: sorted_entries(collator, d),
        },
        TreeNode::File(f) => TocEntry {
            name: f.name.clone(),
            title: f.page.title.clone(),
            link: Some(f.page.path.clone()),
            dir: false,
            children: Vec::new(),
        },
    }
}

fn sorted_entries(collator: &mut Collator, dir: &Dir) -> Vec<TocEntry> {
    let mut children: Vec<TreeNode> = dir.children().collect();
    children.sort_by(|a, b| compare(collator, a, b));
    children
        .into_iter()
        .map(|node| entry(collator, node))
        .collect()
}

/// the children of `dir`, sorted at every level
pub fn entries(dir: &Dir) -> Vec<TocEntry> {
    sorted_entries(&mut collator(), dir)
}

/// the full table of contents page for the tree below `root`
pub fn render(root: &Dir, title: &str, env: &Environment) -> Result<String> {
    let template = env.get_template(TOC_TEMPLATE)?;
    let contents = template.render(context! {
        title => title,
        count => root.page_count(),
        entries => entries(root),
    })?;
    Ok(contents)
}
