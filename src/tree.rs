use crate::page::PageInfo;

// -----
// The tree datastructure
// -----

/// a directory, owns the directories and pages below it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dir {
    pub name: String,
    /// path prefix of everything below, `/` separated, empty for the root
    pub path: String,
    pub dirs: Vec<Dir>,
    pub files: Vec<File>,
}

/// a page attached to its last path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub path: String,
    pub page: PageInfo,
}

/// a node of the navigation tree, either a directory or a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeNode<'a> {
    Dir(&'a Dir),
    File(&'a File),
}

impl<'a> TreeNode<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            TreeNode::Dir(d) => &d.name,
            TreeNode::File(f) => &f.name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Dir(_))
    }
}

fn child_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

// -----
// Building the tree from the converted pages
// -----

impl Dir {
    /// the synthetic root directory
    pub fn root() -> Self {
        Self::default()
    }

    /// build the tree from pages already sorted by output path
    pub fn build(pages: impl IntoIterator<Item = PageInfo>) -> Self {
        let mut root = Self::root();
        for page in pages {
            root.insert(page);
        }
        root
    }

    /// directories then pages, in insertion order
    pub fn children(&self) -> impl Iterator<Item = TreeNode<'_>> {
        self.dirs
            .iter()
            .map(TreeNode::Dir)
            .chain(self.files.iter().map(TreeNode::File))
    }

    /// the child directory called `name`, created if missing
    fn dir_mut(&mut self, name: &str) -> &mut Dir {
        let index = match self.dirs.iter().position(|d| d.name == name) {
            Some(index) => index,
            None => {
                self.dirs.push(Dir {
                    name: name.to_string(),
                    path: child_path(&self.path, name),
                    ..Default::default()
                });
                self.dirs.len() - 1
            }
        };
        &mut self.dirs[index]
    }

    /// walk the page's path creating directories as needed and attach the page at the end
    ///
    /// Returns false when nothing was added: an empty path, or a page already exists
    /// for the path in which case the first one is kept.
    pub fn insert(&mut self, page: PageInfo) -> bool {
        let segments: Vec<String> = page.segments().map(String::from).collect();
        let Some((last, dirs)) = segments.split_last() else {
            tracing::warn!("Dropping page `{}` with an empty output path", page.source);
            return false;
        };

        let mut current = self;
        for segment in dirs {
            current = current.dir_mut(segment);
        }

        if current.files.iter().any(|f| &f.name == last) {
            tracing::warn!(
                "Page `{}` collides with an earlier page at `{}`, keeping the earlier one",
                page.source,
                page.path
            );
            return false;
        }
        let path = child_path(&current.path, last);
        current.files.push(File {
            name: last.clone(),
            path,
            page,
        });
        true
    }

    /// number of pages anywhere below this directory
    pub fn page_count(&self) -> usize {
        self.files.len() + self.dirs.iter().map(Dir::page_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(path: &str, title: &str) -> PageInfo {
        PageInfo {
            path: path.into(),
            source: path.replace(".html", ".md"),
            title: title.into(),
            depth: path.matches('/').count(),
        }
    }

    fn dir_names(dir: &Dir) -> Vec<&str> {
        dir.dirs.iter().map(|d| d.name.as_str()).collect()
    }

    fn file_names(dir: &Dir) -> Vec<&str> {
        dir.files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn shared_prefixes_collapse() {
        let root = Dir::build([
            page("a/b.html", "B"),
            page("a/c.html", "C"),
            page("d.html", "D"),
        ]);
        assert_eq!(root.path, "");
        assert_eq!(dir_names(&root), vec!["a"]);
        assert_eq!(file_names(&root), vec!["d.html"]);

        let a = &root.dirs[0];
        assert_eq!(a.path, "a");
        assert!(a.dirs.is_empty());
        assert_eq!(file_names(a), vec!["b.html", "c.html"]);

        let d = &root.files[0];
        assert_eq!(d.path, "d.html");
        assert_eq!(d.page.title, "D");
        assert_eq!(root.page_count(), 3);

        let children: Vec<_> = root.children().map(|c| (c.name(), c.is_dir())).collect();
        assert_eq!(children, vec![("a", true), ("d.html", false)]);
    }

    #[test]
    fn deep_paths_reuse_directories() {
        let root = Dir::build([
            page("x/y/one.html", "1"),
            page("x/y/z/two.html", "2"),
            page("x/three.html", "3"),
        ]);
        assert_eq!(dir_names(&root), vec!["x"]);
        let x = &root.dirs[0];
        assert_eq!(dir_names(x), vec!["y"]);
        assert_eq!(file_names(x), vec!["three.html"]);
        let y = &x.dirs[0];
        assert_eq!(y.path, "x/y");
        assert_eq!(dir_names(y), vec!["z"]);
        assert_eq!(file_names(y), vec!["one.html"]);
        assert_eq!(y.dirs[0].files[0].path, "x/y/z/two.html");
    }

    #[test]
    fn empty_segments_are_ignored() {
        let root = Dir::build([page("/a//b.html", "B")]);
        let a = &root.dirs[0];
        assert_eq!(a.path, "a");
        assert_eq!(file_names(a), vec!["b.html"]);
    }

    #[test]
    fn empty_path_is_dropped() {
        let mut root = Dir::root();
        assert!(!root.insert(page("", "nothing")));
        assert!(!root.insert(page("//", "nothing")));
        assert_eq!(root, Dir::root());
    }

    #[test]
    fn first_page_wins_on_collision() {
        let mut root = Dir::root();
        assert!(root.insert(page("a/b.html", "first")));
        assert!(!root.insert(page("a/b.html", "second")));
        let a = &root.dirs[0];
        assert_eq!(a.files.len(), 1);
        assert_eq!(a.files[0].page.title, "first");
    }

    #[test]
    fn file_and_directory_with_same_name_are_siblings() {
        let root = Dir::build([page("a.html", "file"), page("a.html/b.html", "nested")]);
        assert_eq!(dir_names(&root), vec!["a.html"]);
        assert_eq!(file_names(&root), vec!["a.html"]);
        assert_eq!(root.page_count(), 2);
    }
}
