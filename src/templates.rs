use std::{fs, path::Path};

use minijinja::{Environment, Value};

use crate::error::{Error, Result};

/// the templates used to wrap the generated html

pub const PAGE_TEMPLATE: &str = "page.html";
pub const TOC_TEMPLATE: &str = "toc.html";

/// a url for an `href` attribute, percent encoded where needed and html escaped
///
/// Unlike the default escaping this leaves `/` alone.
fn href(value: &str) -> Value {
    let mut escaped = String::with_capacity(value.len());
    match pulldown_cmark_escape::escape_href(&mut escaped, value) {
        Ok(()) => Value::from_safe_string(escaped),
        Err(_) => Value::from(value),
    }
}

/// the built in templates, with any files in `template_dir` added on top
///
/// Templates are named after their file name so the `.html` ones get auto escaping.
pub fn get_env<T: AsRef<Path>>(template_dir: Option<T>) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_filter("href", href);
    env.add_template(PAGE_TEMPLATE, include_str!("../templates/page.html"))?;
    env.add_template(TOC_TEMPLATE, include_str!("../templates/toc.html"))?;

    let Some(template_dir) = template_dir else {
        return Ok(env);
    };
    let template_dir = template_dir.as_ref();
    for entry in template_dir
        .read_dir()
        .map_err(|e| Error::read_dir(template_dir, e))?
    {
        let entry = entry.map_err(|e| Error::read_dir(template_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            tracing::debug!("Skipping `{:?}` while loading templates", path);
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let source = fs::read_to_string(&path).map_err(|e| Error::read(&path, e))?;
        tracing::debug!("Using template `{name}` from `{:?}`", path);
        env.add_template_owned(name, source)?;
    }
    Ok(env)
}
