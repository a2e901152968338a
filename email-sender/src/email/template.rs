//! Email template rendering
//!
//! Templates are looked up by name and rendered with a [`Context`] using
//! `minijinja`. HTML auto-escaping applies to `.html` and `.htm` templates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::Environment;
use parking_lot::RwLock;

use super::EmailError;

/// Values available to a template while it renders
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Renders a named template into an HTML string
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render the template called `name` with `context`
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Template` if the template does not exist or
    /// fails to render
    fn render(&self, name: &str, context: &Context) -> Result<String, EmailError>;
}

/// Thread-safe template set backed by a directory or in-memory sources
///
/// Directory templates are loaded lazily on first use and cached.
///
/// # Examples
///
/// ```rust
/// use email_sender::email::{Context, TemplateDirectory, TemplateRenderer};
/// use serde_json::json;
///
/// let templates = TemplateDirectory::from_sources([
///     ("welcome.html", "<p>Hello, {{ name }}!</p>"),
/// ])
/// .unwrap();
///
/// let mut context = Context::new();
/// context.insert("name".to_string(), json!("Ann"));
///
/// let html = templates.render("welcome.html", &context).unwrap();
/// assert_eq!(html, "<p>Hello, Ann!</p>");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateDirectory {
    env: Arc<RwLock<Environment<'static>>>,
    template_dir: Option<PathBuf>,
}

impl TemplateDirectory {
    /// Load templates from `template_dir`
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Config` if `template_dir` is not a directory
    pub fn new(template_dir: impl Into<PathBuf>) -> Result<Self, EmailError> {
        let template_dir = template_dir.into();
        if !template_dir.is_dir() {
            return Err(EmailError::config(format!(
                "template directory {} does not exist",
                template_dir.display()
            )));
        }

        let env = Self::create_environment(&template_dir);

        Ok(Self {
            env: Arc::new(RwLock::new(env)),
            template_dir: Some(template_dir),
        })
    }

    /// Build a template set from `(name, source)` pairs
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Template` if a source fails to parse
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, EmailError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = Environment::new();
        for (name, source) in sources {
            env.add_template_owned(name.into(), source.into())?;
        }

        Ok(Self {
            env: Arc::new(RwLock::new(env)),
            template_dir: None,
        })
    }

    fn create_environment(template_dir: &Path) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(template_dir));
        env
    }

    /// Drop cached templates so edits on disk are picked up
    ///
    /// In-memory template sets are left untouched.
    pub fn reload(&self) {
        if let Some(dir) = &self.template_dir {
            *self.env.write() = Self::create_environment(dir);
            tracing::debug!(template_dir = %dir.display(), "Email templates reloaded");
        }
    }

    /// Directory templates are loaded from, if any
    #[must_use]
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }
}

impl TemplateRenderer for TemplateDirectory {
    fn render(&self, name: &str, context: &Context) -> Result<String, EmailError> {
        self.env
            .read()
            .get_template(name)
            .and_then(|tmpl| tmpl.render(context))
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn context(pairs: &[(&str, serde_json::Value)]) -> Context {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_render_from_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("emails")).unwrap();
        std::fs::write(
            temp.path().join("emails/welcome.html"),
            "<h1>Welcome, {{ name }}!</h1>",
        )
        .unwrap();

        let templates = TemplateDirectory::new(temp.path()).unwrap();
        let html = templates
            .render("emails/welcome.html", &context(&[("name", json!("Ann"))]))
            .unwrap();

        assert_eq!(html, "<h1>Welcome, Ann!</h1>");
    }

    #[test]
    fn test_html_templates_escape_values() {
        let templates =
            TemplateDirectory::from_sources([("note.html", "<p>{{ body }}</p>")]).unwrap();

        let html = templates
            .render("note.html", &context(&[("body", json!("<b>hi"))]))
            .unwrap();

        assert_eq!(html, "<p>&lt;b&gt;hi</p>");
    }

    #[test]
    fn test_missing_template_is_template_error() {
        let templates = TemplateDirectory::from_sources([("a.html", "a")]).unwrap();

        let err = templates.render("missing.html", &Context::new()).unwrap_err();

        assert!(matches!(
            err,
            EmailError::Template(ref e) if e.kind() == minijinja::ErrorKind::TemplateNotFound
        ));
    }

    #[test]
    fn test_missing_directory_is_config_error() {
        let temp = TempDir::new().unwrap();
        let result = TemplateDirectory::new(temp.path().join("nope"));

        assert!(matches!(result, Err(EmailError::Config(_))));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("greeting.txt");
        std::fs::write(&path, "Hello").unwrap();

        let templates = TemplateDirectory::new(temp.path()).unwrap();
        assert_eq!(templates.render("greeting.txt", &Context::new()).unwrap(), "Hello");

        std::fs::write(&path, "Goodbye").unwrap();
        templates.reload();

        assert_eq!(templates.render("greeting.txt", &Context::new()).unwrap(), "Goodbye");
    }
}
