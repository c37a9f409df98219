//! Route table for the page shell
//!
//! Navigation carries no state between pages. Any path that is not in the
//! table lands on the overview.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Overview,
    Hierarchy,
    Structure,
    Timeline,
    Modules,
    DevOps,
    Glossary,
}

impl Route {
    pub fn all() -> &'static [Route] {
        &[
            Route::Overview,
            Route::Hierarchy,
            Route::Structure,
            Route::Timeline,
            Route::Modules,
            Route::DevOps,
            Route::Glossary,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Overview => "/",
            Route::Hierarchy => "/hierarchy",
            Route::Structure => "/structure",
            Route::Timeline => "/timeline",
            Route::Modules => "/modules",
            Route::DevOps => "/devops",
            Route::Glossary => "/glossary",
        }
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            Route::Overview => "Dashboard",
            Route::Hierarchy => "Hierarchy Explorer",
            Route::Structure => "Full Stack Structure",
            Route::Timeline => "Project Timeline",
            Route::Modules => "Domain & Modules",
            Route::DevOps => "DevOps Guidelines",
            Route::Glossary => "Glossary",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Route::Overview => "▦",
            Route::Hierarchy => "⑂",
            Route::Structure => "☰",
            Route::Timeline => "🗓",
            Route::Modules => "▤",
            Route::DevOps => "⚙",
            Route::Glossary => "📖",
        }
    }

    /// Resolve a path or URL hash (`#/timeline`, `/timeline/`, `timeline`).
    /// Unknown paths fall back to the overview.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim().trim_start_matches('#').trim_matches('/');
        let normalized = trimmed.to_ascii_lowercase();
        Route::all()
            .iter()
            .copied()
            .find(|r| r.path().trim_start_matches('/') == normalized)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
