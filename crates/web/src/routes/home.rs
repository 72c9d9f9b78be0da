//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::types::{Category, Company};
use crate::middleware::auth::OptionalAuth;
use crate::middleware::prefs::Prefs;
use crate::models::session;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Category display data for templates.
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub company_count: u64,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            company_count: category.company_count,
        }
    }
}

/// Company display data for templates.
pub struct CompanyView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub website: String,
    pub featured: bool,
}

impl From<&Company> for CompanyView {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.to_string(),
            name: company.name.clone(),
            description: company.description.clone().unwrap_or_default(),
            logo_url: company.logo_url.clone().unwrap_or_default(),
            website: company.website.clone().unwrap_or_default(),
            featured: company.featured,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: super::PageChrome,
    /// Categories for the browse grid.
    pub categories: Vec<CategoryView>,
    /// Featured company listings.
    pub featured_companies: Vec<CompanyView>,
}

/// Number of featured companies to show on the home page.
const FEATURED_COMPANIES: usize = 8;

/// Display the home page.
#[instrument(skip(state, prefs, user, http_session))]
pub async fn home(
    State(state): State<AppState>,
    prefs: Prefs,
    OptionalAuth(user): OptionalAuth,
    http_session: Session,
) -> HomeTemplate {
    // Fetch categories for the browse grid
    let categories = state.backend().list_categories().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch categories: {e}");
            Vec::new()
        },
        |categories| categories.iter().map(CategoryView::from).collect(),
    );

    // Featured companies, best-effort
    let featured_companies = state.backend().list_companies(None, 1).await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch companies: {e}");
            Vec::new()
        },
        |page| {
            page.items
                .iter()
                .filter(|c| c.featured)
                .take(FEATURED_COMPANIES)
                .map(CompanyView::from)
                .collect()
        },
    );

    let flash = session::take_flash(&http_session).await;
    HomeTemplate {
        chrome: super::PageChrome::new(prefs, user.as_ref(), flash),
        categories,
        featured_companies,
    }
}
