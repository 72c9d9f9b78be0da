//! Subscription plan pricing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::backend::types::Plan;
use crate::error::Result;
use crate::middleware::auth::OptionalAuth;
use crate::middleware::prefs::Prefs;
use crate::models::session;
use crate::state::AppState;

/// Plan display data for templates.
pub struct PlanView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub duration_days: u32,
    pub features: Vec<String>,
}

impl From<&Plan> for PlanView {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name.clone(),
            description: plan.description.clone().unwrap_or_default(),
            price: format!("{} {}", plan.price, plan.currency),
            duration_days: plan.duration_days,
            features: plan.features.clone(),
        }
    }
}

/// Pricing page template.
#[derive(Template, WebTemplate)]
#[template(path = "plans.html")]
pub struct PlansTemplate {
    pub chrome: super::PageChrome,
    pub plans: Vec<PlanView>,
    pub signed_in: bool,
}

/// Display the subscription plans.
#[instrument(skip(state, prefs, user, http_session))]
pub async fn index(
    State(state): State<AppState>,
    prefs: Prefs,
    OptionalAuth(user): OptionalAuth,
    http_session: Session,
) -> Result<PlansTemplate> {
    let plans = state.backend().list_plans().await?;

    let flash = session::take_flash(&http_session).await;
    let signed_in = user.is_some();
    Ok(PlansTemplate {
        chrome: super::PageChrome::new(prefs, user.as_ref(), flash),
        plans: plans.iter().map(PlanView::from).collect(),
        signed_in,
    })
}
