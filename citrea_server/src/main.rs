use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use std::sync::{Arc, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use citrea_core::{
    analyze, paytable_from_env, resolve_str, validate_bet, BetAmount, PayoutTable,
};
use citrea_shared::{
    ApiError, ApiResult, ErrorBody, PaytableResponse, ResolveRequest, ResolveResponse,
    RtpResponse,
};

struct AppState {
    paytable: RwLock<PayoutTable>,
    api_key: String,
}

impl AppState {
    fn new(paytable: PayoutTable, api_key: String) -> Self {
        Self {
            paytable: RwLock::new(paytable),
            api_key,
        }
    }

    /// Snapshot of the active table; a concurrent swap never tears a resolution.
    fn table(&self) -> ApiResult<PayoutTable> {
        self.paytable
            .read()
            .map(|t| t.clone())
            .map_err(|_| ApiError::Internal)
    }
}

struct HttpError(ApiError);

impl From<ApiError> for HttpError {
    fn from(e: ApiError) -> Self {
        HttpError(e)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

async fn route_paytable(State(state): State<Arc<AppState>>) -> Result<Json<PaytableResponse>, HttpError> {
    let paytable = state.table()?;
    let rtp = analyze(&paytable).rtp;
    Ok(Json(PaytableResponse { paytable, rtp }))
}

async fn route_rtp(State(state): State<Arc<AppState>>) -> Result<Json<RtpResponse>, HttpError> {
    let table = state.table()?;
    Ok(Json(RtpResponse {
        report: analyze(&table),
        generated_at: chrono::Utc::now(),
    }))
}

async fn route_resolve(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, HttpError> {
    let bet = match req.balance {
        Some(balance) => validate_bet(&req.bet, balance),
        None => BetAmount::parse(&req.bet),
    }
    .map_err(ApiError::from)?;
    let table = state.table()?;
    let resolution = resolve_str(&req.score, bet, &table).map_err(|e| {
        // a malformed score is an oracle/ledger contract violation, not user error
        warn!(score = %req.score, error = %e, "rejected malformed score");
        ApiError::from(e)
    })?;
    info!(
        score = %resolution.score,
        category = %resolution.category,
        payout = %resolution.payout,
        "resolved"
    );
    Ok(Json(ResolveResponse::from_resolution(
        &resolution,
        chrono::Utc::now(),
    )))
}

async fn route_admin_set_paytable(
    State(state): State<Arc<AppState>>,
    TypedHeader(axum_extra::headers::Authorization(bearer)): TypedHeader<
        axum_extra::headers::Authorization<axum_extra::headers::authorization::Bearer>,
    >,
    Json(raw): Json<serde_json::Value>,
) -> Result<StatusCode, HttpError> {
    if bearer.token() != state.api_key {
        return Err(ApiError::Unauthorized.into());
    }
    let table: PayoutTable =
        serde_json::from_value(raw).map_err(|e| ApiError::Invalid(e.to_string()))?;
    let jackpot = table.jackpot();
    let mut guard = state.paytable.write().map_err(|_| {
        error!("payout table lock poisoned");
        ApiError::Internal
    })?;
    *guard = table;
    info!(jackpot, "payout table replaced");
    Ok(StatusCode::NO_CONTENT)
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/paytable", get(route_paytable))
        .route("/rtp", get(route_rtp))
        .route("/resolve", post(route_resolve))
        .route("/admin/paytable", post(route_admin_set_paytable))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let paytable = paytable_from_env()?;
    info!(jackpot = paytable.jackpot(), "serving payout table");

    let api_key = std::env::var("API_KEY").unwrap_or_else(|_| {
        warn!("API_KEY not set, using development key");
        "dev-key".into()
    });
    let state = Arc::new(AppState::new(paytable, api_key));

    let addr = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::headers::Authorization;
    use rust_decimal_macros::dec;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(PayoutTable::citrea(), "secret".into()))
    }

    fn request(score: &str, bet: &str) -> ResolveRequest {
        ResolveRequest {
            score: score.into(),
            bet: bet.into(),
            balance: None,
        }
    }

    fn bearer(token: &str) -> TypedHeader<Authorization<axum_extra::headers::authorization::Bearer>> {
        TypedHeader(Authorization::bearer(token).unwrap())
    }

    #[tokio::test]
    async fn resolves_a_jackpot() {
        let Json(resp) = route_resolve(State(state()), Json(request("777", "0.0001")))
            .await
            .map_err(|e| e.0)
            .unwrap();
        assert!(resp.is_jackpot);
        assert_eq!(resp.multiplier, 1000);
        assert_eq!(resp.payout, dec!(0.1));
        assert_eq!(resp.payout_display, "0.1000");
    }

    #[tokio::test]
    async fn rejects_malformed_score_and_bad_bets() {
        let err = route_resolve(State(state()), Json(request("7a7", "1")))
            .await
            .unwrap_err();
        assert!(matches!(err.0, ApiError::Invalid(_)));

        let err = route_resolve(State(state()), Json(request("777", "0")))
            .await
            .unwrap_err();
        assert!(matches!(err.0, ApiError::Invalid(ref m) if m.contains("greater than 0")));

        let mut req = request("777", "2");
        req.balance = Some(dec!(1));
        let err = route_resolve(State(state()), Json(req)).await.unwrap_err();
        assert!(matches!(err.0, ApiError::Invalid(ref m) if m.contains("Insufficient")));
    }

    #[tokio::test]
    async fn oversized_bets_are_refused_without_a_balance() {
        let err = route_resolve(
            State(state()),
            Json(request("777", "79228162514264337593543950335")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.0, ApiError::Invalid(ref m) if m.contains("maximum")));

        let Json(resp) = route_resolve(State(state()), Json(request("777", "1000000")))
            .await
            .map_err(|e| e.0)
            .unwrap();
        assert_eq!(resp.payout, dec!(1000000000));
    }

    #[tokio::test]
    async fn admin_swaps_the_schedule() {
        let st = state();
        let body = serde_json::to_value(PayoutTable::classic()).unwrap();

        let denied =
            route_admin_set_paytable(State(st.clone()), bearer("wrong"), Json(body.clone()))
                .await
                .unwrap_err();
        assert!(matches!(denied.0, ApiError::Unauthorized));
        assert_eq!(st.table().unwrap().jackpot(), 1000);

        let ok = route_admin_set_paytable(State(st.clone()), bearer("secret"), Json(body))
            .await
            .map_err(|e| e.0)
            .unwrap();
        assert_eq!(ok, StatusCode::NO_CONTENT);

        let Json(resp) = route_resolve(State(st.clone()), Json(request("777", "1")))
            .await
            .map_err(|e| e.0)
            .unwrap();
        assert_eq!(resp.multiplier, 800);
    }

    #[tokio::test]
    async fn admin_rejects_invalid_tables() {
        let st = state();
        let mut body = serde_json::to_value(PayoutTable::classic()).unwrap();
        body["two_of_a_kind"] = serde_json::json!(0);
        let err = route_admin_set_paytable(State(st.clone()), bearer("secret"), Json(body))
            .await
            .unwrap_err();
        assert!(matches!(err.0, ApiError::Invalid(_)));
        assert_eq!(st.table().unwrap(), PayoutTable::citrea());
    }

    #[tokio::test]
    async fn paytable_reports_exact_rtp() {
        let Json(resp) = route_paytable(State(state())).await.map_err(|e| e.0).unwrap();
        assert_eq!(resp.rtp, dec!(6.439));
        assert_eq!(resp.paytable, PayoutTable::citrea());
    }
}
