use super::error::ApiError;
use super::store::{DailyTotal, TopOrder, Video, VideoTotals, WatchSession};
use super::youtube::extract_video_id;
use super::ApiState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

const VIDEOS_KEY: &str = "videos";
const TOP_LIMIT: usize = 10;
const WEEK_DAYS: i64 = 7;
const MONTH_DAYS: i64 = 30;

pub(crate) const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub(crate) const METODO_NO_PERMITIDO: &str = "Método no permitido";

type ApiResult<T> = std::result::Result<T, ApiError>;

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

pub(crate) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed(METHOD_NOT_ALLOWED)
}

pub(crate) async fn metodo_no_permitido() -> ApiError {
    ApiError::MethodNotAllowed(METODO_NO_PERMITIDO)
}

/// `GET /api/get-videos`
pub(crate) async fn get_videos(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let stored = state
        .config
        .get(VIDEOS_KEY)
        .await
        .map_err(ApiError::internal("Error al leer la configuración"))?;

    Ok(Json(match stored {
        Some(value) if !value.is_null() => value,
        _ => json!({ "videos": [] }),
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateVideosRequest {
    #[serde(default)]
    videos: Option<Value>,
}

/// `POST /api/update-videos`
pub(crate) async fn update_videos(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<UpdateVideosRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = json_body(payload)?;
    let videos = match request.videos {
        Some(videos @ Value::Array(_)) => videos,
        _ => return Err(ApiError::bad_request("Videos debe ser un array")),
    };
    let count = videos.as_array().map_or(0, Vec::len);

    state
        .config
        .upsert(VIDEOS_KEY, json!({ "videos": videos }))
        .await
        .map_err(ApiError::internal("Error al actualizar la configuración"))?;

    info!(videos = count, "Video list updated");
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddVideoRequest {
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddVideoResponse {
    success: bool,
    video: Video,
}

/// `POST /api/add-video`
pub(crate) async fn add_video(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<AddVideoRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let request = json_body(payload)?;
    let (nombre, url) = match (present(request.nombre), present(request.url)) {
        (Some(nombre), Some(url)) => (nombre, url),
        _ => return Err(ApiError::bad_request("Nombre y URL son requeridos")),
    };

    let video_id =
        extract_video_id(&url).ok_or_else(|| ApiError::bad_request("URL de YouTube inválida"))?;

    let context = "Error al agregar video";
    if state
        .videos
        .video_exists(&video_id)
        .map_err(ApiError::internal(context))?
    {
        return Err(ApiError::Conflict("Este video ya existe".to_string()));
    }

    let video = Video {
        video_id,
        nombre,
        url,
    };
    state
        .videos
        .insert_video(&video)
        .map_err(ApiError::internal(context))?;

    info!(video_id = %video.video_id, "Video added");
    Ok((
        StatusCode::CREATED,
        Json(AddVideoResponse {
            success: true,
            video,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteVideoParams {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

/// `DELETE /api/delete-video?videoId=`
pub(crate) async fn delete_video(
    State(state): State<ApiState>,
    Query(params): Query<DeleteVideoParams>,
) -> ApiResult<Json<Value>> {
    let video_id =
        present(params.video_id).ok_or_else(|| ApiError::bad_request("videoId es requerido"))?;

    let removed = state
        .videos
        .delete_video(&video_id)
        .map_err(ApiError::internal("Error al eliminar video"))?;
    if removed == 0 {
        return Err(ApiError::NotFound("Video no encontrado".to_string()));
    }

    info!(video_id = %video_id, "Video deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Video eliminado correctamente"
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogWatchRequest {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    video_id: Option<String>,
    #[serde(default)]
    video_name: Option<String>,
    #[serde(default)]
    session_id: Option<i64>,
    #[serde(default)]
    seconds: Option<f64>,
    #[serde(default)]
    completed: Option<bool>,
}

/// `POST /api/log-watch`
pub(crate) async fn log_watch(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<LogWatchRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let request = json_body(payload)?;
    let server_error = |e: crate::error::PlaygroundError| {
        warn!(error = %e, "log-watch failed");
        ApiError::Server(e.to_string())
    };

    match request.action.as_deref() {
        Some("start") => {
            let video_id = present(request.video_id)
                .ok_or_else(|| ApiError::bad_request("videoId es requerido"))?;
            let session_id = state
                .videos
                .start_session(&video_id, request.video_name.as_deref(), state.local_now())
                .map_err(server_error)?;
            info!(video_id = %video_id, session_id, "Watch session started");
            Ok(Json(json!({ "success": true, "sessionId": session_id })))
        }
        Some("end") => {
            let session_id = request
                .session_id
                .ok_or_else(|| ApiError::bad_request("sessionId es requerido"))?;
            let seconds = request.seconds.unwrap_or(0.0).round() as i64;
            let completed = request.completed.unwrap_or(false);
            state
                .videos
                .end_session(session_id, state.local_now(), seconds, completed)
                .map_err(server_error)?;
            info!(session_id, seconds, completed, "Watch session ended");
            Ok(Json(json!({ "success": true, "message": "Sesión actualizada" })))
        }
        _ => Err(ApiError::bad_request("Action inválido")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodTotal {
    pub minutes: i64,
    pub seconds: i64,
}

impl PeriodTotal {
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            minutes: (seconds as f64 / 60.0).round() as i64,
            seconds,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchStats {
    pub today: PeriodTotal,
    pub week: PeriodTotal,
    pub month: PeriodTotal,
    pub top_by_count: Vec<VideoTotals>,
    pub top_by_time: Vec<VideoTotals>,
    pub daily_stats: Vec<DailyTotal>,
    pub today_sessions: Vec<WatchSession>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    success: bool,
    stats: WatchStats,
}

/// `GET /api/get-stats`
pub(crate) async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let stats = collect_stats(&state).map_err(|e| {
        warn!(error = %e, "get-stats failed");
        ApiError::Server(e.to_string())
    })?;
    let body = serde_json::to_value(StatsResponse {
        success: true,
        stats,
    })
    .map_err(|e| ApiError::Server(e.to_string()))?;
    Ok(Json(body))
}

fn collect_stats(state: &ApiState) -> crate::error::Result<WatchStats> {
    let today = state.local_now().date();
    let week_from = today - Duration::days(WEEK_DAYS);
    let month_from = today - Duration::days(MONTH_DAYS);
    let store = &state.videos;

    Ok(WatchStats {
        today: PeriodTotal::from_seconds(store.seconds_on(today)?),
        week: PeriodTotal::from_seconds(store.seconds_since(week_from)?),
        month: PeriodTotal::from_seconds(store.seconds_since(month_from)?),
        top_by_count: store.top_videos(TopOrder::Plays, TOP_LIMIT)?,
        top_by_time: store.top_videos(TopOrder::WatchTime, TOP_LIMIT)?,
        daily_stats: store.daily_totals(month_from)?,
        today_sessions: store.sessions_on(today)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_minutes_round_half_up() {
        assert_eq!(PeriodTotal::from_seconds(0).minutes, 0);
        assert_eq!(PeriodTotal::from_seconds(89).minutes, 1);
        assert_eq!(PeriodTotal::from_seconds(90).minutes, 2);
        assert_eq!(PeriodTotal::from_seconds(1500).minutes, 25);
    }

    #[test]
    fn test_present_treats_empty_as_missing() {
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some("x".into())).as_deref(), Some("x"));
        assert_eq!(present(None), None);
    }
}
