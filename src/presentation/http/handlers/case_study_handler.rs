use axum::{
    Json,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response, Sse, sse::Event, sse::KeepAlive},
};
use futures::stream::{self, Stream, StreamExt};
use std::{convert::Infallible, sync::Arc, time::Duration};
use uuid::Uuid;

use crate::application::services::{StatusTick, watch_case_study};
use crate::application::use_cases::{
    CaseStudyOwner, CreateCaseStudyRequest, CreateCaseStudyUseCase, DeleteCaseStudyUseCase,
    ExportCaseStudyUseCase, GetCaseStudyError, GetCaseStudyUseCase, ListCaseStudiesRequest,
    ListCaseStudiesUseCase, SummarizeCaseStudyUseCase, UpdateCaseStudyUseCase,
    UpdateSummaryUseCase,
};
use crate::presentation::http::auth::{AuthUser, TokenVerifier};
use crate::presentation::http::dto::{
    ApiResponse, CaseStudyDetailDto, CaseStudyListItemDto, CaseStudyListResponseDto,
    CaseStudyResponseDto, CreateCaseStudyDto, CreateCaseStudyResponseDto,
    DeleteCaseStudyResponseDto, ExportFormat, ExportQuery, PaginationDto, PaginationMetaDto,
    StatusEventDto, SummaryDto, UpdateCaseStudyDto, UpdateSummaryDto,
};
use crate::presentation::http::error::HttpError;

pub struct CaseStudyHandler {
    create_use_case: Arc<CreateCaseStudyUseCase>,
    list_use_case: Arc<ListCaseStudiesUseCase>,
    get_use_case: Arc<GetCaseStudyUseCase>,
    update_use_case: Arc<UpdateCaseStudyUseCase>,
    delete_use_case: Arc<DeleteCaseStudyUseCase>,
    summarize_use_case: Arc<SummarizeCaseStudyUseCase>,
    update_summary_use_case: Arc<UpdateSummaryUseCase>,
    export_use_case: Arc<ExportCaseStudyUseCase>,
    token_verifier: TokenVerifier,
    status_poll_interval: Duration,
}

impl FromRef<Arc<CaseStudyHandler>> for TokenVerifier {
    fn from_ref(handler: &Arc<CaseStudyHandler>) -> Self {
        handler.token_verifier.clone()
    }
}

impl CaseStudyHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_use_case: Arc<CreateCaseStudyUseCase>,
        list_use_case: Arc<ListCaseStudiesUseCase>,
        get_use_case: Arc<GetCaseStudyUseCase>,
        update_use_case: Arc<UpdateCaseStudyUseCase>,
        delete_use_case: Arc<DeleteCaseStudyUseCase>,
        summarize_use_case: Arc<SummarizeCaseStudyUseCase>,
        update_summary_use_case: Arc<UpdateSummaryUseCase>,
        export_use_case: Arc<ExportCaseStudyUseCase>,
        token_verifier: TokenVerifier,
        status_poll_interval: Duration,
    ) -> Self {
        Self {
            create_use_case,
            list_use_case,
            get_use_case,
            update_use_case,
            delete_use_case,
            summarize_use_case,
            update_summary_use_case,
            export_use_case,
            token_verifier,
            status_poll_interval,
        }
    }

    pub async fn create(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        payload: Result<Json<CreateCaseStudyDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, HttpError> {
        let Json(dto) = payload?;

        let request = CreateCaseStudyRequest {
            owner: CaseStudyOwner {
                user_id: user.user_id,
                name: user.name,
                email: user.email,
            },
            title: dto.title,
            client_name: dto.client_name,
            industry: dto.industry,
            description: dto.description,
            file_urls: dto.file_urls,
        };

        let response = handler.create_use_case.execute(request).await?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(CreateCaseStudyResponseDto::from(
                response,
            ))),
        ))
    }

    pub async fn list(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Query(pagination): Query<PaginationDto>,
    ) -> Result<impl IntoResponse, HttpError> {
        let request = ListCaseStudiesRequest {
            user_id: user.user_id,
            skip: pagination.skip,
            limit: pagination.limit,
        };

        let response = handler.list_use_case.execute(request).await?;
        let dto = CaseStudyListResponseDto {
            case_studies: response
                .case_studies
                .into_iter()
                .map(CaseStudyListItemDto::from)
                .collect(),
            meta: PaginationMetaDto {
                offset: response.skip,
                limit: response.limit,
                total: response.total_count,
            },
        };

        Ok((StatusCode::OK, Json(ApiResponse::success(dto))))
    }

    pub async fn get(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, HttpError> {
        let detail = handler.get_use_case.execute(&user.user_id, id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(CaseStudyDetailDto::from(&detail))),
        ))
    }

    pub async fn update(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path(id): Path<Uuid>,
        payload: Result<Json<UpdateCaseStudyDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, HttpError> {
        let Json(dto) = payload?;
        let case_study = handler
            .update_use_case
            .execute(&user.user_id, id, dto.into())
            .await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(CaseStudyResponseDto::from(&case_study))),
        ))
    }

    pub async fn delete(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, HttpError> {
        let response = handler.delete_use_case.execute(&user.user_id, id).await?;
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(DeleteCaseStudyResponseDto::from(
                response,
            ))),
        ))
    }

    pub async fn summarize(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path(id): Path<Uuid>,
    ) -> Result<impl IntoResponse, HttpError> {
        let summary = handler.summarize_use_case.execute(&user.user_id, id).await?;
        Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(SummaryDto::from(&summary))),
        ))
    }

    pub async fn update_summary(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path((id, summary_id)): Path<(Uuid, Uuid)>,
        payload: Result<Json<UpdateSummaryDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, HttpError> {
        let Json(dto) = payload?;
        let summary = handler
            .update_summary_use_case
            .execute(&user.user_id, id, summary_id, dto.summary)
            .await?;

        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(SummaryDto::from(&summary))),
        ))
    }

    pub async fn export(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path(id): Path<Uuid>,
        Query(query): Query<ExportQuery>,
    ) -> Result<Response, HttpError> {
        let deck = handler.export_use_case.execute(&user.user_id, id).await?;

        let response = match query.format {
            ExportFormat::Json => (StatusCode::OK, Json(ApiResponse::success(deck))).into_response(),
            ExportFormat::Markdown => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
                deck.to_markdown(),
            )
                .into_response(),
        };
        Ok(response)
    }

    /// Streams `status` events until no file is processing, then a single
    /// `complete` event. Polling stops when the client disconnects.
    pub async fn status_stream(
        State(handler): State<Arc<CaseStudyHandler>>,
        user: AuthUser,
        Path(id): Path<Uuid>,
    ) -> Result<Response, HttpError> {
        // Unknown or foreign ids get a plain 404 instead of an event stream
        handler.get_use_case.execute(&user.user_id, id).await?;

        let events = watch_case_study(
            handler.get_use_case.clone(),
            user.user_id,
            id,
            handler.status_poll_interval,
        )
        .flat_map(|tick| stream::iter(status_events(tick)));

        Ok(create_sse_response(events))
    }
}

fn status_events(tick: Result<StatusTick, GetCaseStudyError>) -> Vec<Result<Event, Infallible>> {
    match tick {
        Ok(tick) => match serde_json::to_string(&StatusEventDto::from(&tick.detail)) {
            Ok(data) => {
                let mut events = vec![Ok(Event::default().event("status").data(data.clone()))];
                if tick.done {
                    events.push(Ok(Event::default().event("complete").data(data)));
                }
                events
            }
            Err(error) => {
                tracing::error!(error = %error, "Could not serialize status event");
                vec![Ok(Event::default()
                    .event("error")
                    .data("Could not serialize status"))]
            }
        },
        Err(error) => {
            tracing::warn!(error = %error, "Status stream stopped");
            vec![Ok(Event::default().event("error").data(error.to_string()))]
        }
    }
}

pub fn create_sse_response<S>(stream: S) -> Response
where
    S: Stream<Item = Result<Event, Infallible>> + Send + 'static,
{
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(30))
                .text("keep-alive"),
        )
        .into_response()
}
