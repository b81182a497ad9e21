use std::sync::Arc;

use crate::{
    application::{
        ports::{DocumentExtractor, LanguageModel, ObjectStorage, SourceFetcher},
        use_cases::{
            CreateCaseStudyUseCase, DeleteCaseStudyUseCase, ExportCaseStudyUseCase,
            GetCaseStudyUseCase, HandleExtractionWebhookUseCase, ListCaseStudiesUseCase,
            SummarizeCaseStudyUseCase, UpdateCaseStudyUseCase, UpdateSummaryUseCase,
        },
    },
    config::Settings,
    domain::{
        repositories::{
            CaseStudyRepository, FileRepository, ImageRepository, SummaryRepository,
            UserRepository,
        },
        value_objects::WebhookSecret,
    },
    infrastructure::{
        database::{
            DbPool, create_connection_pool,
            repositories::{
                PostgresCaseStudyRepository, PostgresFileRepository, PostgresImageRepository,
                PostgresSummaryRepository, PostgresUserRepository,
            },
            run_migrations,
        },
        external_services::{
            GeminiClient, GeminiConfig, HttpSourceFetcher, MarkerClient, MarkerConfig,
            SupabaseStorage, SupabaseStorageConfig,
        },
    },
    presentation::http::{
        auth::TokenVerifier,
        handlers::{CaseStudyHandler, WebhookHandler},
    },
};

pub struct AppContainer {
    pub db_pool: DbPool,

    // Repositories
    pub user_repository: Arc<dyn UserRepository>,
    pub case_study_repository: Arc<dyn CaseStudyRepository>,
    pub file_repository: Arc<dyn FileRepository>,
    pub image_repository: Arc<dyn ImageRepository>,
    pub summary_repository: Arc<dyn SummaryRepository>,

    // External Services
    pub source_fetcher: Arc<dyn SourceFetcher>,
    pub document_extractor: Arc<dyn DocumentExtractor>,
    pub object_storage: Arc<dyn ObjectStorage>,
    pub language_model: Arc<dyn LanguageModel>,

    // HTTP Handlers
    pub case_study_handler: Arc<CaseStudyHandler>,
    pub webhook_handler: Arc<WebhookHandler>,
}

impl AppContainer {
    pub async fn new(settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool(&settings.database_url, settings.database_pool_size)
            .map_err(|e| format!("Failed to create database pool: {}", e))?;
        run_migrations(&db_pool).map_err(|e| format!("Failed to run database migrations: {}", e))?;

        // Create repositories
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(db_pool.clone()));
        let case_study_repository: Arc<dyn CaseStudyRepository> =
            Arc::new(PostgresCaseStudyRepository::new(db_pool.clone()));
        let file_repository: Arc<dyn FileRepository> =
            Arc::new(PostgresFileRepository::new(db_pool.clone()));
        let image_repository: Arc<dyn ImageRepository> =
            Arc::new(PostgresImageRepository::new(db_pool.clone()));
        let summary_repository: Arc<dyn SummaryRepository> =
            Arc::new(PostgresSummaryRepository::new(db_pool.clone()));

        // Create external services
        let source_fetcher: Arc<dyn SourceFetcher> =
            Arc::new(HttpSourceFetcher::new(settings.http_timeout_secs)?);
        let document_extractor: Arc<dyn DocumentExtractor> =
            Arc::new(MarkerClient::new(MarkerConfig {
                api_url: settings.marker_api_url.clone(),
                api_key: settings.marker_api_key.clone(),
                webhook_url: settings.marker_webhook_url.clone(),
                timeout_secs: settings.http_timeout_secs,
            })?);
        let object_storage: Arc<dyn ObjectStorage> =
            Arc::new(SupabaseStorage::new(SupabaseStorageConfig {
                url: settings.supabase_url.clone(),
                service_key: settings.supabase_service_key.clone(),
                bucket: settings.supabase_bucket.clone(),
                timeout_secs: settings.http_timeout_secs,
            })?);
        let language_model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::new(GeminiConfig {
            api_url: settings.gemini_api_url.clone(),
            api_key: settings.gemini_api_key.clone(),
            model: settings.gemini_model.clone(),
            timeout_secs: settings.http_timeout_secs,
        })?);

        // Create use cases
        let create_use_case = Arc::new(CreateCaseStudyUseCase::new(
            user_repository.clone(),
            case_study_repository.clone(),
            file_repository.clone(),
            source_fetcher.clone(),
            document_extractor.clone(),
        ));
        let list_use_case = Arc::new(ListCaseStudiesUseCase::new(
            case_study_repository.clone(),
            file_repository.clone(),
        ));
        let get_use_case = Arc::new(GetCaseStudyUseCase::new(
            case_study_repository.clone(),
            file_repository.clone(),
            image_repository.clone(),
            summary_repository.clone(),
        ));
        let update_use_case = Arc::new(UpdateCaseStudyUseCase::new(case_study_repository.clone()));
        let delete_use_case = Arc::new(DeleteCaseStudyUseCase::new(
            case_study_repository.clone(),
            file_repository.clone(),
            image_repository.clone(),
            object_storage.clone(),
        ));
        let summarize_use_case = Arc::new(SummarizeCaseStudyUseCase::new(
            case_study_repository.clone(),
            file_repository.clone(),
            summary_repository.clone(),
            language_model.clone(),
        ));
        let update_summary_use_case = Arc::new(UpdateSummaryUseCase::new(
            case_study_repository.clone(),
            summary_repository.clone(),
        ));
        let export_use_case = Arc::new(ExportCaseStudyUseCase::new(
            case_study_repository.clone(),
            summary_repository.clone(),
        ));
        let webhook_use_case = Arc::new(HandleExtractionWebhookUseCase::new(
            WebhookSecret::new(settings.webhook_secret.clone())?,
            case_study_repository.clone(),
            file_repository.clone(),
            image_repository.clone(),
            document_extractor.clone(),
            object_storage.clone(),
        ));

        // Create HTTP handlers
        let token_verifier = TokenVerifier::from_auth_key(&settings.auth_key)
            .map_err(|e| format!("Invalid session token key: {}", e))?;

        let case_study_handler = Arc::new(CaseStudyHandler::new(
            create_use_case,
            list_use_case,
            get_use_case,
            update_use_case,
            delete_use_case,
            summarize_use_case,
            update_summary_use_case,
            export_use_case,
            token_verifier,
            settings.status_poll_interval,
        ));
        let webhook_handler = Arc::new(WebhookHandler::new(webhook_use_case));

        Ok(Self {
            db_pool,
            user_repository,
            case_study_repository,
            file_repository,
            image_repository,
            summary_repository,
            source_fetcher,
            document_extractor,
            object_storage,
            language_model,
            case_study_handler,
            webhook_handler,
        })
    }
}
