use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use shared::MediaKind;

use crate::auth::routes::{list_users, login, register};
use crate::detection::error::DetectionError;
use crate::detection::ingress::MediaForm;
use crate::detection::models::DetectionJob;
use crate::detection::service::DetectionService;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/detect-image").route(web::post().to(detect_image)))
        .service(web::resource("/detect-video").route(web::post().to(detect_video)))
        .service(web::resource("/detect-audio").route(web::post().to(detect_audio)))
        .service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/users").route(web::get().to(list_users)));
}

async fn detect_image(
    service: web::Data<DetectionService>,
    payload: Multipart,
) -> Result<HttpResponse, DetectionError> {
    handle_detection(MediaKind::Image, &service, payload).await
}

async fn detect_video(
    service: web::Data<DetectionService>,
    payload: Multipart,
) -> Result<HttpResponse, DetectionError> {
    handle_detection(MediaKind::Video, &service, payload).await
}

async fn detect_audio(
    service: web::Data<DetectionService>,
    payload: Multipart,
) -> Result<HttpResponse, DetectionError> {
    handle_detection(MediaKind::Audio, &service, payload).await
}

async fn handle_detection(
    kind: MediaKind,
    service: &DetectionService,
    payload: Multipart,
) -> Result<HttpResponse, DetectionError> {
    let source = MediaForm::from_multipart(payload).await?.into_source()?;
    let job = DetectionJob::new(kind, source);

    match service.detect(&job).await {
        Ok(verdict) => Ok(HttpResponse::Ok().json(verdict)),
        Err(e) => {
            log::error!("Job {}: {} detection failed: {}", job.job_id, kind, e);
            Err(e)
        }
    }
}
