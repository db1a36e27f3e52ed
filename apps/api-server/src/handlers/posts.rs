//! Blog post endpoints. Reads are public; mutations and the admin listing
//! require an admitted admin token.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use mindstream_core::domain::{Post, PostDraft, PostPatch};
use mindstream_core::ports::{PostAction, PostEvent, PostNotifier};
use mindstream_shared::dto::{CreatePostRequest, SuccessResponse, UpdatePostRequest};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn draft_from(req: CreatePostRequest) -> PostDraft {
    PostDraft {
        id: req.id,
        title: req.title,
        summary: req.summary,
        content: req.content,
        tags: req.tags,
        created_at: req.created_at,
        reading_time: req.reading_time,
    }
}

fn patch_from(req: UpdatePostRequest) -> PostPatch {
    PostPatch {
        title: req.title,
        summary: req.summary,
        content: req.content,
        tags: req.tags,
        created_at: req.created_at,
        reading_time: req.reading_time,
    }
}

/// Fire-and-forget webhook delivery. Never delays or fails the request.
fn notify(notifier: Option<&Arc<dyn PostNotifier>>, action: PostAction, post: &Post) {
    let Some(notifier) = notifier.cloned() else {
        return;
    };

    let event = PostEvent {
        action,
        post: post.clone(),
    };

    actix_web::rt::spawn(async move {
        if let Err(e) = notifier.notify(&event).await {
            tracing::warn!(post_id = %event.post.id, error = %e, "Post webhook failed");
        }
    });
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/admin/posts
pub async fn list_all_posts(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_by_id(&path).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create_post(
    admin: AdminIdentity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(draft_from(body.into_inner())).await?;

    tracing::debug!(admin = %admin.subject, post_id = %post.id, "Create post request served");
    notify(state.notifier.as_ref(), PostAction::Create, &post);

    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(&path, patch_from(body.into_inner()))
        .await?;

    notify(state.notifier.as_ref(), PostAction::Update, &post);

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    _admin: AdminIdentity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&path).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
