use crate::chat;
use crate::handlers::page::{render, PageContext};
use crate::models::user::CurrentUser;
use crate::AppState;
use askama::Template;
use axum::{
    extract::{ws::WebSocketUpgrade, Extension, State},
    response::Response,
};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "chat.html")]
struct ChatTemplate {
    ctx: PageContext,
}

/// GET /mensagens - Chat page
pub async fn chat_page(Extension(user): Extension<CurrentUser>, session: Session) -> Response {
    let template = ChatTemplate {
        ctx: PageContext::load(&session, Some(user)).await,
    };
    render(&template)
}

/// GET /ws/chat - Upgrade to the chat socket under the session's identity
pub async fn chat_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    let hub = state.chat_hub.clone();
    ws.on_upgrade(move |socket| chat::session::run(hub, user.name, socket))
}
