use actix_web::{get, web, Responder};

use crate::auth::AuthUser;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(whoami);
}

#[get("")]
async fn whoami(user: AuthUser) -> impl Responder {
    web::Json(user)
}
