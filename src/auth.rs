use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Verifies bearer tokens minted by the identity service
pub struct Authority {
    decoding_key: DecodingKey,
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_key),
        }
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<AuthUser, AuthError> {
        let payload = decode::<Claims<AuthUser>>(token.as_ref(), &self.decoding_key, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

/// The principal a request acts on behalf of
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
    #[error("unauthorized")]
    MissingToken,
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) => StatusCode::FORBIDDEN,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // `Authorization: Bearer <token>`, the scheme itself is not checked
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(AuthError::MissingToken.into())
            };

            let Some(authority) = req.app_data::<web::Data<Authority>>() else {
                tracing::error!("`Authority` is not attached to the application");
                return Err(actix_web::error::ErrorInternalServerError("authority unavailable"))
            };
            let user = authority.authorize(token.trim())?;

            Ok(user)
        })
    }
}

#[cfg(test)]
impl Authority {
    /// Mints a token valid for one week, the way the identity service does
    pub fn issue_for(jwt_key: &[u8], user: &AuthUser) -> String {
        use chrono::{Duration, Local};
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = Claims {
            exp: (Local::now() + Duration::weeks(1)).timestamp(),
            data: user,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(jwt_key)).unwrap()
    }
}

#[cfg(test)]
pub(crate) fn test_user() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        username: "payroll-admin".to_string(),
        company_id: Some(Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{body::MessageBody, get, test, web, App, Responder};

    use super::*;

    #[actix_web::test]
    async fn test_authority() {
        let secret = b"secret";
        let user = test_user();

        let token = Authority::issue_for(secret, &user);

        let authorized_user = Authority::new(secret).authorize(token).expect("Unable to authorize user from token");
        assert_eq!(user, authorized_user);

        let other_token = Authority::issue_for(b"another secret", &user);
        assert!(Authority::new(secret).authorize(other_token).is_err());
    }

    #[actix_web::test]
    async fn test_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(user: AuthUser) -> impl Responder {
            user.id.to_string()
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler)
        ).await;

        {
            let forbidden_req = test::TestRequest::default()
                .uri("/")
                .insert_header(("Authorization", "Bearer wrong"))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        {
            let unauthorized_req = test::TestRequest::default()
                .uri("/")
                .to_request();

            let response = test::call_service(&app, unauthorized_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let user = test_user();
            let token = Authority::issue_for(secret, &user);

            let authorized_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, authorized_req).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.into_body().try_into_bytes().unwrap(), user.id.to_string().as_bytes());
        }
    }
}
