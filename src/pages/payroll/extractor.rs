use serde::de::DeserializeOwned;

use super::*;

/// A JSON body that still has to be checked before a handler can use it
pub(super) trait ValidateRequest: DeserializeOwned + 'static {
    type Output;

    fn validate(self) -> Result<Self::Output, PayrollError>;
}

/// Extracts `R` from the JSON body and hands the handler its validated form.
/// Every failure, malformed JSON included, is reported as a `VALIDATION_ERROR`.
pub(super) struct Valid<R: ValidateRequest>(pub(super) R::Output);

impl<R: ValidateRequest> FromRequest for Valid<R> {
    type Error = PayrollError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut dev::Payload) -> Self::Future {
        let body = web::Json::<R>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(raw) = body.await
                .map_err(|err| PayrollError::Validation(format!("Invalid request body: {err}")))?;

            Ok(Self(raw.validate()?))
        })
    }
}
