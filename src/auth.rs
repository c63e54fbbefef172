use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::HttpRequest;
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Context;
use super::JoblyError;

const ISSUER: &str = "jobly:api";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum Permissions {
    #[serde(rename = "job:write")]
    JobWrite,
}

impl FromStr for Permissions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job:write" => Ok(Permissions::JobWrite),
            other => Err(format!("Unknown permission '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    permissions: Vec<Permissions>,
}

impl User {
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.contains(&permission)
    }

    /// Fails with `Unauthorized` unless the token grants `permission`.
    pub fn require(&self, permission: Permissions) -> Result<(), JoblyError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(JoblyError::Unauthorized {})
        }
    }
}

impl actix_web::FromRequest for User {
    type Error = JoblyError;
    type Future = future::Ready<Result<User, JoblyError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .app_data::<actix_web::web::Data<Context>>()
            .ok_or(JoblyError::ReadContext {})
            .and_then(|context| {
                let authorization = Authorization::<Bearer>::parse(req)
                    .map_err(|_| JoblyError::MissingToken {})?;

                decode_token(&context.secret, authorization.as_ref().token())
            });

        future::ready(user)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    exp: usize,  // Expiration time (as UTC timestamp)
    iat: usize,  // Issued at (as UTC timestamp)
    iss: String, // Issuer
    user: User,
}

pub fn create_token(
    secret: &str,
    permissions: Vec<Permissions>,
    duration: i64,
) -> Result<String, JoblyError> {
    let header = JwtHeader::new(Algorithm::HS512);
    let user = User { permissions };
    let claims = Claims {
        exp: (chrono::Local::now() + chrono::Duration::minutes(duration)).timestamp() as usize,
        iat: chrono::Local::now().timestamp() as usize,
        iss: ISSUER.to_owned(),
        user,
    };

    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| JoblyError::Authenticate { source: err })
}

fn decode_token(secret: &str, token: &str) -> Result<User, JoblyError> {
    let mut validation = Validation::new(Algorithm::HS512);
    validation.set_issuer(&[ISSUER]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|token| token.claims.user)
    .map_err(|err| JoblyError::Authenticate { source: err })
}
