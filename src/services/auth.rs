// src/services/auth.rs

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(repo: UserRepository, jwt_secret: String) -> Self {
        Self { repo, jwt_secret }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

        let user = self
            .repo
            .create_user(self.repo.pool(), name, email, &password_hash)
            .await?;

        tracing::info!("Novo usuário cadastrado: {}", user.email);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .repo
            .find_by_email(self.repo.pool(), email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let expiration = Utc::now() + Duration::hours(8);
        let claims = Claims {
            sub: user.id,
            exp: expiration.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.find_user(data.claims.sub).await
    }

    pub async fn find_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repo
            .find_by_id(self.repo.pool(), id)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}
