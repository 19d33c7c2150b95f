use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::{CurrentUser, JwtAuth, JwtClaims, TokenType};
use chrono::Utc;
use domain_catalog::ProductSummary;
use domain_notifications::Mailer;
use rand::RngExt;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::OtpConfig;
use crate::error::{UserError, UserResult};
use crate::models::{
    AuthResponse, NewUser, ProfileChanges, ProfileResponse, SigninRequest, SignupRequest,
    UpdateProfile, User, UserResponse, UserRole, VerifyOtpRequest, check_password_strength,
};
use crate::repository::UserRepository;

/// Accounts, OTP sign-in, tokens and favorites.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
    mailer: Mailer,
    otp: OtpConfig,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R, auth: JwtAuth, mailer: Mailer, otp: OtpConfig) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
            mailer,
            otp,
        }
    }

    /// The token issuer, shared with the router's auth layer.
    pub fn auth(&self) -> &JwtAuth {
        &self.auth
    }

    pub async fn signup(&self, input: SignupRequest) -> UserResult<UserResponse> {
        check_password_strength(&input.password).map_err(UserError::Validation)?;
        let email = normalize_email(&input.email);

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let otp = generate_otp();
        let user = self
            .repository
            .create(NewUser {
                email,
                name: input.name.trim().to_string(),
                surname: input.surname.trim().to_string(),
                phone_number: input.phone_number,
                avatar: input.avatar,
                role: input.role,
                password_hash: hash_password(&input.password)?,
                otp_code: otp.clone(),
                otp_created_at: Utc::now(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User signed up");
        self.mailer.send_otp(&user.email, &user.name, &otp).await;

        Ok(user.into())
    }

    /// Checks the password and mails a fresh OTP.
    pub async fn signin(&self, input: SigninRequest) -> UserResult<Uuid> {
        let email = normalize_email(&input.email);
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        let otp = generate_otp();
        self.repository
            .set_otp(user.id, Some(otp.clone()), Some(Utc::now()))
            .await?;
        self.mailer.send_otp(&user.email, &user.name, &otp).await;

        Ok(user.id)
    }

    /// Consumes the OTP and issues a whitelisted token pair.
    pub async fn verify_otp(&self, input: VerifyOtpRequest) -> UserResult<AuthResponse> {
        let email = normalize_email(&input.email);
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| UserError::EmailNotFound(email.clone()))?;

        if !user.otp_matches(input.otp_code.trim(), self.otp.ttl(), Utc::now()) {
            return Err(UserError::InvalidOtp);
        }

        self.repository.set_otp(user.id, None, None).await?;

        let current = CurrentUser::new(user.id, &user.email, &user.name, user.role.to_string());
        let pair = self.auth.issue_pair(&current).await?;

        Ok(AuthResponse {
            user: user.into(),
            access: pair.access,
            refresh: pair.refresh,
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> UserResult<String> {
        Ok(self.auth.refresh(refresh_token).await?)
    }

    /// Revokes the refresh token and the access token the request came with.
    pub async fn logout(&self, access: &JwtClaims, refresh_token: &str) -> UserResult<()> {
        let refresh = self
            .auth
            .authenticate(refresh_token, TokenType::Refresh)
            .await
            .map_err(|e| {
                debug!(error = %e, "Logout with unusable refresh token");
                UserError::InvalidRefreshToken
            })?;

        if refresh.sub != access.sub {
            return Err(UserError::InvalidRefreshToken);
        }

        self.auth.revoke(&refresh).await?;
        self.auth.revoke(access).await?;
        Ok(())
    }

    pub async fn profile(&self, user_id: Uuid) -> UserResult<ProfileResponse> {
        let user = self.get_user(user_id).await?;
        let favorites = self.repository.favorite_products(user_id).await?;
        Ok(ProfileResponse::new(user, favorites))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        input: UpdateProfile,
    ) -> UserResult<ProfileResponse> {
        let current = self.get_user(user_id).await?;

        let email = input.email.as_deref().map(normalize_email);
        if let Some(email) = email.as_deref().filter(|e| *e != current.email) {
            if self.repository.find_by_email(email).await?.is_some() {
                return Err(UserError::DuplicateEmail(email.to_string()));
            }
        }

        let password_hash = match input.password.as_deref() {
            Some(password) => {
                check_password_strength(password).map_err(UserError::Validation)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let changes = ProfileChanges {
            email,
            name: input.name.map(|n| n.trim().to_string()),
            surname: input.surname.map(|s| s.trim().to_string()),
            phone_number: input.phone_number,
            avatar: input.avatar,
            password_hash,
        };

        let user = self
            .repository
            .update_profile(user_id, changes)
            .await?
            .ok_or(UserError::NotFound(user_id))?;
        let favorites = self.repository.favorite_products(user_id).await?;

        Ok(ProfileResponse::new(user, favorites))
    }

    /// Returns `true` when the product was added.
    pub async fn toggle_favorite(&self, user_id: Uuid, product_id: Uuid) -> UserResult<bool> {
        if !self.repository.product_exists(product_id).await? {
            return Err(UserError::ProductNotFound(product_id));
        }
        self.repository.toggle_favorite(user_id, product_id).await
    }

    pub async fn favorites(&self, user_id: Uuid) -> UserResult<Vec<ProductSummary>> {
        self.repository.favorite_products(user_id).await
    }

    pub async fn specialists(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list_by_role(UserRole::Specialist).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Six digits, never with a leading zero.
fn generate_otp() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999u32).to_string()
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
