use jsonwebtoken::{DecodingKey, Validation, decode};
#[cfg(test)]
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

// 认证服务签发的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (认证服务的用户 ID)
    pub role: String, // 用户角色
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

pub struct JwtUtils;

impl JwtUtils {
    fn validation(leeway: u64) -> Validation {
        let mut validation = Validation::default();
        validation.leeway = leeway;
        validation
    }

    // 验证 JWT token（HS256，校验签名与过期时间）
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::verify_with_secret(token, &config.jwt.secret, config.jwt.leeway)
    }

    pub fn verify_with_secret(
        token: &str,
        secret: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        decode::<Claims>(token, &decoding_key, &Self::validation(leeway))
            .map(|token_data| token_data.claims)
    }

    // 签发 Token，令牌由认证服务签发，这里仅供测试构造
    #[cfg(test)]
    pub fn generate_with_secret(
        user_id: &str,
        role: &str,
        expiry_duration: chrono::Duration,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }
}
