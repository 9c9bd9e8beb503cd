use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体（令牌由外部认证服务签发，这里只做校验）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: String, // 用户角色: "admin" 或 "evaluator"
    pub exp: usize,   // Expiration time (时间戳)
    pub iat: usize,   // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_with_secret(
            user_id,
            role,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
            &Self::get_secret(),
        )
    }

    pub fn generate_with_secret(
        user_id: i64,
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
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    // 验证 Access Token（HS256，校验签名与过期时间）
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with_secret(token, &Self::get_secret())
    }

    pub fn verify_with_secret(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify() {
        let token =
            JwtUtils::generate_with_secret(42, "evaluator", chrono::Duration::minutes(5), SECRET)
                .unwrap();
        let claims = JwtUtils::verify_with_secret(&token, SECRET).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "evaluator");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            JwtUtils::generate_with_secret(1, "admin", chrono::Duration::minutes(5), SECRET)
                .unwrap();
        assert!(JwtUtils::verify_with_secret(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token =
            JwtUtils::generate_with_secret(1, "admin", chrono::Duration::minutes(-10), SECRET)
                .unwrap();
        assert!(JwtUtils::verify_with_secret(&token, SECRET).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(JwtUtils::verify_with_secret("not.a.token", SECRET).is_err());
    }
}
