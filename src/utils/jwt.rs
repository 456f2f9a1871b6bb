use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// 只接受的令牌类型
pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体（由外部身份系统签发）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    #[serde(default)]
    pub role: String, // 签发时的角色，仅供参考，以数据库为准
    pub token_type: String,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

pub struct JwtUtils;

impl JwtUtils {
    // 验证签名与过期时间（HS256）
    pub fn verify_token_with_secret(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)
    }

    // 验证 token 是否为指定类型
    pub fn verify_token_type(
        token: &str,
        secret: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = Self::verify_token_with_secret(token, secret)?;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 使用配置中的密钥验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, &AppConfig::get().jwt.secret, ACCESS_TOKEN_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn sign(token_type: &str, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "42".to_string(),
            role: "teacher".to_string(),
            token_type: token_type.to_string(),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn test_access_token_accepted() {
        let token = sign(ACCESS_TOKEN_TYPE, 3600);
        let claims = JwtUtils::verify_token_type(&token, SECRET, ACCESS_TOKEN_TYPE).unwrap();
        assert_eq!(claims.sub, "42");
    }

    #[test]
    fn test_refresh_token_rejected() {
        let token = sign("refresh", 3600);
        assert!(JwtUtils::verify_token_type(&token, SECRET, ACCESS_TOKEN_TYPE).is_err());
    }

    #[test]
    fn test_wrong_secret_and_expired_rejected() {
        let token = sign(ACCESS_TOKEN_TYPE, 3600);
        assert!(JwtUtils::verify_token_type(&token, "other", ACCESS_TOKEN_TYPE).is_err());

        let expired = sign(ACCESS_TOKEN_TYPE, -3600);
        assert!(JwtUtils::verify_token_type(&expired, SECRET, ACCESS_TOKEN_TYPE).is_err());
    }
}
