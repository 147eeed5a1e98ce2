//! PayPay configuration loaded from the environment

use balance_core::{optional_env, require_env, BalanceResult};

/// Phone number and password used to start a login
#[derive(Clone)]
pub struct LoginConfig {
    pub phone: String,
    pub password: String,
}

impl LoginConfig {
    /// Load login secrets from the environment
    ///
    /// Expects:
    /// - PAYPAY_PHONE: phone number registered with PayPay
    /// - PAYPAY_PASSWORD: account password
    pub fn from_env() -> BalanceResult<Self> {
        Ok(Self {
            phone: require_env("PAYPAY_PHONE")?,
            password: require_env("PAYPAY_PASSWORD")?,
        })
    }
}

impl std::fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginConfig")
            .field("phone", &self.phone)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Tokens and device ids issued by a previous login
#[derive(Clone)]
pub struct PayPayConfig {
    pub access_token: String,
    pub refresh_token: String,
    pub device_uuid: Option<String>,
    pub client_uuid: Option<String>,
}

impl PayPayConfig {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            device_uuid: None,
            client_uuid: None,
        }
    }

    /// Load the tokens exported by `paypay login`
    ///
    /// Expects PAYPAY_ACCESS_TOKEN and PAYPAY_REFRESH_TOKEN. The device and
    /// client ids (PAYPAY_DEVICE_UUID, PAYPAY_CLIENT_UUID) are reused when set.
    pub fn from_env() -> BalanceResult<Self> {
        Ok(Self::new(
            require_env("PAYPAY_ACCESS_TOKEN")?,
            require_env("PAYPAY_REFRESH_TOKEN")?,
        )
        .with_device_ids_from_env())
    }

    /// Pick up device and client ids from the environment if present
    pub fn with_device_ids_from_env(mut self) -> Self {
        self.device_uuid = optional_env("PAYPAY_DEVICE_UUID");
        self.client_uuid = optional_env("PAYPAY_CLIENT_UUID");
        self
    }
}

impl std::fmt::Debug for PayPayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPayConfig")
            .field("device_uuid", &self.device_uuid)
            .field("client_uuid", &self.client_uuid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balance_core::BalanceError;

    fn missing_var(err: BalanceError) -> String {
        match err {
            BalanceError::MissingEnv(name) => name,
            other => panic!("expected missing env error, got {:?}", other),
        }
    }

    #[test]
    fn test_login_config_from_env() {
        std::env::remove_var("PAYPAY_PHONE");
        std::env::set_var("PAYPAY_PASSWORD", "hunter2");
        assert_eq!(missing_var(LoginConfig::from_env().unwrap_err()), "PAYPAY_PHONE");

        std::env::set_var("PAYPAY_PHONE", "09000000000");
        std::env::remove_var("PAYPAY_PASSWORD");
        assert_eq!(missing_var(LoginConfig::from_env().unwrap_err()), "PAYPAY_PASSWORD");

        std::env::set_var("PAYPAY_PASSWORD", "hunter2");
        let login = LoginConfig::from_env().unwrap();
        assert_eq!(login.phone, "09000000000");
        assert_eq!(login.password, "hunter2");
    }

    #[test]
    fn test_paypay_config_from_env() {
        std::env::remove_var("PAYPAY_ACCESS_TOKEN");
        std::env::set_var("PAYPAY_REFRESH_TOKEN", "refresh-1");
        assert_eq!(
            missing_var(PayPayConfig::from_env().unwrap_err()),
            "PAYPAY_ACCESS_TOKEN"
        );

        std::env::set_var("PAYPAY_ACCESS_TOKEN", "access-1");
        std::env::set_var("PAYPAY_DEVICE_UUID", "DEVICE-1");
        std::env::remove_var("PAYPAY_CLIENT_UUID");
        let config = PayPayConfig::from_env().unwrap();
        assert_eq!(config.access_token, "access-1");
        assert_eq!(config.refresh_token, "refresh-1");
        assert_eq!(config.device_uuid.as_deref(), Some("DEVICE-1"));
        assert_eq!(config.client_uuid, None);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let login = LoginConfig {
            phone: "09000000000".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", login).contains("hunter2"));

        let config = PayPayConfig::new("access-secret", "refresh-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("refresh-secret"));
    }
}
