//! Payment gateway client, with a dummy mode for unconfigured
//! environments.
//!
//! Live mode talks to a Stripe-style checkout-session API. Dummy mode
//! fabricates session ids locally and treats them as paid on
//! verification, so the full checkout flow works without a gateway key.

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;

const DUMMY_PREFIX: &str = "dummy_session_";
const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment session not found")]
    UnknownSession,

    #[error("payment gateway returned status {status}")]
    Gateway { status: u16 },

    #[error("payment gateway unreachable: {0}")]
    Connection(String),

    #[error("unexpected payment gateway response: {0}")]
    Decode(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::UnknownSession => AppError::Validation(err.to_string()),
            other => AppError::Internal(other.into()),
        }
    }
}

/// A created checkout session.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    pub id: String,
    /// Hosted payment page; absent in dummy mode.
    pub url: Option<String>,
}

/// Result of looking a session up after the customer paid.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub paid: bool,
    /// Amount the gateway actually charged, in cents. `None` in dummy
    /// mode, where the caller's claimed amount is taken at face value.
    pub amount_cents: Option<i64>,
}

pub enum PaymentGateway {
    Dummy,
    Live(LiveGateway),
}

pub struct LiveGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    amount_total: Option<i64>,
}

impl PaymentGateway {
    pub fn dummy() -> Self {
        PaymentGateway::Dummy
    }

    pub fn live(secret_key: String) -> Self {
        PaymentGateway::Live(LiveGateway {
            client: reqwest::Client::new(),
            secret_key,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, PaymentGateway::Dummy)
    }

    /// Open a checkout session for `amount_cents`.
    pub async fn create_session(
        &self,
        amount_cents: i64,
        user_id: &str,
    ) -> Result<PaymentSession, PaymentError> {
        match self {
            PaymentGateway::Dummy => {
                let session = PaymentSession {
                    id: dummy_session_id(),
                    url: None,
                };
                tracing::info!(session_id = %session.id, amount_cents, "dummy payment session created");
                Ok(session)
            }
            PaymentGateway::Live(gw) => gw.create_session(amount_cents, user_id).await,
        }
    }

    /// Look up whether a session has been paid. Dummy sessions are
    /// always paid; a dummy id hitting a live gateway is rejected.
    pub async fn verify_session(&self, session_id: &str) -> Result<VerifiedSession, PaymentError> {
        match self {
            PaymentGateway::Dummy => {
                if session_id.starts_with(DUMMY_PREFIX) {
                    Ok(VerifiedSession {
                        paid: true,
                        amount_cents: None,
                    })
                } else {
                    Err(PaymentError::UnknownSession)
                }
            }
            PaymentGateway::Live(gw) => {
                if session_id.starts_with(DUMMY_PREFIX) {
                    return Err(PaymentError::UnknownSession);
                }
                gw.verify_session(session_id).await
            }
        }
    }
}

impl LiveGateway {
    async fn create_session(
        &self,
        amount_cents: i64,
        user_id: &str,
    ) -> Result<PaymentSession, PaymentError> {
        let amount = amount_cents.to_string();
        let form = [
            ("mode", "payment"),
            ("client_reference_id", user_id),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", "usd"),
            ("line_items[0][price_data][unit_amount]", amount.as_str()),
            ("line_items[0][price_data][product_data][name]", "NearFood order"),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Connection(e.to_string()))?;

        let session = Self::decode(response).await?;
        Ok(PaymentSession {
            id: session.id,
            url: session.url,
        })
    }

    async fn verify_session(&self, session_id: &str) -> Result<VerifiedSession, PaymentError> {
        let response = self
            .client
            .get(format!("{}/v1/checkout/sessions/{session_id}", self.api_base))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| PaymentError::Connection(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(PaymentError::UnknownSession);
        }
        let session = Self::decode(response).await?;
        Ok(VerifiedSession {
            paid: session.payment_status.as_deref() == Some("paid"),
            amount_cents: session.amount_total,
        })
    }

    async fn decode(response: reqwest::Response) -> Result<SessionResponse, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::Gateway {
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))
    }
}

fn dummy_session_id() -> String {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let nonce: u32 = rand::thread_rng().gen();
    format!("{DUMMY_PREFIX}{ts}_{nonce:08x}")
}
