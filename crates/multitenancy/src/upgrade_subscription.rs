//! Upgrade a tenant's subscription: move its expiry to a new date.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use validator::Validate;

use marketdesk_core::{Request, RequestError, RequestHandler, TenantKey};

use crate::{TENANT_NOT_FOUND, TenantRepository, ValidityPolicy, format_validity};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpgradeSubscriptionRequest {
    #[validate(custom(
        function = "marketdesk_core::validation::not_blank",
        message = "'Tenant Key' must not be empty."
    ))]
    pub tenant_key: String,

    /// Accepts RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
    #[serde(deserialize_with = "deserialize_expiry")]
    pub extended_expiry_date: DateTime<Utc>,
}

impl Request for UpgradeSubscriptionRequest {
    type Response = String;
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (read as midnight UTC).
pub fn deserialize_expiry<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| {
            serde::de::Error::custom(format!(
                "invalid expiry date '{raw}': expected RFC 3339 or YYYY-MM-DD"
            ))
        })
}

pub struct UpgradeSubscriptionHandler<R: ?Sized> {
    repository: Arc<R>,
    policy: ValidityPolicy,
}

impl<R: ?Sized> UpgradeSubscriptionHandler<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            policy: ValidityPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ValidityPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl<R> RequestHandler<UpgradeSubscriptionRequest> for UpgradeSubscriptionHandler<R>
where
    R: TenantRepository + ?Sized,
{
    #[tracing::instrument(skip(self, request), fields(tenant = %request.tenant_key))]
    async fn handle(&self, request: UpgradeSubscriptionRequest) -> Result<String, RequestError> {
        let key = TenantKey::new(request.tenant_key.as_str())?;

        let Some(mut tenant) = self.repository.get_by_key(&key).await? else {
            return Err(RequestError::not_found(TENANT_NOT_FOUND));
        };

        let valid_upto = tenant.set_validity(request.extended_expiry_date, self.policy)?;

        self.repository.update(tenant).await?;
        self.repository.save_changes().await?;

        tracing::info!(%valid_upto, "subscription upgraded");

        Ok(format!(
            "Tenant {}'s Subscription Upgraded. Now Valid till {}.",
            request.tenant_key,
            format_validity(valid_upto)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketdesk_core::{DomainError, Pipeline};
    use proptest::prelude::*;

    use crate::test_support::{RecordingTenantRepository, midnight, tenant};

    fn request(key: &str, date: DateTime<Utc>) -> UpgradeSubscriptionRequest {
        UpgradeSubscriptionRequest {
            tenant_key: key.to_string(),
            extended_expiry_date: date,
        }
    }

    fn pipeline(
        repo: Arc<RecordingTenantRepository>,
    ) -> Pipeline<marketdesk_core::DeriveValidator, UpgradeSubscriptionHandler<RecordingTenantRepository>> {
        Pipeline::validated(UpgradeSubscriptionHandler::new(repo))
    }

    #[tokio::test]
    async fn empty_key_fails_validation_before_handler() {
        let repo = Arc::new(RecordingTenantRepository::with([tenant("t1")]));
        let err = pipeline(repo.clone())
            .send(request("", midnight(2030, 1, 1)))
            .await
            .unwrap_err();

        match err {
            RequestError::Validation(e) => {
                assert!(e.has_field("tenant_key"));
                assert_eq!(e.errors()[0].message, "'Tenant Key' must not be empty.");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found_and_nothing_is_written() {
        let repo = Arc::new(RecordingTenantRepository::with([tenant("t1")]));
        let err = pipeline(repo.clone())
            .send(request("missing", midnight(2030, 1, 1)))
            .await
            .unwrap_err();

        match err {
            RequestError::Domain(DomainError::NotFound(msg)) => assert_eq!(msg, "Tenant Not Found."),
            other => panic!("expected not found, got {other:?}"),
        }
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn existing_tenant_is_upgraded_and_persisted() {
        let repo = Arc::new(RecordingTenantRepository::with([tenant("T1")]));
        let msg = pipeline(repo.clone())
            .send(request("T1", midnight(2030, 1, 1)))
            .await
            .unwrap();

        assert_eq!(msg, "Tenant T1's Subscription Upgraded. Now Valid till 2030-01-01.");
        assert_eq!(repo.stored("T1").unwrap().valid_upto(), midnight(2030, 1, 1));
        assert_eq!(repo.updates.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(repo.saves.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upgrading_twice_with_same_date_is_idempotent() {
        let repo = Arc::new(RecordingTenantRepository::with([tenant("T1")]));
        let p = pipeline(repo.clone());

        let first = p.send(request("T1", midnight(2030, 1, 1))).await.unwrap();
        let after_first = repo.stored("T1").unwrap();
        let second = p.send(request("T1", midnight(2030, 1, 1))).await.unwrap();
        let after_second = repo.stored("T1").unwrap();

        assert_eq!(first, second);
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn earlier_date_is_accepted_by_default() {
        let repo = Arc::new(RecordingTenantRepository::with([tenant("t1")]));
        pipeline(repo.clone()).send(request("t1", midnight(2001, 1, 1))).await.unwrap();
        assert_eq!(repo.stored("t1").unwrap().valid_upto(), midnight(2001, 1, 1));
    }

    #[tokio::test]
    async fn strict_policy_rejects_backdating_without_writing() {
        let repo = Arc::new(RecordingTenantRepository::with([tenant("t1")]));
        let handler =
            UpgradeSubscriptionHandler::new(repo.clone()).with_policy(ValidityPolicy::RejectBackdating);

        let err = Pipeline::validated(handler)
            .send(request("t1", midnight(2001, 1, 1)))
            .await
            .unwrap_err();

        assert!(matches!(err, RequestError::Domain(DomainError::InvariantViolation(_))));
        assert_eq!(repo.writes(), 0);
    }

    #[test]
    fn request_accepts_date_only_and_rfc3339() {
        let a: UpgradeSubscriptionRequest = serde_json::from_str(
            r#"{"tenant_key":"t1","extended_expiry_date":"2030-01-01"}"#,
        )
        .unwrap();
        assert_eq!(a.extended_expiry_date, midnight(2030, 1, 1));

        let b: UpgradeSubscriptionRequest = serde_json::from_str(
            r#"{"tenant_key":"t1","extended_expiry_date":"2030-01-01T02:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(b.extended_expiry_date, midnight(2030, 1, 1));

        assert!(
            serde_json::from_str::<UpgradeSubscriptionRequest>(
                r#"{"tenant_key":"t1","extended_expiry_date":"next week"}"#,
            )
            .is_err()
        );
    }

    proptest! {
        #[test]
        fn whitespace_only_keys_never_validate(key in "[ \t]{0,8}") {
            let req = request(&key, midnight(2030, 1, 1));
            prop_assert!(marketdesk_core::validate_request(&req).is_err());
        }

        #[test]
        fn set_validity_is_idempotent(days in 0i64..20_000) {
            let date = midnight(2000, 1, 1) + chrono::Duration::days(days);
            let mut once = tenant("t1");
            once.set_validity(date, ValidityPolicy::AllowBackdating).unwrap();
            let mut twice = once.clone();
            twice.set_validity(date, ValidityPolicy::AllowBackdating).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
