use chrono::{DateTime, Months, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use marketdesk_core::{DomainError, DomainResult, Entity, TenantKey};

/// Whether a subscription may be moved to an earlier expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityPolicy {
    /// Any date is accepted, including ones before the current expiry.
    #[default]
    AllowBackdating,
    /// The new expiry must not be earlier than the current one.
    RejectBackdating,
}

/// An isolated customer/organization context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    key: TenantKey,
    name: String,
    admin_email: String,
    connection_string: Option<String>,
    is_active: bool,
    valid_upto: DateTime<Utc>,
    issuer: Option<String>,
}

/// Flat persisted shape of a tenant (storage rows, seeding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub key: TenantKey,
    pub name: String,
    pub admin_email: String,
    pub connection_string: Option<String>,
    pub is_active: bool,
    pub valid_upto: DateTime<Utc>,
    pub issuer: Option<String>,
}

impl Tenant {
    /// Length of the subscription a new tenant starts with.
    pub const TRIAL_MONTHS: u32 = 1;

    /// New, active tenant whose subscription runs for one month from `now`.
    pub fn new(
        key: TenantKey,
        name: impl Into<String>,
        admin_email: impl Into<String>,
        connection_string: Option<String>,
        issuer: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let valid_upto = now
            .checked_add_months(Months::new(Self::TRIAL_MONTHS))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            key,
            name: name.into(),
            admin_email: admin_email.into(),
            connection_string: connection_string.filter(|c| !c.trim().is_empty()),
            is_active: true,
            valid_upto,
            issuer,
        }
    }

    pub fn from_record(record: TenantRecord) -> Self {
        Self {
            key: record.key,
            name: record.name,
            admin_email: record.admin_email,
            connection_string: record.connection_string,
            is_active: record.is_active,
            valid_upto: record.valid_upto,
            issuer: record.issuer,
        }
    }

    pub fn to_record(&self) -> TenantRecord {
        TenantRecord {
            key: self.key.clone(),
            name: self.name.clone(),
            admin_email: self.admin_email.clone(),
            connection_string: self.connection_string.clone(),
            is_active: self.is_active,
            valid_upto: self.valid_upto,
            issuer: self.issuer.clone(),
        }
    }

    pub fn key(&self) -> &TenantKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    pub fn connection_string(&self) -> Option<&str> {
        self.connection_string.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn valid_upto(&self) -> DateTime<Utc> {
        self.valid_upto
    }

    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Whether the subscription has lapsed as of `now`. The root tenant never lapses.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.key.is_root() && self.valid_upto < now
    }

    /// Replace the subscription expiry.
    ///
    /// Under `AllowBackdating` this is an unconditional overwrite. Returns the
    /// stored expiry.
    pub fn set_validity(
        &mut self,
        valid_upto: DateTime<Utc>,
        policy: ValidityPolicy,
    ) -> DomainResult<DateTime<Utc>> {
        if policy == ValidityPolicy::RejectBackdating && valid_upto < self.valid_upto {
            return Err(DomainError::invariant("Subscription cannot be backdated."));
        }
        self.valid_upto = valid_upto;
        Ok(self.valid_upto)
    }

    pub fn activate(&mut self) -> DomainResult<()> {
        if self.is_active {
            return Err(DomainError::conflict("Tenant is already Activated."));
        }
        self.is_active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) -> DomainResult<()> {
        if self.key.is_root() {
            return Err(DomainError::invariant("The root tenant cannot be deactivated."));
        }
        if !self.is_active {
            return Err(DomainError::conflict("Tenant is already Deactivated."));
        }
        self.is_active = false;
        Ok(())
    }
}

impl Entity for Tenant {
    type Id = TenantKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

/// Render an expiry for user-facing messages.
///
/// Midnight UTC renders as a plain date (`2030-01-01`); anything else as
/// RFC 3339 with seconds precision.
pub fn format_validity(at: DateTime<Utc>) -> String {
    if at.time() == NaiveTime::MIN {
        at.format("%Y-%m-%d").to_string()
    } else {
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn tenant(key: &str) -> Tenant {
        Tenant::new(
            TenantKey::new(key).unwrap(),
            "Acme",
            "admin@acme.test",
            None,
            None,
            at(2025, 1, 31),
        )
    }

    #[test]
    fn expiry_is_checked_against_valid_upto() {
        let t = tenant("acme");
        assert!(!t.is_expired_at(at(2025, 2, 28)));
        assert!(t.is_expired_at(at(2025, 3, 1)));

        let root = tenant(TenantKey::ROOT);
        assert!(!root.is_expired_at(at(2099, 1, 1)));
    }

    #[test]
    fn new_tenant_gets_one_month_trial() {
        let t = tenant("acme");
        assert!(t.is_active());
        assert_eq!(t.valid_upto(), at(2025, 2, 28));
    }

    #[test]
    fn blank_connection_string_is_dropped() {
        let t = Tenant::new(
            TenantKey::new("acme").unwrap(),
            "Acme",
            "a@b.c",
            Some("  ".into()),
            None,
            Utc::now(),
        );
        assert_eq!(t.connection_string(), None);
    }

    #[test]
    fn permissive_policy_accepts_earlier_dates() {
        let mut t = tenant("acme");
        let stored = t.set_validity(at(2020, 1, 1), ValidityPolicy::AllowBackdating).unwrap();
        assert_eq!(stored, at(2020, 1, 1));
        assert_eq!(t.valid_upto(), at(2020, 1, 1));
    }

    #[test]
    fn strict_policy_rejects_backdating() {
        let mut t = tenant("acme");
        let before = t.valid_upto();
        let err = t.set_validity(at(2020, 1, 1), ValidityPolicy::RejectBackdating).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(t.valid_upto(), before);

        t.set_validity(at(2030, 1, 1), ValidityPolicy::RejectBackdating).unwrap();
        assert_eq!(t.valid_upto(), at(2030, 1, 1));
    }

    #[test]
    fn activation_toggles_and_conflicts() {
        let mut t = tenant("acme");
        assert!(matches!(t.activate(), Err(DomainError::Conflict(_))));
        t.deactivate().unwrap();
        assert!(!t.is_active());
        assert!(matches!(t.deactivate(), Err(DomainError::Conflict(_))));
        t.activate().unwrap();
        assert!(t.is_active());
    }

    #[test]
    fn root_tenant_cannot_be_deactivated() {
        let mut t = tenant(TenantKey::ROOT);
        assert!(matches!(t.deactivate(), Err(DomainError::InvariantViolation(_))));
        assert!(t.is_active());
    }

    #[test]
    fn record_round_trip_preserves_state() {
        let mut t = tenant("acme");
        t.deactivate().unwrap();
        assert_eq!(Tenant::from_record(t.to_record()), t);
    }

    #[test]
    fn validity_formatting() {
        assert_eq!(format_validity(at(2030, 1, 1)), "2030-01-01");
        let with_time = Utc.with_ymd_and_hms(2030, 1, 1, 13, 5, 9).unwrap();
        assert_eq!(format_validity(with_time), "2030-01-01T13:05:09Z");
    }
}
