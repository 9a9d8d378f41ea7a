//! License verification and administration service.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use licensehub_auth::codec::RsaCodec;
use licensehub_core::config::LicenseConfig;
use licensehub_core::error::{AppError, ErrorKind};
use licensehub_core::result::AppResult;
use licensehub_core::types::pagination::{PageRequest, PageResponse};
use licensehub_database::store::{BindingConflict, LicenseStore};
use licensehub_entity::license::{
    License, LicenseChanges, LicenseGrant, LicensePayload, LicenseStatus, NewLicense,
    SealedLicense, SignedLicense,
};

use super::envelope;
use super::error::LicenseError;
use super::policy::{AdminAllowList, derive_status, is_within_heartbeat_window};

/// Why a verification was refused. Logged, never returned.
#[derive(Debug, Clone, Copy)]
enum Denial {
    Status(LicenseStatus),
    NameMismatch,
    Online,
    LostRace,
}

/// Owns every license state transition.
#[derive(Debug, Clone)]
pub struct LicenseService {
    store: Arc<dyn LicenseStore>,
    codec: Arc<RsaCodec>,
    allow_list: AdminAllowList,
    heartbeat_window: Duration,
}

impl LicenseService {
    /// Creates a new license service.
    pub fn new(store: Arc<dyn LicenseStore>, codec: Arc<RsaCodec>, config: &LicenseConfig) -> Self {
        let window = i64::try_from(config.heartbeat_window_seconds).unwrap_or(i64::MAX);
        Self {
            store,
            codec,
            allow_list: AdminAllowList::new(&config.admin_containers),
            heartbeat_window: Duration::seconds(window),
        }
    }

    /// Decrypt an envelope and check its integrity key before parsing.
    pub fn decode_envelope(&self, sealed: &SealedLicense) -> Result<LicensePayload, LicenseError> {
        let plaintext = self
            .codec
            .decrypt_base64(&sealed.info)
            .map_err(|_| LicenseError::IntegrityFailed)?;

        if !envelope::key_matches(&plaintext, &sealed.key) {
            return Err(LicenseError::IntegrityFailed);
        }

        let payload: LicensePayload =
            serde_json::from_slice(&plaintext).map_err(|_| LicenseError::InvalidLicense)?;
        if payload.container_id.trim().is_empty() {
            return Err(LicenseError::InvalidLicense);
        }
        Ok(payload)
    }

    /// Verify an installation's envelope and advance its heartbeat.
    pub async fn verify(&self, sealed: &SealedLicense, now: DateTime<Utc>) -> AppResult<SignedLicense> {
        let candidate = self.decode_logged(sealed)?;
        let Some(stored) = self.store.get_by_container_id(&candidate.container_id).await? else {
            warn!(container_id = %candidate.container_id, "License verification for unknown container");
            return Err(LicenseError::NotFound.into());
        };
        let license = self.evaluate(stored, &candidate, now).await?;
        self.sign_grant(&license)
    }

    /// Register a new installation, or verify one that is already known.
    pub async fn create(&self, sealed: &SealedLicense, now: DateTime<Utc>) -> AppResult<SignedLicense> {
        let payload = self.decode_logged(sealed)?;

        if let Some(stored) = self.store.get_by_container_id(&payload.container_id).await? {
            let license = self.evaluate(stored, &payload, now).await?;
            return self.sign_grant(&license);
        }

        let record = NewLicense {
            name: payload.name.clone(),
            container_id: payload.container_id.clone(),
            status: LicenseStatus::Invalid,
            ip: payload.ip.clone(),
            domain: payload.domain.clone(),
            expire: payload.expire,
        };
        let created = match self.store.create(record).await {
            Ok(license) => license,
            Err(e) if e.typed_source::<BindingConflict>().is_some() => {
                return Err(self.binding_rejected(
                    &payload.container_id,
                    &payload.ip,
                    &payload.domain,
                ));
            }
            Err(e) if e.kind == ErrorKind::Conflict => {
                warn!(error = %e, "Lost license registration race");
                return Err(LicenseError::InvalidLicense.into());
            }
            Err(e) => return Err(e),
        };

        info!(
            license_id = %created.id,
            container_id = %created.container_id,
            "Registered license pending activation"
        );
        self.sign_grant(&created)
    }

    /// Apply the verification policy to a stored license.
    ///
    /// Only `candidate.name` is consulted; the returned record is read back
    /// from the store.
    pub async fn evaluate(
        &self,
        stored: License,
        candidate: &LicensePayload,
        now: DateTime<Utc>,
    ) -> AppResult<License> {
        let status = derive_status(stored.status, stored.expire, now);
        if status == LicenseStatus::Expired && stored.status != LicenseStatus::Expired {
            self.store.update_status(stored.id, LicenseStatus::Expired).await?;
            info!(container_id = %stored.container_id, "License expired");
        }

        let allow_listed = self.allow_list.contains(&stored.container_id);
        let denial = if status != LicenseStatus::Valid {
            Some(Denial::Status(status))
        } else if stored.name != candidate.name {
            Some(Denial::NameMismatch)
        } else if !allow_listed
            && is_within_heartbeat_window(stored.last_online_at, now, self.heartbeat_window)
        {
            Some(Denial::Online)
        } else {
            None
        };
        if let Some(reason) = denial {
            return Err(self.deny(&stored, reason));
        }

        // Allow-listed containers may run concurrently, so only the others
        // race for the heartbeat.
        let recorded = if allow_listed {
            self.store.advance_heartbeat(stored.id, now).await?
        } else {
            self.store
                .touch_heartbeat(stored.id, stored.last_online_at, now)
                .await?
        };
        if !recorded {
            return Err(self.deny(&stored, Denial::LostRace));
        }

        self.store
            .get_by_id(stored.id)
            .await?
            .ok_or_else(|| LicenseError::InvalidLicense.into())
    }

    /// Update the binding fields of a license.
    ///
    /// Empty strings and `None` leave the stored value unchanged.
    pub async fn bind(
        &self,
        container_id: &str,
        ip: &str,
        domain: &str,
        expire: Option<NaiveDate>,
    ) -> AppResult<License> {
        let license = self.get(container_id).await?;

        let changes = LicenseChanges {
            ip: Some(ip.to_string()).filter(|s| !s.is_empty()),
            domain: Some(domain.to_string()).filter(|s| !s.is_empty()),
            expire,
        };
        if changes.is_empty() {
            return Ok(license);
        }

        let updated = match self.store.update_fields(license.id, &changes).await {
            Ok(updated) => updated.ok_or_else(|| AppError::not_found("License not found"))?,
            Err(e) if e.typed_source::<BindingConflict>().is_some() => {
                return Err(self.binding_rejected(container_id, ip, domain));
            }
            Err(e) => return Err(e),
        };
        info!(container_id, ip, domain, "License binding updated");
        Ok(updated)
    }

    /// Administrative status override.
    pub async fn set_status(&self, container_id: &str, status: LicenseStatus) -> AppResult<License> {
        let license = self.get(container_id).await?;
        if !self.store.update_status(license.id, status).await? {
            return Err(AppError::not_found("License not found"));
        }
        info!(container_id, %status, "License status set");
        Ok(License { status, ..license })
    }

    /// Fetch a live license.
    pub async fn get(&self, container_id: &str) -> AppResult<License> {
        self.store
            .get_by_container_id(container_id)
            .await?
            .ok_or_else(|| AppError::not_found("License not found"))
    }

    /// List live licenses, newest first.
    pub async fn list(
        &self,
        name_filter: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<License>> {
        let filter = name_filter.map(str::trim).filter(|s| !s.is_empty());
        self.store.list(filter, page).await
    }

    /// Soft-delete a license.
    pub async fn remove(&self, container_id: &str) -> AppResult<()> {
        if !self.store.soft_delete(container_id).await? {
            return Err(AppError::not_found("License not found"));
        }
        info!(container_id, "License removed");
        Ok(())
    }

    /// Sign the sanitized `{name, containerId, status}` view of a license.
    pub fn sign_grant(&self, license: &License) -> AppResult<SignedLicense> {
        let data = serde_json::to_string(&LicenseGrant::from(license))?;
        let sign = self.codec.sign(data.as_bytes())?;
        Ok(SignedLicense {
            sign,
            data,
            kid: self.codec.key_id().to_string(),
        })
    }

    fn decode_logged(&self, sealed: &SealedLicense) -> Result<LicensePayload, LicenseError> {
        self.decode_envelope(sealed).inspect_err(|e| {
            warn!(reason = %e, "Rejected license envelope");
        })
    }

    fn binding_rejected(&self, container_id: &str, ip: &str, domain: &str) -> AppError {
        warn!(
            container_id,
            ip,
            domain,
            "Binding already held by another container"
        );
        LicenseError::AlreadyBound.into()
    }

    fn deny(&self, license: &License, reason: Denial) -> AppError {
        warn!(
            container_id = %license.container_id,
            reason = ?reason,
            "License verification denied"
        );
        LicenseError::InvalidLicense.into()
    }
}
