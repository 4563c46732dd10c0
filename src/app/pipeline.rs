//! Medicine registration pipeline.
//!
//! Sequences `create -> encode -> publish -> finalize` for one record. The record is visible
//! as soon as it is created and its `RegistrationStage` is updated after every step, so a
//! failed registration stays visible and can be resumed from the step that failed.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::app::state::{Action, AppStore};
use crate::crypto::hashing::payload_digest;
use crate::domain::errors::RegistryError;
use crate::domain::model::{MedicineRecord, PipelineStep, TransactionStatus};
use crate::domain::payload::{encode_payload, validate_fields, EXPIRY_FORMAT};
use crate::domain::qr::{parse_data_url, render_png, to_data_url, PNG_MIME};
use crate::infra::pinata::{PinningService, QR_PIN_NAME};
use crate::storage::{MedicineStore, NewMedicineDocument};

/// Raw registration input as entered by the admin.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInput {
    pub name: String,
    pub batch_number: String,
    /// `YYYY-MM-DD`.
    pub expiry_date: String,
    /// Defaults to the connected wallet address.
    #[serde(default)]
    pub manufacturer_address: Option<String>,
}

pub struct RegistrationPipeline {
    store: Arc<AppStore>,
    pinning: Arc<dyn PinningService>,
    documents: Arc<dyn MedicineStore>,
}

impl RegistrationPipeline {
    pub fn new(
        store: Arc<AppStore>,
        pinning: Arc<dyn PinningService>,
        documents: Arc<dyn MedicineStore>,
    ) -> Self {
        Self {
            store,
            pinning,
            documents,
        }
    }

    /// Registers a new medicine and drives it to `Finalized`.
    ///
    /// On a step failure the record stays in the list, marked `Failed` at that step, and the
    /// error is returned.
    pub async fn register(&self, input: RegistrationInput) -> Result<MedicineRecord, RegistryError> {
        let manufacturer = match input.manufacturer_address.filter(|a| !a.trim().is_empty()) {
            Some(address) => address,
            None => {
                let wallet = self.store.wallet().await;
                if !wallet.is_connected {
                    return Err(RegistryError::WalletNotConnected);
                }
                wallet.address
            }
        };
        let fields = validate_fields(input.name, input.batch_number, &input.expiry_date, manufacturer)?;

        let record = MedicineRecord::create(fields);
        let id = record.id.clone();
        let name = record.name.clone();
        let batch = record.batch_number.clone();
        self.store.insert_medicine(record).await?;
        info!(%id, %batch, "medicine created");
        self.store
            .log(TransactionStatus::Success, format!("Medicine {} registered", name))
            .await;

        self.advance(&id).await
    }

    /// Continues a record from its first incomplete step. Finalized records are returned as-is.
    pub async fn resume(&self, id: &str) -> Result<MedicineRecord, RegistryError> {
        let record = self
            .store
            .medicine(id)
            .await
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;
        if record.stage.is_finalized() {
            return Ok(record);
        }
        info!(%id, stage = ?record.stage, "resuming registration");
        self.advance(id).await
    }

    async fn advance(&self, id: &str) -> Result<MedicineRecord, RegistryError> {
        loop {
            let record = self
                .store
                .medicine(id)
                .await
                .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;

            let Some(step) = record.stage.next_step() else {
                return Ok(record);
            };

            if let Err(e) = self.run_step(step, &record).await {
                error!(%id, %step, error = %e, "registration step failed");
                self.store
                    .dispatch(Action::StageFailed {
                        id: id.to_string(),
                        at: step,
                        reason: e.to_string(),
                    })
                    .await;
                self.store
                    .log(
                        TransactionStatus::Fail,
                        format!("Registration of {} failed at {}: {}", record.name, step, e),
                    )
                    .await;
                return Err(e);
            }
        }
    }

    async fn run_step(&self, step: PipelineStep, record: &MedicineRecord) -> Result<(), RegistryError> {
        match step {
            PipelineStep::Encode => self.encode(record).await,
            PipelineStep::Publish => self.publish(record).await,
            PipelineStep::Finalize => self.finalize(record).await,
        }
    }

    async fn encode(&self, record: &MedicineRecord) -> Result<(), RegistryError> {
        let payload = encode_payload(&record.fields());
        let png = render_png(&payload)?;
        let digest = payload_digest(&payload);

        self.store
            .dispatch(Action::QrEncoded {
                id: record.id.clone(),
                payload,
                image: to_data_url(PNG_MIME, &png),
                digest,
            })
            .await;
        self.store
            .log(
                TransactionStatus::Success,
                format!("QR code generated for {}", record.name),
            )
            .await;
        Ok(())
    }

    async fn publish(&self, record: &MedicineRecord) -> Result<(), RegistryError> {
        let image = record
            .qr_code
            .as_deref()
            .and_then(parse_data_url)
            .ok_or_else(|| RegistryError::Publish("record has no QR image".to_string()))?;

        let ipfs_hash = self
            .pinning
            .pin_file(QR_PIN_NAME, image)
            .await
            .map_err(|e| RegistryError::at_step(PipelineStep::Publish, e.to_string()))?;
        info!(id = %record.id, %ipfs_hash, "QR code pinned");

        self.store
            .dispatch(Action::Published {
                id: record.id.clone(),
                ipfs_hash,
            })
            .await;
        self.store
            .log(
                TransactionStatus::Success,
                format!("QR code uploaded to IPFS for {}", record.name),
            )
            .await;
        Ok(())
    }

    async fn finalize(&self, record: &MedicineRecord) -> Result<(), RegistryError> {
        let ipfs_hash = record.ipfs_hash.clone().ok_or_else(|| {
            RegistryError::Persist("record has no IPFS reference".to_string())
        })?;

        self.documents
            .upsert(NewMedicineDocument {
                id: Some(record.id.clone()),
                name: record.name.clone(),
                batch_number: record.batch_number.clone(),
                manufacturer_address: Some(record.manufacturer.clone()),
                expiry_date: Some(record.expiry_date.format(EXPIRY_FORMAT).to_string()),
                ipfs_hash,
                created_at: Some(record.created_at),
            })
            .await
            .map_err(|e| RegistryError::at_step(PipelineStep::Finalize, e.to_string()))?;

        self.store
            .dispatch(Action::Finalized {
                id: record.id.clone(),
            })
            .await;
        Ok(())
    }
}
