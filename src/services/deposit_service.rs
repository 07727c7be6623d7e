use std::str::FromStr;
use std::sync::Arc;

use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::clock::BusinessCalendar;
use crate::db::entity::{ deposit_network, deposit_request };
use crate::db::{ NewDepositRequest, WalletStore };
use crate::enums::DepositKind;
use crate::error::{ AppError, Result };
use crate::services::RateService;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitDeposit {
    pub network_id: Option<Uuid>,
    /// COP for fiat networks, USD for crypto networks.
    pub amount: Option<Decimal>,
    pub reference_number: Option<String>,
}

pub struct DepositService {
    store: Arc<dyn WalletStore>,
    calendar: BusinessCalendar,
    rates: Arc<RateService>,
}

/// PNG of a QR code encoding `data`.
pub fn render_qr_png(data: &str) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes()).map_err(|e|
        AppError::InvalidInput(format!("Cannot encode QR code: {}", e))
    )?;
    let image = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

    let mut buffer = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode QR image: {}", e)))?;

    Ok(buffer)
}

impl DepositService {
    pub fn new(store: Arc<dyn WalletStore>, calendar: BusinessCalendar, rates: Arc<RateService>) -> Self {
        Self { store, calendar, rates }
    }

    pub async fn networks(&self, kind: Option<DepositKind>) -> Result<Vec<deposit_network::Model>> {
        self.store.deposit_networks(kind).await
    }

    pub async fn network_qr_png(&self, network_id: Uuid) -> Result<Vec<u8>> {
        let network = self.store
            .find_deposit_network(network_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Deposit network {}", network_id)))?;

        render_qr_png(&network.address)
    }

    pub async fn submit(&self, user_id: &str, input: SubmitDeposit) -> Result<deposit_request::Model> {
        let network_id = input.network_id.ok_or_else(||
            AppError::InvalidInput("Select a deposit network".to_string())
        )?;
        let amount = input.amount.ok_or_else(|| AppError::InvalidInput("Amount is required".to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput("Amount must be greater than zero".to_string()));
        }
        let reference_number = input.reference_number
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Reference number is required".to_string()))?;

        let network = self.store
            .find_deposit_network(network_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Deposit network {}", network_id)))?;
        let wallet = self.store.main_wallet(user_id).await?.ok_or(AppError::WalletNotFound)?;

        let kind = DepositKind::from_str(&network.kind)?;
        let currency = kind.currency();
        let converter = self.rates.converter().await?;

        let deposit = NewDepositRequest {
            user_id: user_id.to_string(),
            wallet_id: wallet.id,
            network_name: network.name,
            amount,
            currency: currency.as_str().to_string(),
            amount_usd: converter.to_usd(amount, currency),
            reference_number,
            created_at: self.calendar.now_utc(),
        };

        let request = self.store.insert_deposit_request(deposit).await?;
        tracing::info!(
            user_id,
            request_id = %request.id,
            network = %request.network_name,
            amount = %request.amount,
            currency = %request.currency,
            "Deposit request created"
        );

        Ok(request)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<deposit_request::Model>> {
        self.store.deposit_requests(user_id).await
    }
}
