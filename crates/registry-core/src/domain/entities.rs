//! # Domain Entities
//!
//! Records held by the registry and the closed enumerations they use.
//!
//! ## Ownership Graph
//!
//! ```text
//! Community ─┬─ Network ─┬─ Address ── Confirmation*
//!            │           └─ Asset ──── Confirmation*
//!            ├─ Reporter
//!            └─ Case (id = 1, 2, 3, ...)
//! ```
//!
//! Every record stores back-references to its parents so a lookup by slot can
//! be checked against the scope the caller claims.

use super::{PermissionMatrix, RegistryError, RegistryResult, ReporterStatus, SlotAddress};
use serde::{Deserialize, Serialize};
use shared_types::{Epoch, Pubkey, TokenAmount};
use std::fmt;

/// Sequential case number, 1-based per community.
pub type CaseId = u64;

/// Raw external-chain address, left-aligned and zero padded to 32 bytes.
pub type ChainAddress = [u8; 32];

/// Asset instance id within a mint, zero padded to 32 bytes.
pub type AssetId = [u8; 32];

/// Highest valid risk score.
pub const MAX_RISK: u8 = 10;

/// Width of every fixed name field.
pub const NAME_LEN: usize = 32;

/// Pad a variable-length external key into a fixed 32-byte field.
pub fn pad_key(bytes: &[u8]) -> RegistryResult<[u8; 32]> {
    if bytes.len() > 32 {
        return Err(RegistryError::InvalidSeeds(format!(
            "key of {} bytes, max 32",
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Fixed-width (32 byte) UTF-8 name, zero padded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FixedName([u8; NAME_LEN]);

impl FixedName {
    pub fn new(name: &str) -> RegistryResult<Self> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > NAME_LEN {
            return Err(RegistryError::InvalidName(format!(
                "{:?} must be 1..={} bytes",
                name, NAME_LEN
            )));
        }
        let mut out = [0u8; NAME_LEN];
        out[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(out))
    }

    pub fn from_bytes(bytes: [u8; NAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    pub fn as_str(&self) -> String {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl fmt::Debug for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedName({:?})", self.as_str())
    }
}

impl Serialize for FixedName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for FixedName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FixedName::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Reporter role. Fixed set; determines stake threshold and permissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReporterRole {
    /// Can confirm addresses and assets
    Validator = 0,
    /// Can report addresses and assets
    Tracer = 1,
    /// Can open cases and report
    Full = 2,
    /// Can report and modify cases, addresses and assets
    Authority = 3,
}

impl ReporterRole {
    pub const ALL: [ReporterRole; 4] = [
        ReporterRole::Validator,
        ReporterRole::Tracer,
        ReporterRole::Full,
        ReporterRole::Authority,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Risk category of a classified address or asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    None = 0,
    WalletService,
    MerchantService,
    MiningPool,
    Exchange,
    DeFi,
    OtcBroker,
    Atm,
    Gambling,
    IllicitOrganization,
    Mixer,
    DarknetService,
    Scam,
    Ransomware,
    Theft,
    Counterfeit,
    TerroristFinancing,
    Sanctions,
    ChildAbuse,
    Hacker,
    HighRiskJurisdiction,
}

impl Category {
    const ALL: [Category; 21] = [
        Category::None,
        Category::WalletService,
        Category::MerchantService,
        Category::MiningPool,
        Category::Exchange,
        Category::DeFi,
        Category::OtcBroker,
        Category::Atm,
        Category::Gambling,
        Category::IllicitOrganization,
        Category::Mixer,
        Category::DarknetService,
        Category::Scam,
        Category::Ransomware,
        Category::Theft,
        Category::Counterfeit,
        Category::TerroristFinancing,
        Category::Sanctions,
        Category::ChildAbuse,
        Category::Hacker,
        Category::HighRiskJurisdiction,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }
}

/// Risk score in `0..=MAX_RISK`. 0 = no risk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RiskScore(u8);

impl RiskScore {
    pub fn new(value: u8) -> RegistryResult<Self> {
        if value > MAX_RISK {
            return Err(RegistryError::RiskOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for RiskScore {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RiskScore::new(u8::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Closed = 0,
    Open = 1,
}

/// Stake each role must lock to activate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeThresholds {
    pub validator: TokenAmount,
    pub tracer: TokenAmount,
    pub full: TokenAmount,
    pub authority: TokenAmount,
}

impl StakeThresholds {
    pub fn for_role(&self, role: ReporterRole) -> TokenAmount {
        match role {
            ReporterRole::Validator => self.validator,
            ReporterRole::Tracer => self.tracer,
            ReporterRole::Full => self.full,
            ReporterRole::Authority => self.authority,
        }
    }
}

/// Community policy set at initialization and replaced by `update_community`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityConfig {
    pub stake_thresholds: StakeThresholds,
    /// Informational confirmation target for addresses and assets.
    pub confirmation_threshold: u32,
    /// Epochs between deactivation and stake release.
    pub cooldown_epochs: Epoch,
    #[serde(default)]
    pub permissions: PermissionMatrix,
}

/// An organization's isolated registry namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Community {
    pub id: Pubkey,
    pub nonce: u8,
    pub authority: Pubkey,
    pub stake_mint: Pubkey,
    /// Token account holding staked collateral (the community's custody slot).
    pub stake_custody: Pubkey,
    pub config: CommunityConfig,
    cases: u64,
}

impl Community {
    pub fn new(
        id: Pubkey,
        nonce: u8,
        authority: Pubkey,
        stake_mint: Pubkey,
        stake_custody: Pubkey,
        config: CommunityConfig,
    ) -> Self {
        Self {
            id,
            nonce,
            authority,
            stake_mint,
            stake_custody,
            config,
            cases: 0,
        }
    }

    pub(crate) fn with_case_count(mut self, cases: u64) -> Self {
        self.cases = cases;
        self
    }

    /// Number of cases created so far.
    pub fn case_count(&self) -> u64 {
        self.cases
    }

    /// Increment the case counter and return the new value.
    pub fn next_case_id(&mut self) -> RegistryResult<CaseId> {
        self.cases = self
            .cases
            .checked_add(1)
            .ok_or(RegistryError::ArithmeticOverflow)?;
        Ok(self.cases)
    }
}

/// Reward configuration of a network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub tracer_reward: TokenAmount,
    pub confirmation_reward: TokenAmount,
}

/// Named external-chain namespace inside a community.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Network {
    pub community: SlotAddress,
    pub nonce: u8,
    pub name: FixedName,
    pub rewards: RewardConfig,
}

/// Staked principal allowed to publish classifications while Active.
///
/// The status is private; it only moves through the transition methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reporter {
    pub community: SlotAddress,
    pub nonce: u8,
    pub is_frozen: bool,
    pub role: ReporterRole,
    pub principal: Pubkey,
    pub name: FixedName,
    pub stake: TokenAmount,
    status: ReporterStatus,
}

impl Reporter {
    pub fn new(
        community: SlotAddress,
        nonce: u8,
        principal: Pubkey,
        name: FixedName,
        role: ReporterRole,
    ) -> Self {
        Self {
            community,
            nonce,
            is_frozen: false,
            role,
            principal,
            name,
            stake: 0,
            status: ReporterStatus::Inactive,
        }
    }

    pub(crate) fn with_status(mut self, status: ReporterStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> ReporterStatus {
        self.status
    }

    /// Inactive → Active, locking `stake`.
    pub fn activate(&mut self, stake: TokenAmount) -> RegistryResult<()> {
        self.status = self.status.activate()?;
        self.stake = stake;
        Ok(())
    }

    /// Active → Unstaking until `current_epoch + cooldown_epochs`.
    pub fn deactivate(&mut self, current_epoch: Epoch, cooldown_epochs: Epoch) -> RegistryResult<()> {
        self.status = self.status.deactivate(current_epoch, cooldown_epochs)?;
        Ok(())
    }

    /// Unstaking → Inactive once the unlock epoch has passed. Returns the
    /// stake that was released.
    pub fn release(&mut self, current_epoch: Epoch) -> RegistryResult<TokenAmount> {
        self.status = self.status.release(current_epoch)?;
        Ok(std::mem::take(&mut self.stake))
    }
}

/// Investigative grouping of findings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub community: SlotAddress,
    pub nonce: u8,
    pub id: CaseId,
    /// Reporter slot of the case owner.
    pub reporter: SlotAddress,
    pub status: CaseStatus,
    pub name: FixedName,
}

/// Classified external-chain address. Persisted as exactly 148 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRecord {
    pub community: SlotAddress,
    pub network: SlotAddress,
    pub address: ChainAddress,
    pub nonce: u8,
    pub case_id: CaseId,
    pub reporter: SlotAddress,
    pub category: Category,
    pub risk: RiskScore,
    pub confirmations: u8,
}

/// Classified asset instance (mint + asset id). Persisted as exactly 180 bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRecord {
    pub community: SlotAddress,
    pub network: SlotAddress,
    pub mint: Pubkey,
    pub asset_id: AssetId,
    pub nonce: u8,
    pub case_id: CaseId,
    pub reporter: SlotAddress,
    pub category: Category,
    pub risk: RiskScore,
    pub confirmations: u8,
}

/// Marker that `reporter` has confirmed `record`; exists at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub record: SlotAddress,
    pub reporter: SlotAddress,
    pub nonce: u8,
}

/// Increment a confirmation counter.
pub(crate) fn bump_confirmations(count: u8) -> RegistryResult<u8> {
    count.checked_add(1).ok_or(RegistryError::ArithmeticOverflow)
}
