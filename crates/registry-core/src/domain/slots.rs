//! # Storage Slot Derivation
//!
//! Maps a logical key (parent slot + entity key) to the slot address that
//! holds the entity's record.
//!
//! ## Algorithm
//!
//! ```text
//! candidate(nonce) = sha256( len‖prefix ‖ len‖seed_0 ‖ ... ‖ len‖seed_n ‖ nonce ‖ registry_id ‖ MARKER )
//! canonical nonce  = highest nonce in 255..=0 whose candidate is NOT an ed25519 point
//! ```
//!
//! Length prefixes make the seed encoding injective, the per-kind prefix keeps
//! different entity kinds apart, and the off-curve rule guarantees nobody can
//! hold a signing key for a slot. Only the canonical nonce is accepted, so a
//! logical key has exactly one slot.

use super::{AssetId, CaseId, ChainAddress, FixedName, RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::Pubkey;
use tracing::{debug, trace};

/// Address of a derived storage slot.
pub type SlotAddress = Pubkey;

/// Maximum number of seeds in one derivation.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

const SLOT_MARKER: &[u8] = b"RegistryDerivedSlot";

/// Entity kind; doubles as the derivation discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Community,
    Network,
    Reporter,
    Case,
    Address,
    Asset,
    Confirmation,
    Custody,
}

impl SlotKind {
    pub fn seed_prefix(self) -> &'static [u8] {
        match self {
            SlotKind::Community => b"community",
            SlotKind::Network => b"network",
            SlotKind::Reporter => b"reporter",
            SlotKind::Case => b"case",
            SlotKind::Address => b"address",
            SlotKind::Asset => b"asset",
            SlotKind::Confirmation => b"confirmation",
            SlotKind::Custody => b"custody",
        }
    }
}

/// A slot address together with the collision nonce it was derived with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub address: SlotAddress,
    pub nonce: u8,
}

/// Deterministic slot deriver bound to one registry namespace.
#[derive(Clone, Debug)]
pub struct SlotDeriver {
    registry_id: Pubkey,
}

impl SlotDeriver {
    pub fn new(registry_id: Pubkey) -> Self {
        Self { registry_id }
    }

    pub fn registry_id(&self) -> Pubkey {
        self.registry_id
    }

    /// Derive the canonical slot for `seeds` under `kind`.
    pub fn derive(&self, kind: SlotKind, seeds: &[&[u8]]) -> RegistryResult<SlotRef> {
        validate_seeds(seeds)?;
        for nonce in (0..=u8::MAX).rev() {
            let address = self.candidate(kind, seeds, nonce);
            if !address.is_on_curve() {
                trace!(?kind, nonce, slot = %address.short(), "derived slot");
                return Ok(SlotRef { address, nonce });
            }
        }
        Err(RegistryError::InvalidSeeds(
            "no off-curve slot for any nonce".to_string(),
        ))
    }

    /// Check that `claimed` is the canonical slot for `seeds`.
    pub fn verify(&self, kind: SlotKind, seeds: &[&[u8]], claimed: &SlotRef) -> RegistryResult<()> {
        let canonical = self.derive(kind, seeds)?;
        if canonical != *claimed {
            debug!(
                ?kind,
                claimed = %claimed.address.short(),
                claimed_nonce = claimed.nonce,
                canonical_nonce = canonical.nonce,
                "slot does not match its seeds"
            );
            return Err(RegistryError::Ownership {
                slot: claimed.address,
                expected: kind,
            });
        }
        Ok(())
    }

    /// Token account that holds a community's staked collateral.
    pub fn custody(&self, community: &SlotAddress) -> RegistryResult<SlotRef> {
        self.derive(SlotKind::Custody, &[community.as_ref()])
    }

    fn candidate(&self, kind: SlotKind, seeds: &[&[u8]], nonce: u8) -> SlotAddress {
        let mut hasher = Sha256::new();
        let prefix = kind.seed_prefix();
        hasher.update((prefix.len() as u32).to_le_bytes());
        hasher.update(prefix);
        for seed in seeds {
            hasher.update((seed.len() as u32).to_le_bytes());
            hasher.update(seed);
        }
        hasher.update([nonce]);
        hasher.update(self.registry_id.as_bytes());
        hasher.update(SLOT_MARKER);
        Pubkey(hasher.finalize().into())
    }
}

fn validate_seeds(seeds: &[&[u8]]) -> RegistryResult<()> {
    if seeds.len() > MAX_SEEDS {
        return Err(RegistryError::InvalidSeeds(format!(
            "{} seeds, max {}",
            seeds.len(),
            MAX_SEEDS
        )));
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(RegistryError::InvalidSeeds(format!(
            "seed of {} bytes, max {}",
            seed.len(),
            MAX_SEED_LEN
        )));
    }
    Ok(())
}

/// Composite logical key of a stored record.
///
/// This is the arena index; the slot is a pure function of it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    Community {
        id: Pubkey,
    },
    Network {
        community: SlotAddress,
        name: FixedName,
    },
    Reporter {
        community: SlotAddress,
        principal: Pubkey,
    },
    Case {
        community: SlotAddress,
        id: CaseId,
    },
    Address {
        network: SlotAddress,
        address: ChainAddress,
    },
    Asset {
        network: SlotAddress,
        mint: Pubkey,
        asset_id: AssetId,
    },
    Confirmation {
        record: SlotAddress,
        reporter: SlotAddress,
    },
}

impl RecordKey {
    pub fn kind(&self) -> SlotKind {
        match self {
            RecordKey::Community { .. } => SlotKind::Community,
            RecordKey::Network { .. } => SlotKind::Network,
            RecordKey::Reporter { .. } => SlotKind::Reporter,
            RecordKey::Case { .. } => SlotKind::Case,
            RecordKey::Address { .. } => SlotKind::Address,
            RecordKey::Asset { .. } => SlotKind::Asset,
            RecordKey::Confirmation { .. } => SlotKind::Confirmation,
        }
    }

    pub fn seeds(&self) -> Vec<Vec<u8>> {
        match self {
            RecordKey::Community { id } => vec![id.to_bytes().to_vec()],
            RecordKey::Network { community, name } => {
                vec![community.to_bytes().to_vec(), name.as_bytes().to_vec()]
            }
            RecordKey::Reporter {
                community,
                principal,
            } => vec![community.to_bytes().to_vec(), principal.to_bytes().to_vec()],
            RecordKey::Case { community, id } => {
                vec![community.to_bytes().to_vec(), id.to_le_bytes().to_vec()]
            }
            RecordKey::Address { network, address } => {
                vec![network.to_bytes().to_vec(), address.to_vec()]
            }
            RecordKey::Asset {
                network,
                mint,
                asset_id,
            } => vec![
                network.to_bytes().to_vec(),
                mint.to_bytes().to_vec(),
                asset_id.to_vec(),
            ],
            RecordKey::Confirmation { record, reporter } => {
                vec![record.to_bytes().to_vec(), reporter.to_bytes().to_vec()]
            }
        }
    }

    pub fn derive(&self, deriver: &SlotDeriver) -> RegistryResult<SlotRef> {
        let seeds = self.seeds();
        let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
        deriver.derive(self.kind(), &refs)
    }

    pub fn verify(&self, deriver: &SlotDeriver, claimed: &SlotRef) -> RegistryResult<()> {
        let seeds = self.seeds();
        let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
        deriver.verify(self.kind(), &refs, claimed)
    }
}
