//! # Record Layouts
//!
//! Fixed-width little-endian encoding of every persisted record. Each record
//! starts with an 8-byte discriminator, `sha256("record:" ‖ seed_prefix)[..8]`, so a
//! slot holding one kind can never be read as another.
//!
//! | Record | Bytes |
//! |--------|-------|
//! | Community | 197 |
//! | Network | 89 |
//! | Reporter | 124 |
//! | Case | 114 |
//! | Address | 148 |
//! | Asset | 180 |
//! | Confirmation | 73 |

use super::{
    AddressRecord, AssetRecord, Case, CaseStatus, Category, Community, CommunityConfig,
    Confirmation, FixedName, Network, PermissionMatrix, RegistryError, RegistryResult, Reporter,
    ReporterRole, ReporterStatus, RewardConfig, RiskScore, SlotAddress, SlotKind, StakeThresholds,
};
use sha2::{Digest, Sha256};
use shared_types::Pubkey;

pub type Discriminator = [u8; 8];

/// Discriminator of a record kind.
pub fn discriminator(kind: SlotKind) -> Discriminator {
    let mut hasher = Sha256::new();
    hasher.update(b"record:");
    hasher.update(kind.seed_prefix());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// A record with a fixed persisted layout.
pub trait Record: Sized {
    const KIND: SlotKind;
    const LEN: usize;

    fn encode(&self) -> Vec<u8>;

    /// Decode the bytes stored at `slot`. A length or discriminator mismatch
    /// means the slot does not hold this kind of record.
    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self>;
}

struct RecordWriter {
    out: Vec<u8>,
}

impl RecordWriter {
    fn new(kind: SlotKind, len: usize) -> Self {
        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(&discriminator(kind));
        Self { out }
    }

    fn bytes(mut self, data: &[u8]) -> Self {
        self.out.extend_from_slice(data);
        self
    }

    fn key(self, key: &Pubkey) -> Self {
        self.bytes(key.as_bytes())
    }

    fn u8(mut self, value: u8) -> Self {
        self.out.push(value);
        self
    }

    fn u32(self, value: u32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    fn u64(self, value: u64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    fn finish(self) -> Vec<u8> {
        self.out
    }
}

struct RecordReader<'a> {
    slot: SlotAddress,
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn open<R: Record>(slot: &SlotAddress, data: &'a [u8]) -> RegistryResult<Self> {
        if data.len() != R::LEN || data[..8] != discriminator(R::KIND) {
            return Err(RegistryError::Ownership {
                slot: *slot,
                expected: R::KIND,
            });
        }
        Ok(Self {
            slot: *slot,
            data,
            pos: 8,
        })
    }

    fn take<const N: usize>(&mut self) -> RegistryResult<[u8; N]> {
        let end = self.pos + N;
        let chunk = self
            .data
            .get(self.pos..end)
            .and_then(|c| <[u8; N]>::try_from(c).ok())
            .ok_or_else(|| self.corrupt("truncated record"))?;
        self.pos = end;
        Ok(chunk)
    }

    fn key(&mut self) -> RegistryResult<Pubkey> {
        Ok(Pubkey(self.take::<32>()?))
    }

    fn u8(&mut self) -> RegistryResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn u32(&mut self) -> RegistryResult<u32> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn u64(&mut self) -> RegistryResult<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn name(&mut self) -> RegistryResult<FixedName> {
        Ok(FixedName::from_bytes(self.take()?))
    }

    fn bool(&mut self) -> RegistryResult<bool> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.corrupt(&format!("bool byte {}", other))),
        }
    }

    fn role(&mut self) -> RegistryResult<ReporterRole> {
        let raw = self.u8()?;
        ReporterRole::from_u8(raw).ok_or_else(|| self.corrupt(&format!("role {}", raw)))
    }

    fn category(&mut self) -> RegistryResult<Category> {
        let raw = self.u8()?;
        Category::from_u8(raw).ok_or_else(|| self.corrupt(&format!("category {}", raw)))
    }

    fn risk(&mut self) -> RegistryResult<RiskScore> {
        let raw = self.u8()?;
        RiskScore::new(raw).map_err(|_| self.corrupt(&format!("risk {}", raw)))
    }

    fn corrupt(&self, reason: &str) -> RegistryError {
        RegistryError::CorruptRecord {
            slot: self.slot,
            reason: reason.to_string(),
        }
    }
}

impl Record for Community {
    const KIND: SlotKind = SlotKind::Community;
    const LEN: usize = 197;

    fn encode(&self) -> Vec<u8> {
        let t = &self.config.stake_thresholds;
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.id)
            .key(&self.authority)
            .key(&self.stake_mint)
            .key(&self.stake_custody)
            .u8(self.nonce)
            .u64(self.case_count())
            .u32(self.config.confirmation_threshold)
            .u64(self.config.cooldown_epochs)
            .u64(t.validator)
            .u64(t.tracer)
            .u64(t.full)
            .u64(t.authority)
            .bytes(&self.config.permissions.to_bytes())
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        let id = r.key()?;
        let authority = r.key()?;
        let stake_mint = r.key()?;
        let stake_custody = r.key()?;
        let nonce = r.u8()?;
        let cases = r.u64()?;
        let confirmation_threshold = r.u32()?;
        let cooldown_epochs = r.u64()?;
        let stake_thresholds = StakeThresholds {
            validator: r.u64()?,
            tracer: r.u64()?,
            full: r.u64()?,
            authority: r.u64()?,
        };
        let permissions = PermissionMatrix::from_bytes(r.take()?);
        let config = CommunityConfig {
            stake_thresholds,
            confirmation_threshold,
            cooldown_epochs,
            permissions,
        };
        Ok(
            Community::new(id, nonce, authority, stake_mint, stake_custody, config)
                .with_case_count(cases),
        )
    }
}

impl Record for Network {
    const KIND: SlotKind = SlotKind::Network;
    const LEN: usize = 89;

    fn encode(&self) -> Vec<u8> {
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.community)
            .u8(self.nonce)
            .bytes(self.name.as_bytes())
            .u64(self.rewards.tracer_reward)
            .u64(self.rewards.confirmation_reward)
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        Ok(Network {
            community: r.key()?,
            nonce: r.u8()?,
            name: r.name()?,
            rewards: RewardConfig {
                tracer_reward: r.u64()?,
                confirmation_reward: r.u64()?,
            },
        })
    }
}

impl Record for Reporter {
    const KIND: SlotKind = SlotKind::Reporter;
    const LEN: usize = 124;

    fn encode(&self) -> Vec<u8> {
        let status = self.status();
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.community)
            .u8(self.nonce)
            .u8(self.is_frozen as u8)
            .u8(status.tag())
            .u8(self.role as u8)
            .key(&self.principal)
            .bytes(self.name.as_bytes())
            .u64(self.stake)
            .u64(status.unlock_epoch().unwrap_or(0))
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        let community = r.key()?;
        let nonce = r.u8()?;
        let is_frozen = r.bool()?;
        let tag = r.u8()?;
        let role = r.role()?;
        let principal = r.key()?;
        let name = r.name()?;
        let stake = r.u64()?;
        let unlock_epoch = r.u64()?;
        let status = ReporterStatus::from_parts(tag, unlock_epoch)
            .ok_or_else(|| r.corrupt(&format!("status tag {} unlock {}", tag, unlock_epoch)))?;
        let mut reporter = Reporter::new(community, nonce, principal, name, role).with_status(status);
        reporter.is_frozen = is_frozen;
        reporter.stake = stake;
        Ok(reporter)
    }
}

impl Record for Case {
    const KIND: SlotKind = SlotKind::Case;
    const LEN: usize = 114;

    fn encode(&self) -> Vec<u8> {
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.community)
            .u8(self.nonce)
            .u64(self.id)
            .key(&self.reporter)
            .u8(self.status as u8)
            .bytes(self.name.as_bytes())
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        let community = r.key()?;
        let nonce = r.u8()?;
        let id = r.u64()?;
        let reporter = r.key()?;
        let status = match r.u8()? {
            0 => CaseStatus::Closed,
            1 => CaseStatus::Open,
            other => return Err(r.corrupt(&format!("case status {}", other))),
        };
        Ok(Case {
            community,
            nonce,
            id,
            reporter,
            status,
            name: r.name()?,
        })
    }
}

impl Record for AddressRecord {
    const KIND: SlotKind = SlotKind::Address;
    const LEN: usize = 148;

    fn encode(&self) -> Vec<u8> {
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.community)
            .key(&self.network)
            .bytes(&self.address)
            .u8(self.nonce)
            .u64(self.case_id)
            .key(&self.reporter)
            .u8(self.category as u8)
            .u8(self.risk.value())
            .u8(self.confirmations)
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        Ok(AddressRecord {
            community: r.key()?,
            network: r.key()?,
            address: r.take()?,
            nonce: r.u8()?,
            case_id: r.u64()?,
            reporter: r.key()?,
            category: r.category()?,
            risk: r.risk()?,
            confirmations: r.u8()?,
        })
    }
}

impl Record for AssetRecord {
    const KIND: SlotKind = SlotKind::Asset;
    const LEN: usize = 180;

    fn encode(&self) -> Vec<u8> {
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.community)
            .key(&self.network)
            .key(&self.mint)
            .bytes(&self.asset_id)
            .u8(self.nonce)
            .u64(self.case_id)
            .key(&self.reporter)
            .u8(self.category as u8)
            .u8(self.risk.value())
            .u8(self.confirmations)
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        Ok(AssetRecord {
            community: r.key()?,
            network: r.key()?,
            mint: r.key()?,
            asset_id: r.take()?,
            nonce: r.u8()?,
            case_id: r.u64()?,
            reporter: r.key()?,
            category: r.category()?,
            risk: r.risk()?,
            confirmations: r.u8()?,
        })
    }
}

impl Record for Confirmation {
    const KIND: SlotKind = SlotKind::Confirmation;
    const LEN: usize = 73;

    fn encode(&self) -> Vec<u8> {
        RecordWriter::new(Self::KIND, Self::LEN)
            .key(&self.record)
            .key(&self.reporter)
            .u8(self.nonce)
            .finish()
    }

    fn decode(slot: &SlotAddress, data: &[u8]) -> RegistryResult<Self> {
        let mut r = RecordReader::open::<Self>(slot, data)?;
        Ok(Confirmation {
            record: r.key()?,
            reporter: r.key()?,
            nonce: r.u8()?,
        })
    }
}
